//! Chunking layer tests
//!
//! Size ceilings, pass ordering and metadata isolation for the
//! enforcer, plus Markdown and PDF structural splitting of real files.

mod test_enforcer;
mod test_pdf;
