//! Store layer tests

mod test_local_store;
