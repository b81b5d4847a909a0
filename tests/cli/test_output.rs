//! Tests for CLI output formatting helpers

use docrag::cli::output::{format_bytes, format_duration, truncate_line};

// =============================================================================
// format_bytes tests
// =============================================================================

/// Test byte formatting at unit boundaries
#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1048576 - 1), "1024.0 KB");
    assert_eq!(format_bytes(1048576), "1.0 MB");
    assert_eq!(format_bytes(10737418240), "10.0 GB");
}

// =============================================================================
// format_duration tests
// =============================================================================

#[test]
fn test_format_duration_units() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(59.0), "59.00s");
    assert_eq!(format_duration(120.0), "2m 0.0s");
}

// =============================================================================
// truncate_line tests
// =============================================================================

#[test]
fn test_truncate_line_limits() {
    assert_eq!(truncate_line("", 5), "");
    assert_eq!(truncate_line("exact", 5), "exact");
    assert_eq!(truncate_line("too long", 5), "to...");
    assert_eq!(truncate_line("abc", 2), "...");
}
