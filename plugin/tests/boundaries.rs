mod common;

use pretty_assertions::assert_eq;

#[test]
fn plugin_never_prints_to_stdout() {
    // Stdout is the protocol channel; diagnostics go through tracing to stderr.
    assert!(!common::crate_sources().is_empty());
    assert_eq!(
        common::sources_containing(&["println!", "print!(", "dbg!("]),
        Vec::new()
    );
}
