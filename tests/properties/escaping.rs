//! Property tests for shell and filter escaping.

use std::process::Command;

use proptest::prelude::*;

use pushsync::infrastructure::escaping::{escape_filter_pattern, escape_shell};

/// Printable text plus the characters shells care about
fn path_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ._/~*?\\[\\]{}$`'\"\\\\|&;<>()#!\t\n-]{0,48}")
        .unwrap()
        .prop_filter("leading ~ is expanded on purpose", |s| !s.starts_with('~'))
}

fn shell_echo(word: &str) -> String {
    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("printf '%s' {}", word))
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The escaped text reaches a POSIX shell as exactly one
    /// word equal to the input.
    #[cfg(unix)]
    #[test]
    fn property_shell_escape_round_trips_through_sh(s in path_text()) {
        prop_assert_eq!(shell_echo(&escape_shell(&s)), s);
    }

    /// PROPERTY: Escaping never panics and never shrinks the input.
    #[test]
    fn property_shell_escape_never_shrinks(s in "(?s).{0,128}") {
        prop_assert!(escape_shell(&s).len() >= s.len());
    }

    /// PROPERTY: Filter patterns are anchored, single-line, and only
    /// refused for multi-line paths.
    #[test]
    fn property_filter_pattern_is_anchored(s in "(?s).{0,128}") {
        match escape_filter_pattern(&s) {
            Some(pattern) => {
                prop_assert!(pattern.starts_with('/'));
                prop_assert!(!pattern.contains('\n'));
                prop_assert!(!pattern.contains('\r'));
            }
            None => prop_assert!(s.contains('\n') || s.contains('\r')),
        }
    }

    /// PROPERTY: Paths without wildcards are written verbatim.
    #[test]
    fn property_plain_filter_pattern_is_verbatim(s in "[A-Za-z0-9 ._/\\\\-]{1,64}") {
        prop_assert_eq!(escape_filter_pattern(&s), Some(format!("/{}", s)));
    }
}
