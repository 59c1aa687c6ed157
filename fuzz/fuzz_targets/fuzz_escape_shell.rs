#![no_main]

use libfuzzer_sys::fuzz_target;
use pushsync::infrastructure::escaping::{escape_filter_pattern, escape_shell, SHELL_SPECIAL};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let escaped = escape_shell(s);

        // Every special character must be preceded by a backslash or sit
        // inside the quotes used for newlines
        let mut chars = escaped.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                chars.next();
                continue;
            }
            if c == '\'' {
                assert_eq!(chars.next(), Some('\n'));
                assert_eq!(chars.next(), Some('\''));
                continue;
            }
            assert!(!SHELL_SPECIAL.contains(&c), "unescaped {:?} in {:?}", c, escaped);
        }

        if let Some(pattern) = escape_filter_pattern(s) {
            assert!(pattern.starts_with('/'));
            assert!(!pattern.contains('\n'));
        }
    }
});
