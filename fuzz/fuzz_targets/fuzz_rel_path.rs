#![no_main]

use libfuzzer_sys::fuzz_target;
use pushsync::domain::value_objects::RelPath;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(path) = RelPath::new(s) {
            assert!(!path.as_str().starts_with('/'));
            assert!(path.segments().all(|seg| !seg.is_empty() && seg != "." && seg != ".."));
            // Normalized paths parse to themselves
            assert_eq!(RelPath::new(path.as_str()).as_ref(), Ok(&path));
        }
    }
});
