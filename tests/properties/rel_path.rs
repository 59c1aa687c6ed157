//! Property tests for relative path validation.

use proptest::prelude::*;

use pushsync::domain::value_objects::RelPath;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_ -][A-Za-z0-9._ -]{0,15}")
        .unwrap()
        .prop_filter("dot segments are special", |s| s != "." && s != "..")
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics, and anything accepted is relative,
    /// traversal-free and has no empty segments.
    #[test]
    fn property_accepted_paths_are_normalized(s in "(?s).{0,256}") {
        if let Ok(path) = RelPath::new(&s) {
            let text = path.as_str();
            prop_assert!(!text.is_empty());
            prop_assert!(!text.starts_with('/'));
            prop_assert!(!text.ends_with('/'));
            prop_assert!(text.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != ".."));
        }
    }

    /// PROPERTY: Well-formed segment lists parse to themselves.
    #[test]
    fn property_joined_segments_parse_unchanged(parts in segments()) {
        let joined = parts.join("/");
        let path = RelPath::new(&joined).unwrap();
        prop_assert_eq!(path.as_str(), joined.as_str());
        prop_assert_eq!(path.segments().count(), parts.len());
        prop_assert_eq!(path.first_segment(), parts[0].as_str());
    }

    /// PROPERTY: Redundant separators and `.` segments do not change the
    /// parsed path.
    #[test]
    fn property_redundant_separators_are_dropped(parts in segments()) {
        let noisy = format!("./{}/", parts.join("//./"));
        let parsed = RelPath::new(&noisy).unwrap();
        let expected = parts.join("/");
        prop_assert_eq!(parsed.as_str(), expected.as_str());
    }

    /// PROPERTY: A `..` segment anywhere is rejected.
    #[test]
    fn property_traversal_is_rejected(parts in segments(), at in 0usize..5) {
        let mut parts = parts;
        let at = at.min(parts.len());
        parts.insert(at, "..".to_string());
        prop_assert!(RelPath::new(&parts.join("/")).is_err());
    }

    /// PROPERTY: `parent` is a prefix of the path.
    #[test]
    fn property_parent_is_prefix(parts in segments()) {
        let path = RelPath::new(&parts.join("/")).unwrap();
        match path.parent() {
            Some(parent) => {
                let prefix = format!("{}/", parent);
                prop_assert!(path.as_str().starts_with(&prefix));
            }
            None => prop_assert_eq!(parts.len(), 1),
        }
    }
}
