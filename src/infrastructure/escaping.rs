//! Context-aware escaping for remote command construction
//!
//! Two contexts reach outside the process with path text in them:
//! - remote shell command lines (ssh commands and rsync destinations)
//! - rsync filter rules written to a temporary file

/// Characters the POSIX shell treats specially inside a word
///
/// `~` is absent: `~/dir` must still expand on the remote side.
pub const SHELL_SPECIAL: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', ' ', '\t', '*', '?', '[', ']',
    '#', '{', '}', '!',
];

/// Escape a path so the remote shell sees it as one literal word
///
/// Special characters get a backslash; a newline cannot be backslash-escaped
/// (that is a line continuation) so it is single-quoted instead.
pub fn escape_shell(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if c == '\n' {
            out.push_str("'\n'");
        } else {
            if SHELL_SPECIAL.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}

/// Characters that switch an rsync filter pattern into wildcard mode
const FILTER_WILDCARDS: &[char] = &['*', '?', '['];

/// Anchored rsync filter pattern matching exactly `path` under the transfer root
///
/// Backslashes only act as escapes in patterns that contain a wildcard, so
/// plain paths are written as-is. Returns `None` for paths that cannot be
/// expressed on one filter line.
pub fn escape_filter_pattern(path: &str) -> Option<String> {
    if path.contains('\n') || path.contains('\r') {
        return None;
    }

    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');

    if path.contains(FILTER_WILDCARDS) {
        for c in path.chars() {
            if FILTER_WILDCARDS.contains(&c) || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
    } else {
        out.push_str(path);
    }

    Some(out)
}
