use std::sync::LazyLock;

use regex::Regex;

/// Characters that are not allowed in a file name on at least one of the
/// common filesystems.
pub const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

static RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).expect("reserved character pattern is valid"));

/// Replace every reserved character with `_`.
///
/// Only ever applied to translated names, never to the name found on disk.
pub fn sanitize_filename(raw: &str) -> String {
    RESERVED.replace_all(raw, "_").into_owned()
}
