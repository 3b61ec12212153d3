//! Cookie-store lookups for the admin page's CSRF protection.

/// Name of the Django CSRF cookie.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Finds the cookie named `name` in a `Cookie`-header-shaped store
/// (`"a=1; b=2"`) and returns its percent-decoded value, or `None` when no
/// cookie of that exact name exists.
///
/// Matching mirrors the admin page: each segment is trimmed and must start
/// with `name=`; only the first `=` splits name from value, so values may
/// themselves contain `=`.
#[must_use]
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    if cookie_header.is_empty() || name.is_empty() {
        return None;
    }

    for segment in cookie_header.split(';') {
        let raw_value = segment
            .trim()
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='));
        if let Some(raw_value) = raw_value {
            return Some(percent_decode(raw_value));
        }
    }

    None
}

/// `decodeURIComponent` semantics: `%XX` escapes decode to bytes, `+` stays
/// literal, malformed escapes pass through unchanged.
fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            if let (Some(high), Some(low)) =
                (hex_nibble(bytes[index + 1]), hex_nibble(bytes[index + 2]))
            {
                output.push((high << 4) | low);
                index += 3;
                continue;
            }
        }
        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&output).into_owned()
}

fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
