//! Filesystem-safe name tokens.

/// Maps a display name to a token usable as a filename segment.
///
/// Whitespace runs become a single `_`, anything outside `[A-Za-z0-9._-]`
/// becomes `_`, and leading/trailing `_`/`-` are trimmed. The result may be
/// empty; callers treat that as "no name".
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }

    out.trim_matches(|c| c == '_' || c == '-').to_string()
}
