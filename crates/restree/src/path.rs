//! Resource path handling.

/// Split a slash-delimited resource path into its non-empty segments.
/// Leading, trailing, and doubled slashes contribute nothing, so `""`,
/// `"/"`, and `"//"` all address the root.
///
/// # Example
///
/// ```
/// use restree::path::segments;
///
/// assert_eq!(segments(""), Vec::<&str>::new());
/// assert_eq!(segments("/"), Vec::<&str>::new());
/// assert_eq!(segments("/a//b/"), vec!["a", "b"]);
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Whether a segment can address a record member.
///
/// Record members live in a single identifier-shaped namespace; a segment
/// like `@` addressed at a record is a malformed path, not a missing
/// member. Container keys are exempt from this policy.
pub fn is_member_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Render a walked path prefix for diagnostics.
pub(crate) fn joined(segments: &[&str]) -> String {
    segments.join("/")
}
