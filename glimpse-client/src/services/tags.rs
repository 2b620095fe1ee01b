//! Tag Parsing
//!
//! Normalizes the free-text comma-separated tag field into an ordered
//! list for the post document.

/// Parse a comma-delimited tag string.
///
/// All whitespace is stripped before splitting, matching the post form's
/// behavior of removing every space, and a wholly-empty input yields an
/// empty list rather than a single empty tag.
///
/// # Examples
/// ```
/// use glimpse_client::services::tags;
///
/// let parsed = tags::parse("art, sun set , travel");
/// assert_eq!(parsed, vec!["art", "sunset", "travel"]);
/// ```
pub fn parse(raw: &str) -> Vec<String> {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return Vec::new();
    }

    stripped.split(',').map(str::to_string).collect()
}

/// Join a tag list back into the single-field form representation
pub fn join(tags: &[String]) -> String {
    tags.join(", ")
}
