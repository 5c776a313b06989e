//! Cleanup of raw model replies.
//!
//! Removes code-fence markers and every character outside a narrow
//! allow-list. This neutralizes stray formatting; it is not a security
//! control.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```sql|```").expect("valid code fence regex"));
static DISALLOWED_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\s*()='"%,;]"#).expect("valid disallowed char regex"));

/// Strips fences and disallowed characters, then trims surrounding
/// whitespace.
///
/// Kept characters: word characters, whitespace and `*()='"%,;`.
pub fn sanitize_generated_sql(reply: &str) -> String {
    let without_fences = CODE_FENCE_RE.replace_all(reply.trim(), "");
    let cleaned = DISALLOWED_CHAR_RE.replace_all(&without_fences, "");
    cleaned.trim().to_string()
}
