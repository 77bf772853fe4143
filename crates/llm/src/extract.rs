//! Locating the JSON object inside a model reply.
//!
//! Models often wrap the requested JSON in prose or a Markdown code fence.
//! The first `{` starts the object; braces are then counted, ignoring any that
//! appear inside string literals, until the object closes.

/// Returns the first balanced JSON object in `text`, or `None` if there is no
/// `{` or the object never closes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
