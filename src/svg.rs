//! Small markup helpers shared by the renderers.

/// Makes `text` safe for element content and double-quoted attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turns an identifier into something usable as an element id and CSS
/// `#selector`: every `.` becomes `_`.
pub fn selector_token(raw: &str) -> String {
    raw.replace('.', "_")
}
