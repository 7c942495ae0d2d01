//! Escaping for highlighted code embedded in generated HTML.

use std::borrow::Cow;

/// Escape `&`, `<` and `>` for use as element text.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape(input: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>');

    let Some(first) = input.find(needs_escape) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
