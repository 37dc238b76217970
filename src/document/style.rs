use std::ops::Range;

use crate::foundation::error::{DeckError, DeckResult};

/// Where the `style` attribute of an element's start tag lives in the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StyleSlot {
    /// Byte range of the existing attribute value, quotes excluded.
    Existing(Range<usize>),
    /// No `style` attribute; a new one can be inserted at this byte offset (right after the
    /// tag name).
    Missing(usize),
}

/// Locate the `style` attribute in the start tag beginning at `tag_start` (the `<`).
///
/// Attribute values are always quoted in XML, so a quote-aware scan is enough to find the end of
/// the start tag even when values contain `>`.
pub(crate) fn find_style_slot(text: &str, tag_start: usize) -> DeckResult<StyleSlot> {
    let bytes = text.as_bytes();
    let malformed = || DeckError::structure(format!("malformed start tag at byte {tag_start}"));

    if bytes.get(tag_start) != Some(&b'<') {
        return Err(malformed());
    }
    let mut i = tag_start + 1;
    while i < bytes.len() && !is_tag_delim(bytes[i]) {
        i += 1;
    }
    let name_end = i;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => return Err(malformed()),
            Some(b'>') | Some(b'/') => return Ok(StyleSlot::Missing(name_end)),
            Some(_) => {}
        }

        let attr_start = i;
        while i < bytes.len() && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let attr_name = &text[attr_start..i];
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            return Err(malformed());
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let quote = match bytes.get(i) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err(malformed()),
        };
        let value_start = i + 1;
        let value_len = bytes[value_start..]
            .iter()
            .position(|&b| b == quote)
            .ok_or_else(malformed)?;
        let value_end = value_start + value_len;

        if attr_name == "style" {
            return Ok(StyleSlot::Existing(value_start..value_end));
        }
        i = value_end + 1;
    }
}

fn is_tag_delim(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

/// Rewrite an inline style so its `display` property is `inline` or `none`.
///
/// Other declarations keep their text and order. The `display` declaration replaces the first
/// existing one, or is prepended when there was none.
pub(crate) fn with_display(style: &str, visible: bool) -> String {
    let display = if visible {
        "display:inline"
    } else {
        "display:none"
    };

    let mut out: Vec<&str> = Vec::new();
    let mut placed = false;
    for decl in split_declarations(style) {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let property = decl.split(':').next().unwrap_or_default().trim();
        if property.eq_ignore_ascii_case("display") {
            if !placed {
                out.push(display);
                placed = true;
            }
            continue;
        }
        out.push(decl);
    }
    if !placed {
        out.insert(0, display);
    }
    out.join(";")
}

/// Split an inline style into declarations on `;`, skipping separators inside quoted strings
/// (raw or entity-encoded) and parentheses such as `url(data:...;base64,...)`.
fn split_declarations(style: &str) -> Vec<&str> {
    const QUOTES: [&str; 4] = ["\"", "'", "&quot;", "&apos;"];

    let mut out = Vec::new();
    let mut quote: Option<&str> = None;
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < style.len() {
        let rest = &style[i..];
        if let Some(q) = quote {
            if rest.starts_with(q) {
                quote = None;
                i += q.len();
                continue;
            }
        } else if let Some(q) = QUOTES.iter().copied().find(|q| rest.starts_with(q)) {
            quote = Some(q);
            i += q.len();
            continue;
        } else {
            match rest.as_bytes()[0] {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => {
                    out.push(&style[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }
    out.push(&style[start..]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/document/style.rs"]
mod tests;
