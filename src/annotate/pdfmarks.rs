use std::fmt::Write as _;
use std::io::Write;

use anyhow::Context as _;

use crate::foundation::core::PageIndex;
use crate::foundation::error::{DeckError, DeckResult};
use crate::sequence::plan::{Page, PagePlan};

/// Document information written into the output metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DocInfo {
    /// Document title. Always emitted, possibly empty.
    pub title: String,
    /// Author; omitted when empty.
    pub author: String,
    /// Subject; omitted when empty.
    pub subject: String,
    /// Keywords (comma separated); omitted when empty.
    pub keywords: String,
}

/// Append-only writer for the pdfmark stream consumed by the assembler.
///
/// The metadata block is written on construction. Bookmarks must then arrive in page order,
/// starting at the first page with no gaps, so bookmark `n` always points at output page `n`.
pub struct AnnotationEmitter<W: Write> {
    out: W,
    next: PageIndex,
}

impl<W: Write> AnnotationEmitter<W> {
    /// Start a stream on `out` and write the DOCINFO and DOCVIEW records.
    pub fn begin(mut out: W, info: &DocInfo) -> DeckResult<Self> {
        let mut head = format!("[ /Title {}\n", pdf_string(&info.title));
        for (key, value) in [
            ("Author", &info.author),
            ("Subject", &info.subject),
            ("Keywords", &info.keywords),
        ] {
            if !value.is_empty() {
                let _ = writeln!(head, "  /{key} {}", pdf_string(value));
            }
        }
        head.push_str("  /DOCINFO pdfmark\n");
        head.push_str("[/PageMode /UseOutlines /View [/Fit ] /Page 1 /DOCVIEW pdfmark\n");

        out.write_all(head.as_bytes())
            .context("write pdfmark metadata")?;
        Ok(Self {
            out,
            next: PageIndex(0),
        })
    }

    /// Append the outline entry for `page`.
    pub fn bookmark(&mut self, page: &Page) -> DeckResult<()> {
        if page.index != self.next {
            return Err(DeckError::annotation(format!(
                "bookmark for page {} written out of order (expected page {})",
                page.index, self.next
            )));
        }
        writeln!(
            self.out,
            "[/Title {} /Page {} /OUT pdfmark",
            pdf_string(&page.title),
            page.index.number()
        )
        .with_context(|| format!("write bookmark for page {}", page.index))?;
        self.next = self.next.next();
        Ok(())
    }

    /// Number of bookmarks written so far.
    pub fn bookmarks_written(&self) -> u32 {
        self.next.0
    }

    /// Flush and close the stream, returning the underlying writer.
    pub fn finish(mut self) -> DeckResult<W> {
        self.out.flush().context("flush pdfmarks")?;
        Ok(self.out)
    }
}

/// Render the complete pdfmark stream for `plan` in memory.
pub fn render_marks(info: &DocInfo, plan: &PagePlan) -> DeckResult<String> {
    let mut emitter = AnnotationEmitter::begin(Vec::new(), info)?;
    for page in plan.pages() {
        emitter.bookmark(page)?;
    }
    let bytes = emitter.finish()?;
    String::from_utf8(bytes).map_err(|e| DeckError::annotation(e.to_string()))
}

/// Encode `s` as a PDF text string usable inside a pdfmark.
///
/// ASCII text becomes a literal string with `\`, `(` and `)` escaped; anything else becomes a
/// UTF-16BE hex string with a byte-order mark.
pub fn pdf_string(s: &str) -> String {
    if !s.is_ascii() {
        let mut out = String::with_capacity(6 + s.len() * 4);
        out.push_str("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(out, "{unit:04X}");
        }
        out.push('>');
        return out;
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('(');
    for c in s.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/pdfmarks.rs"]
mod tests;
