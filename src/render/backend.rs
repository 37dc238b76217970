use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::PageIndex;
use crate::foundation::error::{DeckError, DeckResult};
use crate::sequence::plan::Page;

/// Everything a renderer needs to produce one page.
#[derive(Clone, Copy, Debug)]
pub struct PageSnapshot<'a> {
    /// The page being rendered.
    pub page: &'a Page,
    /// Full document text with exactly `page.visible` displayed.
    pub svg: &'a str,
    /// Directory used to resolve fonts and linked resources.
    pub resources_dir: Option<&'a Path>,
}

/// A rendered page on disk.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PageArtifact {
    /// Page this artifact belongs to.
    pub index: PageIndex,
    /// Location of the rendered file.
    pub path: PathBuf,
}

/// Capability that turns one visibility snapshot into one page file.
///
/// Ordering contract: `render` is called once per page, in strictly increasing page order, and
/// the next call only happens after the previous one returned.
pub trait Renderer {
    /// Render `snapshot` and return the produced file.
    fn render(&mut self, snapshot: &PageSnapshot<'_>) -> DeckResult<PageArtifact>;
}

/// A page request captured by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedPage {
    /// The page that was requested.
    pub page: Page,
    /// Snapshot text handed to the renderer.
    pub svg: String,
}

/// Renderer for tests and debugging: records every request and writes the snapshot text as the
/// page artifact.
#[derive(Debug)]
pub struct RecordingRenderer {
    dir: PathBuf,
    fail_at: Option<PageIndex>,
    recorded: Vec<RecordedPage>,
}

impl RecordingRenderer {
    /// Create a recorder writing artifacts into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fail_at: None,
            recorded: Vec::new(),
        }
    }

    /// Make the request for `page` fail after it is recorded.
    pub fn failing_at(mut self, page: PageIndex) -> Self {
        self.fail_at = Some(page);
        self
    }

    /// Requests in the order they were received.
    pub fn recorded(&self) -> &[RecordedPage] {
        &self.recorded
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, snapshot: &PageSnapshot<'_>) -> DeckResult<PageArtifact> {
        let page = snapshot.page;
        self.recorded.push(RecordedPage {
            page: page.clone(),
            svg: snapshot.svg.to_owned(),
        });
        if self.fail_at == Some(page.index) {
            return Err(DeckError::render(page.index.0, &page.title, "recorder told to fail"));
        }
        let path = self.dir.join(format!("{}.svg", artifact_stem(page)));
        std::fs::write(&path, snapshot.svg)
            .with_context(|| format!("write recorded page '{}'", path.display()))?;
        Ok(PageArtifact {
            index: page.index,
            path,
        })
    }
}

/// File stem for a page artifact: `page-NNN-<label>` with the label reduced to safe characters.
pub fn artifact_stem(page: &Page) -> String {
    let label: String = page
        .title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("page-{:03}-{label}", page.index.number())
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
