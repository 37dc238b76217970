use std::io::Write;

use crate::annotate::pdfmarks::AnnotationEmitter;
use crate::document::svg::LayerDocument;
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::backend::{PageArtifact, PageSnapshot, Renderer};
use crate::sequence::plan::{Page, PagePlan};

/// Drives a [`Renderer`] through a [`PagePlan`], one page at a time.
///
/// The first failing page aborts the run: a missing page would shift every following bookmark.
pub struct PageSequencer<'r> {
    renderer: &'r mut dyn Renderer,
}

impl<'r> PageSequencer<'r> {
    /// Create a sequencer over `renderer`.
    pub fn new(renderer: &'r mut dyn Renderer) -> Self {
        Self { renderer }
    }

    /// Render every page of `plan` in order, writing one bookmark per rendered page.
    ///
    /// Returns the artifacts in page order.
    #[tracing::instrument(skip_all, fields(pages = plan.len()))]
    pub fn run<W: Write>(
        &mut self,
        doc: &LayerDocument,
        plan: &PagePlan,
        marks: &mut AnnotationEmitter<W>,
    ) -> DeckResult<Vec<PageArtifact>> {
        let mut artifacts = Vec::with_capacity(plan.len());
        for page in plan.pages() {
            let artifact = self.render_page(doc, page)?;
            marks.bookmark(page)?;
            tracing::info!(
                page = page.index.number(),
                total = plan.len(),
                title = %page.title,
                "page rendered"
            );
            artifacts.push(artifact);
        }
        Ok(artifacts)
    }

    fn render_page(&mut self, doc: &LayerDocument, page: &Page) -> DeckResult<PageArtifact> {
        let at_page = |e: DeckError| match e {
            e @ DeckError::Render { .. } => e,
            other => DeckError::render(page.index.0, &page.title, format!("{other:#}")),
        };

        let svg = doc.snapshot(&page.visible).map_err(at_page)?;
        let artifact = self
            .renderer
            .render(&PageSnapshot {
                page,
                svg: &svg,
                resources_dir: doc.resources_dir(),
            })
            .map_err(at_page)?;

        if artifact.index != page.index {
            return Err(DeckError::render(
                page.index.0,
                &page.title,
                format!("renderer returned the artifact of page {}", artifact.index),
            ));
        }
        if !artifact.path.is_file() {
            return Err(DeckError::render(
                page.index.0,
                &page.title,
                format!("rendered page '{}' does not exist", artifact.path.display()),
            ));
        }
        Ok(artifact)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sequencer.rs"]
mod tests;
