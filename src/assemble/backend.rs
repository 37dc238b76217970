use std::path::Path;

use crate::foundation::error::DeckResult;
use crate::render::backend::PageArtifact;

/// Capability that merges rendered pages and the pdfmark stream into the final document.
///
/// Implementations must keep `pages` order as output page order: bookmarks refer to pages by
/// position.
pub trait Assembler {
    /// Merge `pages` (in order) plus the pdfmark stream at `marks` into `out`.
    fn assemble(&mut self, pages: &[PageArtifact], marks: &Path, out: &Path) -> DeckResult<()>;
}
