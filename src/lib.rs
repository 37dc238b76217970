//! layerdeck compiles a layered SVG drawing into a paginated, progressively revealed PDF
//! presentation.
//!
//! Every Inkscape layer becomes one page, except for the always-visible `background` and
//! `foreground` layers (shown on every page) and hidden layers whose label starts with `#`.
//! Layers named `<base>-<n>` form an animation: the page for step `n` also shows every lower
//! step of the same base, so consecutive pages reveal content cumulatively.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `SVG file -> LayerDocument` (layer labels in structural order)
//! 2. **Plan**: `LayerDocument -> PagePlan` (classification, animation grouping, visibility sets)
//! 3. **Render**: each page's snapshot goes through a [`Renderer`], strictly one after another
//! 4. **Annotate**: one bookmark per rendered page is appended to the pdfmark stream
//! 5. **Assemble**: an [`Assembler`] merges the pages and the pdfmarks into the final PDF
//!
//! Planning is pure and deterministic; only rendering and assembly touch external tools
//! (`inkscape` and `gs` by default).
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod annotate;
mod assemble;
mod classify;
mod document;
mod foundation;
mod render;
mod sequence;
mod session;

pub use annotate::pdfmarks::{AnnotationEmitter, DocInfo, pdf_string, render_marks};
pub use assemble::backend::Assembler;
pub use assemble::ghostscript::{GhostscriptAssembler, GhostscriptOpts, is_ghostscript_on_path};
pub use classify::animation::{AnimationGroup, AnimationGroups, StepLabel, parse_step};
pub use classify::roles::{Classification, HIDDEN_MARKER, Role, RoleNames};
pub use document::svg::{Layer, LayerDocument};
pub use foundation::core::{LayerId, PageIndex, VisibilitySet};
pub use foundation::error::{DeckError, DeckResult};
pub use render::backend::{
    PageArtifact, PageSnapshot, RecordedPage, RecordingRenderer, Renderer, artifact_stem,
};
pub use render::inkscape::{InkscapeOpts, InkscapeRenderer, is_inkscape_on_path};
pub use render::raster::{RasterOpts, RasterRenderer};
pub use sequence::plan::{Page, PagePlan};
pub use sequence::sequencer::PageSequencer;
pub use session::compile::{
    CompileReport, MARKS_FILE, PlanEntry, PlanReport, compile_deck, compile_with, plan_deck,
    preview_deck, sidecar_path,
};
pub use session::options::DeckOptions;
