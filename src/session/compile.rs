use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::annotate::pdfmarks::AnnotationEmitter;
use crate::assemble::backend::Assembler;
use crate::assemble::ghostscript::{GhostscriptAssembler, GhostscriptOpts};
use crate::document::svg::LayerDocument;
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::backend::{PageArtifact, Renderer};
use crate::render::inkscape::{InkscapeOpts, InkscapeRenderer};
use crate::render::raster::{RasterOpts, RasterRenderer};
use crate::sequence::plan::PagePlan;
use crate::sequence::sequencer::PageSequencer;
use crate::session::options::DeckOptions;

/// File name of the pdfmark stream inside the working directory.
pub const MARKS_FILE: &str = "pdfmarks";

/// Outcome of a successful compilation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CompileReport {
    /// Final document.
    pub output: PathBuf,
    /// Number of pages (and bookmarks) in the output.
    pub pages: usize,
    /// `<output>.marks` sidecar, when requested.
    pub marks_sidecar: Option<PathBuf>,
    /// Working directory left on disk, when temporaries are kept.
    pub kept_workdir: Option<PathBuf>,
}

/// One page of a [`PlanReport`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlanEntry {
    /// 1-based page number.
    pub page: u32,
    /// Bookmark title.
    pub title: String,
    /// Animation step of the trigger layer, if any.
    pub step: Option<u64>,
    /// Labels of every displayed layer, in structural order.
    pub visible: Vec<String>,
}

/// Human-readable form of a [`PagePlan`], used by dry runs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlanReport {
    /// Pages in output order.
    pub pages: Vec<PlanEntry>,
}

impl PlanReport {
    /// Describe `plan` with the labels of `doc`.
    pub fn new(doc: &LayerDocument, plan: &PagePlan) -> Self {
        let pages = plan
            .pages()
            .iter()
            .map(|p| PlanEntry {
                page: p.index.number(),
                title: p.title.clone(),
                step: p.step,
                visible: p.visible.iter().map(|id| doc.label(id).to_owned()).collect(),
            })
            .collect();
        Self { pages }
    }
}

/// Load `input` and compute its page plan without rendering anything.
#[tracing::instrument(skip(opts))]
pub fn plan_deck(input: &Path, opts: &DeckOptions) -> DeckResult<(LayerDocument, PagePlan)> {
    let doc = LayerDocument::from_path(input)?;
    let plan = PagePlan::build(&doc, &opts.roles)?;
    Ok((doc, plan))
}

/// Compile `input` into a PDF with the system `inkscape` and `gs`.
#[tracing::instrument(skip(opts))]
pub fn compile_deck(input: &Path, opts: &DeckOptions) -> DeckResult<CompileReport> {
    let (doc, plan) = plan_deck(input, opts)?;
    let workdir = WorkDir::new(opts.keep_temps)?;

    let mut renderer = InkscapeRenderer::new(
        workdir.path(),
        InkscapeOpts {
            dpi: opts.dpi,
            legacy_cli: opts.inkscape_legacy_cli,
            keep_snapshots: opts.keep_temps,
            ..Default::default()
        },
    );
    let mut assembler = GhostscriptAssembler::new(GhostscriptOpts {
        paper_size: opts.paper_size.clone(),
        ..Default::default()
    });

    let result = compile_with(
        &doc,
        &plan,
        opts,
        workdir.path(),
        &mut renderer,
        &mut assembler,
    );
    let kept = workdir.finish();
    match result {
        Ok(mut report) => {
            report.kept_workdir = kept;
            Ok(report)
        }
        Err(e) => {
            if let Some(dir) = &kept {
                tracing::error!(workdir = %dir.display(), "compilation failed, temporary files kept");
            }
            Err(e)
        }
    }
}

/// Compile an already planned document with the given collaborators.
///
/// Page artifacts and the pdfmark stream are written under `workdir`; its lifecycle is the
/// caller's responsibility.
pub fn compile_with(
    doc: &LayerDocument,
    plan: &PagePlan,
    opts: &DeckOptions,
    workdir: &Path,
    renderer: &mut dyn Renderer,
    assembler: &mut dyn Assembler,
) -> DeckResult<CompileReport> {
    if plan.is_empty() {
        return Err(DeckError::validation(
            "document has no content layers, nothing to compile",
        ));
    }
    let output = opts.prepare_output()?;

    let marks_path = workdir.join(MARKS_FILE);
    let file = File::create(&marks_path)
        .with_context(|| format!("create pdfmarks '{}'", marks_path.display()))?;
    let mut marks = AnnotationEmitter::begin(BufWriter::new(file), &opts.info)?;

    let artifacts = PageSequencer::new(renderer).run(doc, plan, &mut marks)?;
    marks.finish()?;

    assembler.assemble(&artifacts, &marks_path, &output)?;
    tracing::info!(output = %output.display(), pages = artifacts.len(), "assembled presentation");

    let marks_sidecar = if opts.export_marks {
        let sidecar = sidecar_path(&output);
        std::fs::copy(&marks_path, &sidecar)
            .with_context(|| format!("store pdfmarks as '{}'", sidecar.display()))?;
        Some(sidecar)
    } else {
        None
    };

    Ok(CompileReport {
        output,
        pages: artifacts.len(),
        marks_sidecar,
        kept_workdir: None,
    })
}

/// Render every page of `input` as PNG into `out_dir` (no external tools involved).
///
/// With `opts.export_marks`, the pdfmark stream is written next to the pages.
#[tracing::instrument(skip(opts, raster))]
pub fn preview_deck(
    input: &Path,
    opts: &DeckOptions,
    out_dir: &Path,
    raster: RasterOpts,
) -> DeckResult<Vec<PageArtifact>> {
    let (doc, plan) = plan_deck(input, opts)?;
    std::fs::create_dir_all(out_dir).map_err(|e| {
        DeckError::config(format!(
            "cannot create preview directory '{}': {e}",
            out_dir.display()
        ))
    })?;

    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_owned());
    let mut renderer = RasterRenderer::new(out_dir, base.as_str(), raster);

    if opts.export_marks {
        let marks_path = out_dir.join(format!("{base}.marks"));
        let file = File::create(&marks_path)
            .with_context(|| format!("create pdfmarks '{}'", marks_path.display()))?;
        let mut marks = AnnotationEmitter::begin(BufWriter::new(file), &opts.info)?;
        let artifacts = PageSequencer::new(&mut renderer).run(&doc, &plan, &mut marks)?;
        marks.finish()?;
        Ok(artifacts)
    } else {
        let mut marks = AnnotationEmitter::begin(std::io::sink(), &opts.info)?;
        PageSequencer::new(&mut renderer).run(&doc, &plan, &mut marks)
    }
}

/// `<output>.marks`, e.g. `talk.pdf.marks`.
pub fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".marks");
    PathBuf::from(name)
}

/// Ephemeral working directory, optionally persisted at the end of the run.
struct WorkDir {
    dir: tempfile::TempDir,
    keep: bool,
}

impl WorkDir {
    fn new(keep: bool) -> DeckResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("layerdeck-")
            .tempdir()
            .context("create working directory")?;
        tracing::debug!(workdir = %dir.path().display(), "created working directory");
        Ok(Self { dir, keep })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory, or persist it and return its path when temporaries are kept.
    fn finish(self) -> Option<PathBuf> {
        if self.keep {
            let path = self.dir.keep();
            tracing::info!(workdir = %path.display(), "temporary files kept");
            Some(path)
        } else {
            if let Err(e) = self.dir.close() {
                tracing::warn!(error = %e, "failed to remove working directory");
            }
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/compile.rs"]
mod tests;
