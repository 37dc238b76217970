use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{DeckError, DeckResult};
use crate::render::backend::{PageArtifact, PageSnapshot, Renderer, artifact_stem};

/// Options for [`InkscapeRenderer`].
#[derive(Clone, Debug)]
pub struct InkscapeOpts {
    /// Inkscape executable.
    pub program: PathBuf,
    /// Export resolution for rasterized effects.
    pub dpi: u32,
    /// Use the 0.92 command line (`--without-gui --export-pdf=`) instead of the 1.x one.
    pub legacy_cli: bool,
    /// Keep the per-page snapshot SVG next to the rendered PDF.
    pub keep_snapshots: bool,
}

impl Default for InkscapeOpts {
    fn default() -> Self {
        Self {
            program: PathBuf::from("inkscape"),
            dpi: 300,
            legacy_cli: false,
            keep_snapshots: false,
        }
    }
}

/// Renders each page by exporting its snapshot to PDF with the system `inkscape`.
///
/// One process is spawned per page and waited on before returning.
pub struct InkscapeRenderer {
    workdir: PathBuf,
    opts: InkscapeOpts,
}

impl InkscapeRenderer {
    /// Create a renderer writing snapshots and page PDFs into `workdir`.
    pub fn new(workdir: impl Into<PathBuf>, opts: InkscapeOpts) -> Self {
        Self {
            workdir: workdir.into(),
            opts,
        }
    }

    fn command(&self, svg: &Path, pdf: &Path) -> Command {
        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(svg);
        if self.opts.legacy_cli {
            cmd.args(["--without-gui", "--export-area-page"])
                .arg(format!("--export-dpi={}", self.opts.dpi))
                .arg(format!("--export-pdf={}", pdf.display()));
        } else {
            cmd.arg("--export-area-page")
                .arg(format!("--export-dpi={}", self.opts.dpi))
                .arg("--export-type=pdf")
                .arg(format!("--export-filename={}", pdf.display()));
        }
        cmd
    }
}

impl Renderer for InkscapeRenderer {
    fn render(&mut self, snapshot: &PageSnapshot<'_>) -> DeckResult<PageArtifact> {
        let page = snapshot.page;
        let stem = artifact_stem(page);
        let svg_path = self.workdir.join(format!("{stem}.svg"));
        let pdf_path = self.workdir.join(format!("{stem}.pdf"));

        std::fs::write(&svg_path, snapshot.svg)
            .with_context(|| format!("write page snapshot '{}'", svg_path.display()))?;

        let output = self.command(&svg_path, &pdf_path).output().map_err(|e| {
            DeckError::render(
                page.index.0,
                &page.title,
                format!("failed to spawn inkscape (is it installed and on PATH?): {e}"),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeckError::render(
                page.index.0,
                &page.title,
                format!("inkscape exited with status {}: {}", output.status, stderr.trim()),
            ));
        }
        if !pdf_path.is_file() {
            return Err(DeckError::render(
                page.index.0,
                &page.title,
                format!("inkscape did not produce '{}'", pdf_path.display()),
            ));
        }

        if !self.opts.keep_snapshots {
            std::fs::remove_file(&svg_path)
                .with_context(|| format!("remove page snapshot '{}'", svg_path.display()))?;
        }

        tracing::debug!(page = page.index.number(), path = %pdf_path.display(), "rendered page");
        Ok(PageArtifact {
            index: page.index,
            path: pdf_path,
        })
    }
}

/// Return `true` when `program` can be invoked as Inkscape.
pub fn is_inkscape_on_path(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/inkscape.rs"]
mod tests;
