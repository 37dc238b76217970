use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::assemble::backend::Assembler;
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::backend::PageArtifact;

/// Options for [`GhostscriptAssembler`].
#[derive(Clone, Debug)]
pub struct GhostscriptOpts {
    /// Ghostscript executable.
    pub program: PathBuf,
    /// Ghostscript paper size name.
    pub paper_size: String,
    /// Device resolution.
    pub resolution: u32,
}

impl Default for GhostscriptOpts {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gs"),
            paper_size: "a4".to_owned(),
            resolution: 120,
        }
    }
}

/// Concatenates page PDFs with the system `gs` (pdfwrite device), applying the pdfmarks.
pub struct GhostscriptAssembler {
    opts: GhostscriptOpts,
}

impl GhostscriptAssembler {
    /// Create an assembler with `opts`.
    pub fn new(opts: GhostscriptOpts) -> Self {
        Self { opts }
    }

    fn command(&self, pages: &[PageArtifact], marks: &Path, out: &Path) -> Command {
        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(format!("-r{}", self.opts.resolution))
            .args([
                "-dBATCH",
                "-dNOPAUSE",
                "-dPDFSETTINGS=/prepress",
                "-dAutoRotatePages=/None",
            ])
            .arg(format!("-sPAPERSIZE={}", self.opts.paper_size))
            .arg("-sDEVICE=pdfwrite")
            .arg(format!("-sOutputFile={}", out.display()));
        for page in pages {
            cmd.arg(&page.path);
        }
        cmd.arg(marks);
        cmd
    }
}

impl Default for GhostscriptAssembler {
    fn default() -> Self {
        Self::new(GhostscriptOpts::default())
    }
}

impl Assembler for GhostscriptAssembler {
    #[tracing::instrument(skip(self, pages), fields(pages = pages.len()))]
    fn assemble(&mut self, pages: &[PageArtifact], marks: &Path, out: &Path) -> DeckResult<()> {
        if pages.is_empty() {
            return Err(DeckError::assembly("no pages to assemble"));
        }
        let output = self.command(pages, marks, out).output().map_err(|e| {
            DeckError::assembly(format!(
                "failed to spawn ghostscript (is it installed and on PATH?): {e}"
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeckError::assembly(format!(
                "ghostscript exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if !out.is_file() {
            return Err(DeckError::assembly(format!(
                "ghostscript did not produce '{}'",
                out.display()
            )));
        }
        Ok(())
    }
}

/// Return `true` when `program` can be invoked as Ghostscript.
pub fn is_ghostscript_on_path(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/ghostscript.rs"]
mod tests;
