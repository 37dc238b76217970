use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::annotate::pdfmarks::DocInfo;
use crate::classify::roles::RoleNames;
use crate::foundation::error::{DeckError, DeckResult};

/// Compiler configuration. Every field has a default, so a partial JSON file is valid.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeckOptions {
    /// Output directory; `~` is expanded and the directory is created if absent.
    pub directory: PathBuf,
    /// Output file name; `.pdf` is appended when missing.
    pub output: String,
    /// Labels of the always-visible layers.
    #[serde(flatten)]
    pub roles: RoleNames,
    /// Document metadata.
    #[serde(flatten)]
    pub info: DocInfo,
    /// Keep the working directory (snapshots, page PDFs, pdfmarks) after the run.
    pub keep_temps: bool,
    /// Also store the pdfmark stream next to the output as `<output>.marks`.
    pub export_marks: bool,
    /// Export resolution passed to the renderer.
    pub dpi: u32,
    /// Paper size passed to the assembler.
    pub paper_size: String,
    /// Drive Inkscape with its 0.92 command line.
    pub inkscape_legacy_cli: bool,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("~/inkscape-output/"),
            output: "result".to_owned(),
            roles: RoleNames::default(),
            info: DocInfo::default(),
            keep_temps: false,
            export_marks: false,
            dpi: 300,
            paper_size: "a4".to_owned(),
            inkscape_legacy_cli: false,
        }
    }
}

impl DeckOptions {
    /// Load options from a JSON file.
    pub fn from_path(path: &Path) -> DeckResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        serde_json::from_str(&text).map_err(|e| {
            DeckError::config(format!("invalid options file '{}': {e}", path.display()))
        })
    }

    /// Output file name with the `.pdf` extension ensured.
    pub fn output_file_name(&self) -> DeckResult<String> {
        let name = self.output.trim();
        if name.is_empty() {
            return Err(DeckError::config("output name must be non-empty"));
        }
        let has_pdf_ext = Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        Ok(if has_pdf_ext {
            name.to_owned()
        } else {
            format!("{name}.pdf")
        })
    }

    /// Resolved output directory (not created).
    pub fn output_dir(&self) -> PathBuf {
        if self.directory.as_os_str().is_empty() {
            return PathBuf::from("./");
        }
        expand_home(&self.directory)
    }

    /// Create the output directory if needed and return the full output path.
    pub fn prepare_output(&self) -> DeckResult<PathBuf> {
        let dir = self.output_dir();
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                DeckError::config(format!(
                    "cannot create output directory '{}': {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(dir.join(self.output_file_name()?))
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/options.rs"]
mod tests;
