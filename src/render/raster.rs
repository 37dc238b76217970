use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{DeckError, DeckResult};
use crate::render::backend::{PageArtifact, PageSnapshot, Renderer};

/// Options for [`RasterRenderer`].
#[derive(Clone, Debug)]
pub struct RasterOpts {
    /// Pixels per SVG user unit.
    pub scale: f32,
    /// Optional opaque backdrop (straight RGBA8). Transparent when `None`.
    pub backdrop: Option<[u8; 4]>,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            scale: 1.0,
            backdrop: None,
        }
    }
}

/// In-process preview renderer: rasterizes each snapshot with `resvg` and writes a PNG.
///
/// Pages are written as `<out_dir>/<base>-NNN.png`.
pub struct RasterRenderer {
    out_dir: PathBuf,
    base: String,
    opts: RasterOpts,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl RasterRenderer {
    /// Create a renderer writing PNG pages named after `base` into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>, base: impl Into<String>, opts: RasterOpts) -> Self {
        Self {
            out_dir: out_dir.into(),
            base: base.into(),
            opts,
            fontdb: None,
        }
    }

    fn fontdb(&mut self, resources_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_insert_with(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                if let Some(dir) = resources_dir {
                    load_fonts_from_dir(&mut db, dir);
                    load_fonts_from_dir(&mut db, &dir.join("fonts"));
                }
                Arc::new(db)
            })
            .clone()
    }

    fn rasterize(&mut self, snapshot: &PageSnapshot<'_>) -> DeckResult<(u32, u32, Vec<u8>)> {
        let opts = usvg::Options {
            resources_dir: snapshot.resources_dir.map(Path::to_path_buf),
            fontdb: self.fontdb(snapshot.resources_dir),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(snapshot.svg, &opts).context("parse page snapshot")?;

        let scale = self.opts.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DeckError::config("raster scale must be finite and > 0"));
        }
        let (width, height) = raster_size(tree.size().width(), tree.size().height(), scale)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| DeckError::validation("failed to allocate page pixmap"))?;
        if let Some([r, g, b, a]) = self.opts.backdrop {
            pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));
        }
        let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        let mut rgba = pixmap.take();
        unpremultiply_rgba8_in_place(&mut rgba);
        Ok((width, height, rgba))
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, snapshot: &PageSnapshot<'_>) -> DeckResult<PageArtifact> {
        let page = snapshot.page;
        let (width, height, rgba) = self
            .rasterize(snapshot)
            .map_err(|e| DeckError::render(page.index.0, &page.title, format!("{e:#}")))?;

        let path = self
            .out_dir
            .join(format!("{}-{:03}.png", self.base, page.index.number()));
        image::save_buffer_with_format(
            &path,
            &rgba,
            width,
            height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;

        tracing::debug!(page = page.index.number(), width, height, "rasterized page");
        Ok(PageArtifact {
            index: page.index,
            path,
        })
    }
}

fn raster_size(width: f32, height: f32, scale: f32) -> DeckResult<(u32, u32)> {
    fn to_px(v: f32) -> DeckResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(DeckError::validation("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let w = to_px(width * scale)?;
    let h = to_px(height * scale)?;

    const MAX_DIM: u32 = 16_384;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(DeckError::validation(format!(
            "page raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Register the font files sitting directly in `dir` (no recursion) so decks can ship their own
/// typefaces next to the SVG. Unreadable directories and broken font files are skipped.
fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let is_font = |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
    };

    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_file() && is_font(&path) && db.load_font_file(&path).is_err() {
            tracing::debug!(font = %path.display(), "skipping unreadable font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
