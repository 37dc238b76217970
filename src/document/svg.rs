use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::document::style::{StyleSlot, find_style_slot, with_display};
use crate::foundation::core::{LayerId, VisibilitySet};
use crate::foundation::error::{DeckError, DeckResult};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

/// One visibility-toggleable layer of the source drawing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    /// Structural position (document pre-order).
    pub id: LayerId,
    /// `inkscape:label` of the layer group.
    pub label: String,
    /// XML `id` attribute, when present.
    pub element_id: Option<String>,
    tag_start: usize,
}

/// An Inkscape SVG drawing, indexed by its layers.
///
/// The source text is kept verbatim; per-page snapshots only rewrite the `style` attribute of
/// layer groups.
#[derive(Clone, Debug)]
pub struct LayerDocument {
    source: String,
    layers: Vec<Layer>,
    resources_dir: Option<PathBuf>,
}

impl LayerDocument {
    /// Read and index an SVG file.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> DeckResult<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("read svg document '{}'", path.display()))?;
        let mut doc = Self::from_svg_str(source)?;
        doc.resources_dir = path.parent().map(Path::to_path_buf);
        Ok(doc)
    }

    /// Index an SVG document held in memory.
    pub fn from_svg_str(source: impl Into<String>) -> DeckResult<Self> {
        let source = source.into();
        let layers = index_layers(&source)?;
        tracing::debug!(layers = layers.len(), "indexed svg layers");
        Ok(Self {
            source,
            layers,
            resources_dir: None,
        })
    }

    /// Layers in structural order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    /// Label of `id`, or an empty string for an unknown id.
    pub fn label(&self, id: LayerId) -> &str {
        self.layer(id).map(|l| l.label.as_str()).unwrap_or_default()
    }

    /// Directory of the source file, used to resolve fonts and linked images.
    pub fn resources_dir(&self) -> Option<&Path> {
        self.resources_dir.as_deref()
    }

    /// The unmodified source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Produce the document text with exactly the layers in `visible` displayed.
    pub fn snapshot(&self, visible: &VisibilitySet) -> DeckResult<String> {
        let mut out = String::with_capacity(self.source.len() + self.layers.len() * 24);
        let mut cursor = 0usize;

        for layer in &self.layers {
            let shown = visible.contains(layer.id);
            match find_style_slot(&self.source, layer.tag_start)? {
                StyleSlot::Existing(range) => {
                    out.push_str(&self.source[cursor..range.start]);
                    out.push_str(&with_display(&self.source[range.clone()], shown));
                    cursor = range.end;
                }
                StyleSlot::Missing(at) => {
                    out.push_str(&self.source[cursor..at]);
                    out.push_str(" style=\"");
                    out.push_str(&with_display("", shown));
                    out.push('"');
                    cursor = at;
                }
            }
        }
        out.push_str(&self.source[cursor..]);
        Ok(out)
    }
}

fn index_layers(source: &str) -> DeckResult<Vec<Layer>> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(source, opts)
        .map_err(|e| DeckError::structure(format!("invalid svg document: {e}")))?;

    let mut layers = Vec::new();
    for node in doc.descendants().filter(is_layer_group) {
        let id = LayerId(layers.len());
        let element_id = node.attribute("id").map(str::to_owned);
        let Some(label) = node.attribute((INKSCAPE_NS, "label")) else {
            let at = match &element_id {
                Some(eid) => format!("id '{eid}'"),
                None => format!("byte {}", node.range().start),
            };
            return Err(DeckError::structure(format!(
                "layer {} ({at}) has no inkscape:label",
                id.0
            )));
        };
        if layers.iter().any(|l: &Layer| l.label == label) {
            tracing::warn!(label, "duplicate layer label");
        }
        layers.push(Layer {
            id,
            label: label.to_owned(),
            element_id,
            tag_start: node.range().start,
        });
    }
    Ok(layers)
}

fn is_layer_group(node: &roxmltree::Node<'_, '_>) -> bool {
    if !node.is_element() {
        return false;
    }
    let tag = node.tag_name();
    let in_svg_ns = matches!(tag.namespace(), None | Some(SVG_NS));
    in_svg_ns && tag.name() == "g" && node.attribute((INKSCAPE_NS, "groupmode")) == Some("layer")
}

#[cfg(test)]
#[path = "../../tests/unit/document/svg.rs"]
mod tests;
