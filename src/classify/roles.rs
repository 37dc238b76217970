use crate::document::svg::Layer;
use crate::foundation::core::{LayerId, VisibilitySet};

/// Label prefix marking a layer that never becomes a page and is never shown.
pub const HIDDEN_MARKER: char = '#';

/// Derived role of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Always visible, matched by the configured background label.
    Background,
    /// Always visible, matched by the configured foreground label.
    Foreground,
    /// Label starts with [`HIDDEN_MARKER`].
    Hidden,
    /// Eligible to become a page.
    Content,
}

impl Role {
    /// Whether layers with this role are shown on every page.
    pub fn is_always_visible(self) -> bool {
        matches!(self, Self::Background | Self::Foreground)
    }
}

/// Labels of the two always-visible layers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RoleNames {
    /// Background layer label.
    pub background: String,
    /// Foreground layer label.
    pub foreground: String,
}

impl Default for RoleNames {
    fn default() -> Self {
        Self {
            background: "background".to_owned(),
            foreground: "foreground".to_owned(),
        }
    }
}

impl RoleNames {
    /// Role of a single label. The always-visible check wins over the hidden marker.
    pub fn role_of(&self, label: &str) -> Role {
        if label == self.background {
            Role::Background
        } else if label == self.foreground {
            Role::Foreground
        } else if label.starts_with(HIDDEN_MARKER) {
            Role::Hidden
        } else {
            Role::Content
        }
    }
}

/// Partition of a document's layers by role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    roles: Vec<Role>,
    always_visible: VisibilitySet,
    content: Vec<LayerId>,
    hidden: Vec<LayerId>,
}

impl Classification {
    /// Classify `layers` (in structural order) against `names`.
    pub fn new(layers: &[Layer], names: &RoleNames) -> Self {
        let mut out = Self::default();
        for layer in layers {
            let role = names.role_of(&layer.label);
            match role {
                Role::Background | Role::Foreground => out.always_visible.insert(layer.id),
                Role::Hidden => out.hidden.push(layer.id),
                Role::Content => out.content.push(layer.id),
            }
            out.roles.push(role);
        }
        tracing::debug!(
            always_visible = out.always_visible.len(),
            content = out.content.len(),
            hidden = out.hidden.len(),
            "classified layers"
        );
        out
    }

    /// Role of `id`, if it is part of the classified document.
    pub fn role(&self, id: LayerId) -> Option<Role> {
        self.roles.get(id.0).copied()
    }

    /// Background and foreground layers. This is also the resting visibility between pages.
    pub fn always_visible(&self) -> &VisibilitySet {
        &self.always_visible
    }

    /// Content layers in structural order.
    pub fn content(&self) -> &[LayerId] {
        &self.content
    }

    /// Hidden (`#`-prefixed) layers in structural order.
    pub fn hidden(&self) -> &[LayerId] {
        &self.hidden
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/roles.rs"]
mod tests;
