//! Map Style Adapter
//!
//! Narrow capability interface over the consumed map object. The
//! coordinator only needs to enumerate style layers and rewrite the label
//! field of symbol layers; everything else the map engine does stays
//! behind this seam.

use serde_json::{json, Value};

/// Style layer kinds the coordinator distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Point/label layer, subject to language-driven relabeling
    Symbol,
    /// Any other layer type, left untouched
    Other,
}

/// One layer in the currently loaded map style
#[derive(Debug, Clone)]
pub struct StyleLayer {
    pub id: String,
    pub kind: LayerKind,
}

impl StyleLayer {
    pub fn symbol(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Symbol,
        }
    }

    pub fn other(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Other,
        }
    }
}

/// Capability interface over the map engine
pub trait MapStyle: Send {
    /// All layers in the currently loaded style
    fn style_layers(&self) -> Vec<StyleLayer>;

    /// Update a layout property of one layer
    fn set_layout_property(&mut self, layer_id: &str, name: &str, expression: Value);
}

/// Label expression sourcing the localized name property
pub fn label_expression(lang: &str) -> Value {
    json!(["get", format!("name_{lang}")])
}

/// Rewrite every symbol layer's label field for the given language
pub fn apply_language_labels(map: &mut dyn MapStyle, lang: &str) {
    for layer in map.style_layers() {
        if layer.kind == LayerKind::Symbol {
            map.set_layout_property(&layer.id, "text-field", label_expression(lang));
        }
    }
}
