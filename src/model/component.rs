/// Component tree data model
///
/// Components arrive from an external design-tree source (Figma-shaped JSON).
/// Every field is serde-defaulted so a sparse or malformed node still
/// deserializes into something the analyzers can work with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of the design's structural tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub category: Option<String>,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub style: StyleBag,
    /// Populated by the semantic pass; input components arrive with None
    pub semantic: Option<SemanticInfo>,
}

impl Component {
    /// Center point of the component, for alignment clustering
    pub fn center(&self) -> (f64, f64) {
        (
            self.geometry.x + self.geometry.width / 2.0,
            self.geometry.y + self.geometry.height / 2.0,
        )
    }

    /// True when geometry carries real data (absent geometry defaults to 0)
    pub fn has_geometry(&self) -> bool {
        self.geometry.width > 0.0 && self.geometry.height > 0.0
    }

    /// Intent assigned by the semantic pass, if any
    pub fn intent(&self) -> Option<&str> {
        self.semantic.as_ref().map(|s| s.intent.as_str())
    }

    /// True when this component fully contains the other's bounding box
    pub fn contains(&self, other: &Component) -> bool {
        let a = &self.geometry;
        let b = &other.geometry;
        self.has_geometry()
            && other.has_geometry()
            && a.x <= b.x
            && a.y <= b.y
            && a.x + a.width >= b.x + b.width
            && a.y + a.height >= b.y + b.height
            && a.width * a.height > b.width * b.height
    }
}

/// Node type as reported by the design tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "FRAME", alias = "Frame")]
    Frame,
    #[serde(rename = "COMPONENT", alias = "Component")]
    Component,
    #[serde(rename = "INSTANCE", alias = "Instance")]
    Instance,
    #[serde(rename = "TEXT", alias = "Text")]
    Text,
    #[serde(rename = "VECTOR", alias = "Vector")]
    Vector,
    #[serde(rename = "GROUP", alias = "Group")]
    Group,
    #[default]
    #[serde(other)]
    Other,
}

/// Bounding box; zero means "not supplied"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

/// Free-form visual attribute bag (fills, typography, radius, ...)
///
/// Never assume any key exists; the accessors return Options and swallow
/// mistyped values instead of erroring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleBag(pub BTreeMap<String, serde_json::Value>);

impl StyleBag {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String value under `key`, if present and actually a string
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Numeric value under `key`, accepting integers and floats
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(|v| v.as_f64())
    }

    /// First hex color found under any of the given keys
    fn color_from(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.text(k))
            .find(|v| v.starts_with('#'))
    }

    /// Background/fill color, checking the usual key spellings
    pub fn background_color(&self) -> Option<&str> {
        self.color_from(&["backgroundColor", "background", "fill", "fillColor"])
    }

    /// Foreground/text color
    pub fn text_color(&self) -> Option<&str> {
        self.color_from(&["textColor", "color", "foreground"])
    }

    pub fn font_size(&self) -> Option<f64> {
        self.number("fontSize").or_else(|| self.number("font_size"))
    }

    pub fn font_weight(&self) -> Option<f64> {
        self.number("fontWeight")
    }

    pub fn corner_radius(&self) -> Option<f64> {
        self.number("cornerRadius")
            .or_else(|| self.number("borderRadius"))
    }

    /// Alternative-text-ish annotation for images and icons
    pub fn alt_text(&self) -> Option<&str> {
        self.text("altText")
            .or_else(|| self.text("alt"))
            .or_else(|| self.text("accessibilityLabel"))
    }

    /// Spacing-ish values (padding, gap) used for token coverage
    pub fn spacing_values(&self) -> Vec<f64> {
        ["padding", "paddingX", "paddingY", "gap", "itemSpacing"]
            .iter()
            .filter_map(|k| self.number(k))
            .collect()
    }
}

/// Semantic enrichment appended by the semantic analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SemanticInfo {
    pub intent: String,
    pub confidence: f64,
    pub patterns: Vec<String>,
    pub reasoning: String,
}
