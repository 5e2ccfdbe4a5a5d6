/// Data model
///
/// Typed rendition of the design-tree input and the engine's shared types.
/// Everything deserializes leniently: missing fields default, unknown enum
/// values map to Other, and style attributes live in a tolerant bag.

pub mod component;
pub mod context;
pub mod prototype;
pub mod tokens;

pub use component::{Component, ComponentKind, Geometry, SemanticInfo, StyleBag};
pub use context::{AnalysisOptions, DesignContext, DesignSpec};
pub use prototype::{InteractionEdge, PrototypeData, PrototypeFlow};
pub use tokens::{DesignTokenSet, TokenRecord};
