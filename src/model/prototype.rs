/// Prototype interaction data model
///
/// Interaction edges are the raw prototype wiring exported by the design
/// tool: "when trigger fires on source, go to target".

use serde::{Deserialize, Serialize};

/// One prototype edge between two nodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionEdge {
    pub id: String,
    pub trigger: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub transition_type: String,
}

/// Coarser structural hints exported alongside the edges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrototypeFlow {
    pub name: String,
    pub starting_frame: String,
}

/// Everything the prototype export gives us
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrototypeData {
    pub interactions: Vec<InteractionEdge>,
    pub prototypes: Vec<PrototypeFlow>,
    pub transitions: Vec<serde_json::Value>,
    pub flows: Vec<PrototypeFlow>,
}

impl PrototypeData {
    /// Starting-frame hints from both the prototypes and flows lists
    pub fn starting_frames(&self) -> impl Iterator<Item = &str> {
        self.prototypes
            .iter()
            .chain(&self.flows)
            .map(|f| f.starting_frame.as_str())
            .filter(|s| !s.is_empty())
    }
}
