// Derives who is clickable and where the user can go
//
// Prototype edges are the hard evidence; semantic intents fill in the
// interactive components a designer never wired up.

use crate::analyzers::{ModuleReport, Scorer};
use crate::error::Result;
use crate::model::{Component, DesignContext, InteractionEdge, PrototypeData};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// Don't chase prototype chains forever; designs contain cycles
const MAX_JOURNEY_DEPTH: usize = 24;

// Semantic intents that count as interactive even without an edge
const INTERACTIVE_INTENTS: &[&str] = &["button", "input", "link", "toggle", "navigation"];

/// One component the user can act on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractiveComponent {
    pub id: String,
    pub name: String,
    pub intent: Option<String>,
    pub interaction_types: Vec<String>,
    pub target_ids: Vec<String>,
    pub confidence: f64,
}

/// A chained path through the prototype graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserJourney {
    pub name: String,
    pub node_ids: Vec<String>,
    pub steps: usize,
    pub reaches_terminal: bool,
}

/// Summary of the navigation graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationFlow {
    pub entry_points: Vec<String>,
    pub exit_points: Vec<String>,
    pub total_screens: usize,
    pub edge_count: usize,
}

/// Run counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionMetadata {
    pub edges_seen: usize,
    pub interactive_count: usize,
    pub journey_count: usize,
}

/// Interaction mapper output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionResult {
    pub interactive_components: Vec<InteractiveComponent>,
    pub user_journeys: Vec<UserJourney>,
    pub navigation_flow: NavigationFlow,
    pub metadata: InteractionMetadata,
    pub confidence: f64,
    pub error: Option<String>,
}

impl ModuleReport for InteractionResult {
    const NAME: &'static str = "interaction";

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn set_error(&mut self, reason: String) {
        self.error = Some(reason);
    }
}

/// Derives interactive components and navigation graphs from prototype edges
pub struct InteractionMapper;

impl InteractionMapper {
    /// Main entry - interactive components, journeys, and the flow summary
    pub fn map_interaction_flows(
        components: &[Component],
        prototype_data: &PrototypeData,
        _context: &DesignContext,
    ) -> Result<InteractionResult> {
        let edges = &prototype_data.interactions;
        let mut by_source: HashMap<&str, Vec<&InteractionEdge>> = HashMap::new();
        for edge in edges {
            if !edge.source_node_id.is_empty() {
                by_source.entry(edge.source_node_id.as_str()).or_default().push(edge);
            }
        }

        let interactive = Self::collect_interactive(components, &by_source);
        let journeys = Self::reconstruct_journeys(edges, &by_source, prototype_data);
        let flow = Self::summarize_flow(edges, &by_source);

        let confidence = if interactive.is_empty() {
            0.0
        } else {
            Scorer::clamp(
                interactive.iter().map(|i| i.confidence).sum::<f64>() / interactive.len() as f64,
            )
        };

        Ok(InteractionResult {
            metadata: InteractionMetadata {
                edges_seen: edges.len(),
                interactive_count: interactive.len(),
                journey_count: journeys.len(),
            },
            interactive_components: interactive,
            user_journeys: journeys,
            navigation_flow: flow,
            confidence,
            error: None,
        })
    }

    /// Edge sources plus intent-flagged components
    fn collect_interactive(
        components: &[Component],
        by_source: &HashMap<&str, Vec<&InteractionEdge>>,
    ) -> Vec<InteractiveComponent> {
        let mut interactive = Vec::new();

        for component in components {
            let edges = by_source.get(component.id.as_str());
            let intent = component.intent().map(str::to_string);
            let intent_interactive = intent
                .as_deref()
                .map_or(false, |i| INTERACTIVE_INTENTS.contains(&i));

            let (types, targets, confidence) = match edges {
                Some(edges) => {
                    let mut types: Vec<String> = edges
                        .iter()
                        .map(|e| Self::classify_trigger(e))
                        .collect();
                    types.sort();
                    types.dedup();
                    let targets: Vec<String> = edges
                        .iter()
                        .filter(|e| !e.target_node_id.is_empty())
                        .map(|e| e.target_node_id.clone())
                        .collect();
                    // Hard edge evidence; more edges, more certainty
                    let confidence = Scorer::clamp(0.6 + 0.1 * edges.len().min(3) as f64);
                    (types, targets, confidence)
                }
                None if intent_interactive => {
                    let semantic_confidence = component
                        .semantic
                        .as_ref()
                        .map_or(0.5, |s| s.confidence);
                    (
                        vec!["click".to_string()],
                        Vec::new(),
                        Scorer::clamp(0.3 + 0.4 * semantic_confidence),
                    )
                }
                None => continue,
            };

            interactive.push(InteractiveComponent {
                id: component.id.clone(),
                name: component.name.clone(),
                intent,
                interaction_types: types,
                target_ids: targets,
                confidence,
            });
        }

        interactive
    }

    /// Normalize a trigger string into an interaction type
    fn classify_trigger(edge: &InteractionEdge) -> String {
        let trigger = edge.trigger.to_uppercase();
        if trigger.contains("HOVER") {
            "hover".to_string()
        } else if trigger.contains("DRAG") {
            "drag".to_string()
        } else if trigger.contains("KEY") {
            "keypress".to_string()
        } else if trigger.contains("DELAY") || trigger.contains("TIMEOUT") {
            "auto".to_string()
        } else if edge.transition_type.to_uppercase().contains("NAVIGATE")
            || !edge.target_node_id.is_empty()
        {
            "navigate".to_string()
        } else {
            "click".to_string()
        }
    }

    /// Chain edges from start nodes through to terminals
    fn reconstruct_journeys(
        edges: &[InteractionEdge],
        by_source: &HashMap<&str, Vec<&InteractionEdge>>,
        prototype_data: &PrototypeData,
    ) -> Vec<UserJourney> {
        if edges.is_empty() {
            return Vec::new();
        }

        let targets: HashSet<&str> = edges
            .iter()
            .map(|e| e.target_node_id.as_str())
            .filter(|t| !t.is_empty())
            .collect();

        // Prefer declared starting frames; fall back to nodes nothing points at
        let mut starts: Vec<&str> = prototype_data
            .starting_frames()
            .filter(|f| by_source.contains_key(f))
            .collect();
        if starts.is_empty() {
            starts = by_source
                .keys()
                .filter(|source| !targets.contains(**source))
                .copied()
                .collect();
        }
        // Pure cycle: every source is also a target, so seed one start
        // deterministically instead of reporting no journeys at all
        if starts.is_empty() {
            starts.extend(by_source.keys().min().copied());
        }
        starts.sort();
        starts.dedup();

        let mut journeys = Vec::new();
        for (index, start) in starts.iter().enumerate() {
            let mut node_ids = vec![start.to_string()];
            let mut visited: HashSet<&str> = HashSet::from([*start]);
            let mut current = *start;
            let mut reaches_terminal = false;

            for _ in 0..MAX_JOURNEY_DEPTH {
                let Some(next) = by_source
                    .get(current)
                    .and_then(|edges| edges.iter().find(|e| !e.target_node_id.is_empty()))
                else {
                    reaches_terminal = true;
                    break;
                };
                let target = next.target_node_id.as_str();
                if !visited.insert(target) {
                    break; // cycle
                }
                node_ids.push(target.to_string());
                current = target;
                if !by_source.contains_key(target) {
                    reaches_terminal = true;
                    break;
                }
            }

            journeys.push(UserJourney {
                name: format!("journey-{}", index + 1),
                steps: node_ids.len().saturating_sub(1),
                node_ids,
                reaches_terminal,
            });
        }

        journeys
    }

    fn summarize_flow(
        edges: &[InteractionEdge],
        by_source: &HashMap<&str, Vec<&InteractionEdge>>,
    ) -> NavigationFlow {
        let targets: HashSet<&str> = edges
            .iter()
            .map(|e| e.target_node_id.as_str())
            .filter(|t| !t.is_empty())
            .collect();

        let mut entry_points: Vec<String> = by_source
            .keys()
            .filter(|source| !targets.contains(**source))
            .map(|s| s.to_string())
            .collect();
        entry_points.sort();

        let mut exit_points: Vec<String> = targets
            .iter()
            .filter(|t| !by_source.contains_key(**t))
            .map(|t| t.to_string())
            .collect();
        exit_points.sort();

        let mut all_nodes: HashSet<&str> = targets;
        all_nodes.extend(by_source.keys());

        NavigationFlow {
            entry_points,
            exit_points,
            total_screens: all_nodes.len(),
            edge_count: edges.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SemanticInfo;

    fn edge(id: &str, trigger: &str, source: &str, target: &str) -> InteractionEdge {
        InteractionEdge {
            id: id.to_string(),
            trigger: trigger.to_string(),
            source_node_id: source.to_string(),
            target_node_id: target.to_string(),
            transition_type: "NAVIGATE".to_string(),
        }
    }

    fn component(id: &str, intent: Option<&str>) -> Component {
        let mut c = Component {
            id: id.to_string(),
            name: format!("node {}", id),
            ..Default::default()
        };
        if let Some(intent) = intent {
            c.semantic = Some(SemanticInfo {
                intent: intent.to_string(),
                confidence: 0.8,
                ..Default::default()
            });
        }
        c
    }

    #[test]
    fn test_edge_source_is_interactive() {
        let components = vec![component("a", None), component("b", None)];
        let prototype = PrototypeData {
            interactions: vec![edge("e1", "ON_CLICK", "a", "b")],
            ..Default::default()
        };

        let result = InteractionMapper::map_interaction_flows(
            &components,
            &prototype,
            &DesignContext::default(),
        )
        .unwrap();

        assert_eq!(result.interactive_components.len(), 1);
        assert_eq!(result.interactive_components[0].id, "a");
        assert_eq!(result.interactive_components[0].interaction_types, vec!["navigate"]);
    }

    #[test]
    fn test_intent_only_component_is_interactive() {
        let components = vec![component("a", Some("button")), component("b", Some("text"))];

        let result = InteractionMapper::map_interaction_flows(
            &components,
            &PrototypeData::default(),
            &DesignContext::default(),
        )
        .unwrap();

        assert_eq!(result.interactive_components.len(), 1);
        assert_eq!(result.interactive_components[0].id, "a");
        assert!(result.interactive_components[0].confidence < 0.8);
    }

    #[test]
    fn test_journey_chains_to_terminal() {
        let prototype = PrototypeData {
            interactions: vec![
                edge("e1", "ON_CLICK", "a", "b"),
                edge("e2", "ON_CLICK", "b", "c"),
            ],
            ..Default::default()
        };

        let result = InteractionMapper::map_interaction_flows(
            &[],
            &prototype,
            &DesignContext::default(),
        )
        .unwrap();

        assert_eq!(result.user_journeys.len(), 1);
        let journey = &result.user_journeys[0];
        assert_eq!(journey.node_ids, vec!["a", "b", "c"]);
        assert_eq!(journey.steps, 2);
        assert!(journey.reaches_terminal);
    }

    #[test]
    fn test_cycle_yields_one_bounded_journey() {
        // a <-> b: no node is free of incoming edges, so the walk seeds
        // from the smallest source and stops when it revisits a node
        let prototype = PrototypeData {
            interactions: vec![
                edge("e1", "ON_CLICK", "a", "b"),
                edge("e2", "ON_CLICK", "b", "a"),
            ],
            ..Default::default()
        };

        let result = InteractionMapper::map_interaction_flows(
            &[],
            &prototype,
            &DesignContext::default(),
        )
        .unwrap();

        assert_eq!(result.user_journeys.len(), 1);
        let journey = &result.user_journeys[0];
        assert_eq!(journey.node_ids, vec!["a", "b"]);
        assert_eq!(journey.steps, 1);
        assert!(!journey.reaches_terminal);
        assert!(journey.node_ids.len() <= MAX_JOURNEY_DEPTH + 1);
    }

    #[test]
    fn test_empty_edges_yield_empty_collections() {
        let result = InteractionMapper::map_interaction_flows(
            &[],
            &PrototypeData::default(),
            &DesignContext::default(),
        )
        .unwrap();

        assert!(result.interactive_components.is_empty());
        assert!(result.user_journeys.is_empty());
        assert_eq!(result.navigation_flow.total_screens, 0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_starting_frame_hint_respected() {
        let prototype = PrototypeData {
            interactions: vec![
                edge("e1", "ON_CLICK", "a", "b"),
                edge("e2", "ON_CLICK", "b", "a"),
            ],
            flows: vec![crate::model::PrototypeFlow {
                name: "main".to_string(),
                starting_frame: "b".to_string(),
            }],
            ..Default::default()
        };

        let result = InteractionMapper::map_interaction_flows(
            &[],
            &prototype,
            &DesignContext::default(),
        )
        .unwrap();

        assert_eq!(result.user_journeys[0].node_ids[0], "b");
    }
}
