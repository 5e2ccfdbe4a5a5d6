// Reads layout structure straight out of the geometry
//
// The input is a flat (or partially nested) list with no reliable
// parent/child pointers, so grids, alignment, and hierarchy are all
// reconstructed from bounding boxes alone.

use crate::analyzers::{ModuleReport, Scorer};
use crate::error::Result;
use crate::model::{Component, DesignContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Two edges within this many units sit on the same grid line
const ALIGN_TOLERANCE: f64 = 2.0;

// A grid needs at least this many distinct columns
const MIN_GRID_COLUMNS: usize = 2;

// Components at >= this share of the widest element count as full-width
const FULL_WIDTH_SHARE: f64 = 0.9;

/// An implicit column grid inferred from shared left edges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSystem {
    pub columns: usize,
    pub column_positions: Vec<f64>,
    pub gutter: f64,
    pub aligned_components: usize,
    pub confidence: f64,
}

/// Components sharing one edge or center coordinate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlignmentCluster {
    pub axis: String,
    pub position: f64,
    pub component_ids: Vec<String>,
}

/// Parent/child pair derived from geometric containment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Containment {
    pub parent_id: String,
    pub child_id: String,
}

/// Depth-ranked containment structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchicalStructure {
    pub levels: Vec<Vec<String>>,
    pub relationships: Vec<Containment>,
    pub depth: usize,
}

/// A responsive-behavior hint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponsivePattern {
    pub pattern_type: String,
    pub component_count: usize,
    pub confidence: f64,
}

/// Run counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutMetadata {
    pub components_seen: usize,
    pub components_with_geometry: usize,
}

/// Layout extractor output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutResult {
    pub grid_systems: Vec<GridSystem>,
    pub alignment_patterns: Vec<AlignmentCluster>,
    pub hierarchical_structure: HierarchicalStructure,
    pub responsive_patterns: Vec<ResponsivePattern>,
    pub metadata: LayoutMetadata,
    pub confidence: f64,
    pub error: Option<String>,
}

impl ModuleReport for LayoutResult {
    const NAME: &'static str = "layout";

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn set_error(&mut self, reason: String) {
        self.error = Some(reason);
    }
}

/// Detects grid, alignment, hierarchy, and responsive patterns from geometry
pub struct LayoutIntentExtractor;

impl LayoutIntentExtractor {
    /// Main entry - all four pattern families over one component list
    pub fn extract_layout_intent(
        components: &[Component],
        _context: &DesignContext,
    ) -> Result<LayoutResult> {
        let placed: Vec<&Component> = components.iter().filter(|c| c.has_geometry()).collect();

        let grid_systems = Self::detect_grid_systems(&placed);
        let alignment_patterns = Self::analyze_alignment_patterns(&placed);
        let hierarchical_structure = Self::extract_hierarchical_structure(&placed);
        let responsive_patterns = Self::detect_responsive_patterns(&placed);

        let mut confidence = Scorer::coverage(placed.len(), components.len()) * 0.6;
        if let Some(grid) = grid_systems.first() {
            confidence = Scorer::combine(confidence, grid.confidence * 0.5);
        }
        if !alignment_patterns.is_empty() {
            confidence = Scorer::combine(confidence, 0.2);
        }

        Ok(LayoutResult {
            grid_systems,
            alignment_patterns,
            hierarchical_structure,
            responsive_patterns,
            metadata: LayoutMetadata {
                components_seen: components.len(),
                components_with_geometry: placed.len(),
            },
            confidence: Scorer::clamp(confidence),
            error: None,
        })
    }

    /// Cluster left edges into columns and read a grid out of them
    fn detect_grid_systems(placed: &[&Component]) -> Vec<GridSystem> {
        if placed.len() < MIN_GRID_COLUMNS {
            return Vec::new();
        }

        let lefts: Vec<f64> = placed.iter().map(|c| c.geometry.x).collect();
        let clusters = cluster_values(&lefts);
        let columns: Vec<&(f64, usize)> =
            clusters.iter().filter(|(_, count)| *count >= 2).collect();

        if columns.len() < MIN_GRID_COLUMNS {
            return Vec::new();
        }

        let column_positions: Vec<f64> = columns.iter().map(|(pos, _)| *pos).collect();
        let aligned: usize = columns.iter().map(|(_, count)| *count).sum();

        let gutter = column_positions
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(f64::MAX, f64::min);

        vec![GridSystem {
            columns: column_positions.len(),
            gutter: if gutter == f64::MAX { 0.0 } else { gutter },
            column_positions,
            aligned_components: aligned,
            confidence: Scorer::coverage(aligned, placed.len()),
        }]
    }

    /// Group components sharing an edge or center coordinate
    fn analyze_alignment_patterns(placed: &[&Component]) -> Vec<AlignmentCluster> {
        let axes: [(&str, fn(&Component) -> f64); 5] = [
            ("left", |c| c.geometry.x),
            ("right", |c| c.geometry.x + c.geometry.width),
            ("center-x", |c| c.center().0),
            ("top", |c| c.geometry.y),
            ("center-y", |c| c.center().1),
        ];

        let mut patterns = Vec::new();
        for (axis, value_of) in axes {
            let values: Vec<f64> = placed.iter().map(|c| value_of(c)).collect();
            for (position, count) in cluster_values(&values) {
                if count < 2 {
                    continue;
                }
                let component_ids: Vec<String> = placed
                    .iter()
                    .filter(|c| (value_of(c) - position).abs() <= ALIGN_TOLERANCE)
                    .map(|c| c.id.clone())
                    .collect();
                patterns.push(AlignmentCluster {
                    axis: axis.to_string(),
                    position,
                    component_ids,
                });
            }
        }

        patterns
    }

    /// Containment-derived hierarchy: each node's parent is its smallest container
    fn extract_hierarchical_structure(placed: &[&Component]) -> HierarchicalStructure {
        let mut parent_of: HashMap<&str, &str> = HashMap::new();

        for child in placed {
            let parent = placed
                .iter()
                .filter(|candidate| candidate.id != child.id && candidate.contains(child))
                .min_by(|a, b| {
                    let area_a = a.geometry.width * a.geometry.height;
                    let area_b = b.geometry.width * b.geometry.height;
                    area_a.total_cmp(&area_b)
                });
            if let Some(parent) = parent {
                parent_of.insert(child.id.as_str(), parent.id.as_str());
            }
        }

        let mut levels: Vec<Vec<String>> = Vec::new();
        for component in placed {
            let depth = depth_of(&parent_of, component.id.as_str(), placed.len());
            while levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(component.id.clone());
        }

        // HashMap iteration order varies run to run; sort for stable output
        let mut relationships: Vec<Containment> = parent_of
            .iter()
            .map(|(child, parent)| Containment {
                parent_id: parent.to_string(),
                child_id: child.to_string(),
            })
            .collect();
        relationships.sort_by(|a, b| a.child_id.cmp(&b.child_id));

        HierarchicalStructure {
            depth: levels.len(),
            levels,
            relationships,
        }
    }

    /// Coarse responsive hints: stacked full-width rows, uniform card widths
    fn detect_responsive_patterns(placed: &[&Component]) -> Vec<ResponsivePattern> {
        let mut patterns = Vec::new();
        if placed.len() < 2 {
            return patterns;
        }

        let max_width = placed.iter().map(|c| c.geometry.width).fold(0.0, f64::max);
        let full_width = placed
            .iter()
            .filter(|c| c.geometry.width >= max_width * FULL_WIDTH_SHARE)
            .count();
        if full_width >= 2 {
            patterns.push(ResponsivePattern {
                pattern_type: "stacked-rows".to_string(),
                component_count: full_width,
                confidence: Scorer::coverage(full_width, placed.len()),
            });
        }

        // Many same-width siblings suggest a reflowable card grid
        let widths: Vec<f64> = placed.iter().map(|c| c.geometry.width).collect();
        if let Some((width, count)) = cluster_values(&widths)
            .into_iter()
            .max_by_key(|(_, count)| *count)
        {
            if count >= 3 && width < max_width * FULL_WIDTH_SHARE {
                patterns.push(ResponsivePattern {
                    pattern_type: "uniform-grid".to_string(),
                    component_count: count,
                    confidence: Scorer::coverage(count, placed.len()),
                });
            }
        }

        patterns
    }
}

/// Hops from a node to its outermost container
///
/// Containment is acyclic by area, but stay bounded anyway.
fn depth_of<'a>(parent_of: &HashMap<&'a str, &'a str>, mut id: &'a str, cap: usize) -> usize {
    let mut depth = 0;
    while let Some(parent) = parent_of.get(id) {
        depth += 1;
        id = *parent;
        if depth > cap {
            break;
        }
    }
    depth
}

/// Tolerance-cluster a value list into (representative, member count) pairs
fn cluster_values(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<(f64, usize)> = Vec::new();
    for value in sorted {
        match clusters.last_mut() {
            Some((representative, count)) if (value - *representative).abs() <= ALIGN_TOLERANCE => {
                *count += 1;
            }
            _ => clusters.push((value, 1)),
        }
    }
    clusters
}
