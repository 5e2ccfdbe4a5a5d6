// Merges five module results into one judgement
//
// Fixed-weight confidence combination, short natural-language insights, a
// small business-scenario catalog, and severity-bucketed recommendations.

use crate::analyzers::{
    AccessibilityResult, Finding, InteractionResult, LayoutResult, ModuleReport, Scorer,
    SemanticResult, Severity, TokenResult,
};
use serde::{Deserialize, Serialize};

// A scenario must clear this share of its keyword list to be believed
const SCENARIO_MATCH_THRESHOLD: f64 = 0.3;

/// Business scenarios matched against detected patterns and intents
const SCENARIOS: &[(&str, &[&str])] = &[
    ("authentication", &["authentication", "form", "input", "button"]),
    ("data entry", &["form", "input", "button", "toggle"]),
    ("navigation hub", &["navigation", "card-collection", "link", "navigate"]),
    ("content browsing", &["list", "card-collection", "image", "card"]),
];

/// Per-module weights used for the overall confidence
///
/// Policy, not contract: tune here without touching module logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesisWeights {
    pub semantic: f64,
    pub interaction: f64,
    pub accessibility: f64,
    pub tokens: f64,
    pub layout: f64,
}

impl Default for SynthesisWeights {
    fn default() -> Self {
        Self {
            semantic: 0.25,
            interaction: 0.20,
            accessibility: 0.20,
            tokens: 0.175,
            layout: 0.175,
        }
    }
}

/// Inferred primary function with its supporting evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessLogic {
    pub primary_function: String,
    pub confidence: f64,
    pub supporting_evidence: Vec<String>,
}

impl Default for BusinessLogic {
    fn default() -> Self {
        Self {
            primary_function: "general interface".to_string(),
            confidence: 0.0,
            supporting_evidence: Vec::new(),
        }
    }
}

/// The cross-module summary block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Synthesis {
    pub overall_confidence: f64,
    pub key_insights: Vec<String>,
    pub business_logic: BusinessLogic,
}

/// One prioritized recommendation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recommendation {
    pub category: String,
    pub description: String,
    pub action: String,
    pub impact: String,
}

impl From<&Finding> for Recommendation {
    fn from(finding: &Finding) -> Self {
        Self {
            category: finding.category.clone(),
            description: finding.description.clone(),
            action: finding.action.clone(),
            impact: finding.impact.clone(),
        }
    }
}

/// The four priority buckets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recommendations {
    pub critical: Vec<Recommendation>,
    pub important: Vec<Recommendation>,
    pub suggested: Vec<Recommendation>,
    pub enhancements: Vec<Recommendation>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty()
            && self.important.is_empty()
            && self.suggested.is_empty()
            && self.enhancements.is_empty()
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Recommendation> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.important,
            Severity::Medium => &mut self.suggested,
            Severity::Low => &mut self.enhancements,
        }
    }
}

/// Run metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunMetadata {
    pub analysis_id: String,
    pub analysis_time_ms: u64,
    pub components_analyzed: usize,
}

/// The engine's complete output; immutable once returned
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesizedContext {
    pub semantic: SemanticResult,
    pub interaction: InteractionResult,
    pub accessibility: AccessibilityResult,
    pub tokens: TokenResult,
    pub layout: LayoutResult,
    pub synthesis: Synthesis,
    pub recommendations: Recommendations,
    pub metadata: RunMetadata,
}

/// Combine the five module results into the synthesis + recommendation blocks
pub fn synthesize(
    semantic: &SemanticResult,
    interaction: &InteractionResult,
    accessibility: &AccessibilityResult,
    tokens: &TokenResult,
    layout: &LayoutResult,
    weights: &SynthesisWeights,
) -> (Synthesis, Recommendations) {
    let overall_confidence = Scorer::weighted_mean(&[
        (semantic.confidence(), weights.semantic),
        (interaction.confidence(), weights.interaction),
        (accessibility.confidence(), weights.accessibility),
        (tokens.confidence(), weights.tokens),
        (layout.confidence(), weights.layout),
    ]);

    let business_logic = infer_business_logic(semantic, interaction);
    let key_insights =
        generate_insights(semantic, interaction, accessibility, tokens, layout);
    let recommendations = bucket_recommendations(accessibility, tokens, interaction, layout);

    (
        Synthesis {
            overall_confidence,
            key_insights,
            business_logic,
        },
        recommendations,
    )
}

/// Tags observed across modules: pattern types, intents, interaction kinds
fn observed_tags(semantic: &SemanticResult, interaction: &InteractionResult) -> Vec<String> {
    let mut tags: Vec<String> = semantic
        .patterns
        .iter()
        .map(|p| p.pattern_type.clone())
        .collect();
    tags.extend(semantic.components.iter().map(|c| c.intent.clone()));
    for component in &interaction.interactive_components {
        tags.extend(component.interaction_types.iter().cloned());
    }
    tags.sort();
    tags.dedup();
    tags
}

/// Match observed tags against the scenario catalog
fn infer_business_logic(
    semantic: &SemanticResult,
    interaction: &InteractionResult,
) -> BusinessLogic {
    let tags = observed_tags(semantic, interaction);

    let mut best = BusinessLogic::default();
    for (name, keywords) in SCENARIOS {
        let matched: Vec<&str> = keywords
            .iter()
            .filter(|k| tags.iter().any(|t| t == *k))
            .copied()
            .collect();
        let score = Scorer::coverage(matched.len(), keywords.len());

        // Scenario-defining tags are mandatory: "authentication" needs the
        // authentication pattern itself, not just its surrounding widgets
        if !tags.iter().any(|t| t == keywords[0]) {
            continue;
        }

        if score >= SCENARIO_MATCH_THRESHOLD && score > best.confidence {
            best = BusinessLogic {
                primary_function: name.to_string(),
                confidence: score,
                supporting_evidence: matched
                    .iter()
                    .map(|k| format!("detected '{}'", k))
                    .collect(),
            };
        }
    }

    best
}

/// Short natural-language summaries of the notable findings
fn generate_insights(
    semantic: &SemanticResult,
    interaction: &InteractionResult,
    accessibility: &AccessibilityResult,
    tokens: &TokenResult,
    layout: &LayoutResult,
) -> Vec<String> {
    let mut insights = Vec::new();

    for pattern in &semantic.patterns {
        insights.push(format!(
            "detected {} pattern across {} components",
            pattern.pattern_type,
            pattern.component_ids.len()
        ));
    }

    if !interaction.interactive_components.is_empty() {
        insights.push(format!(
            "{} interactive elements and {} user journeys",
            interaction.interactive_components.len(),
            interaction.user_journeys.len()
        ));
    }

    if accessibility.compliance.overall < 0.6 && !accessibility.issues.is_empty() {
        insights.push(format!(
            "accessibility compliance is low ({:.0}%) with {} open issues",
            accessibility.compliance.overall * 100.0,
            accessibility.issues.len()
        ));
    }

    if tokens.system_detection.detected_system != "Custom" {
        insights.push(format!(
            "token naming follows {} conventions",
            tokens.system_detection.detected_system
        ));
    }

    if let Some(grid) = layout.grid_systems.first() {
        insights.push(format!(
            "layout aligns to an implicit {}-column grid",
            grid.columns
        ));
    }

    insights
}

/// Merge per-module findings into the four priority buckets
fn bucket_recommendations(
    accessibility: &AccessibilityResult,
    tokens: &TokenResult,
    interaction: &InteractionResult,
    layout: &LayoutResult,
) -> Recommendations {
    let mut recommendations = Recommendations::default();

    for finding in accessibility.issues.iter().chain(&tokens.findings) {
        recommendations
            .bucket_mut(finding.severity)
            .push(Recommendation::from(finding));
    }

    // Wired-up edges but no completable journey is worth a nudge
    if interaction.metadata.edges_seen > 0 && interaction.user_journeys.is_empty() {
        recommendations.suggested.push(Recommendation {
            category: "interaction".to_string(),
            description: "Prototype edges exist but no journey could be reconstructed".to_string(),
            action: "Mark a starting frame or break interaction cycles".to_string(),
            impact: "Flows are hard to follow for reviewers and handoff".to_string(),
        });
    }

    if layout.metadata.components_with_geometry >= 6 && layout.grid_systems.is_empty() {
        recommendations.enhancements.push(Recommendation {
            category: "layout".to_string(),
            description: "No shared column grid detected across placed components".to_string(),
            action: "Align components to a consistent column grid".to_string(),
            impact: "Grids simplify responsive behavior and visual rhythm".to_string(),
        });
    }

    // A clean run still returns something actionable
    if recommendations.is_empty() {
        recommendations.enhancements.push(Recommendation {
            category: "general".to_string(),
            description: "No significant issues detected".to_string(),
            action: "Maintain current design standards".to_string(),
            impact: "Keeps the design consistent as it evolves".to_string(),
        });
    }

    recommendations
}
