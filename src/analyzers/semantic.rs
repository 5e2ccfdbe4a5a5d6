// Figures out what each component is *for*
//
// Like when a 160x48 rounded rectangle with a solid fill named "CTA" is
// obviously a button, or two fields plus a "Sign in" button are a login form.

use crate::analyzers::{ModuleReport, Scorer};
use crate::error::Result;
use crate::model::{Component, ComponentKind, DesignContext, SemanticInfo};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Exact word match in a component name is strong evidence
const NAME_WORD_CONFIDENCE: f64 = 0.85;

// Keyword buried inside the name is weaker
const NAME_SUBSTRING_CONFIDENCE: f64 = 0.6;

// Fuzzy near-miss ("Botton", "serch bar") is weaker still
const NAME_FUZZY_CONFIDENCE: f64 = 0.4;
const FUZZY_SCORE_THRESHOLD: i64 = 60;

// A human-assigned category label is the strongest naming signal we get
const CATEGORY_CONFIDENCE: f64 = 0.9;

/// Curated intent vocabularies matched against component names
const INTENT_VOCABULARY: &[(&str, &[&str])] = &[
    ("button", &["button", "btn", "cta", "submit", "action"]),
    (
        "input",
        &[
            "input", "field", "textfield", "textbox", "search", "password", "email", "username",
        ],
    ),
    (
        "navigation",
        &[
            "nav", "navbar", "menu", "tab", "breadcrumb", "sidebar", "header", "footer",
        ],
    ),
    ("link", &["link", "anchor", "hyperlink"]),
    ("toggle", &["toggle", "switch", "checkbox", "radio", "slider"]),
    (
        "text",
        &["label", "title", "heading", "caption", "paragraph", "subtitle"],
    ),
    (
        "image",
        &["image", "img", "photo", "avatar", "icon", "logo", "illustration"],
    ),
    ("card", &["card", "tile", "panel"]),
    ("list", &["list", "row", "item", "table"]),
    ("modal", &["modal", "dialog", "popup", "overlay", "tooltip"]),
    (
        "container",
        &["frame", "group", "container", "section", "wrapper", "screen", "page"],
    ),
];

// Name words that smell like authentication, for pattern detection
const AUTH_HINTS: &[&str] = &["password", "login", "log in", "signin", "sign in", "auth", "signup", "sign up"];

/// Intent classification for one component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentIntent {
    pub id: String,
    pub name: String,
    pub intent: String,
    pub confidence: f64,
    pub patterns: Vec<String>,
    pub reasoning: String,
}

/// A recurring co-occurrence of intents across components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectedPattern {
    pub pattern_type: String,
    pub component_ids: Vec<String>,
    pub confidence: f64,
}

/// Per-source confidence breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SemanticConfidence {
    pub overall: f64,
    pub naming: f64,
    pub visual: f64,
}

/// Semantic analyzer output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SemanticResult {
    pub components: Vec<ComponentIntent>,
    pub patterns: Vec<DetectedPattern>,
    pub confidence: SemanticConfidence,
    pub error: Option<String>,
}

impl ModuleReport for SemanticResult {
    const NAME: &'static str = "semantic";

    fn confidence(&self) -> f64 {
        self.confidence.overall
    }

    fn set_error(&mut self, reason: String) {
        self.error = Some(reason);
    }
}

/// One signal-source vote for an intent
struct Candidate {
    intent: &'static str,
    confidence: f64,
    reason: String,
}

/// Classifies each component's functional intent
pub struct SemanticAnalyzer {
    matcher: SkimMatcherV2,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Main entry - classify every component, then look for cross-component patterns
    pub fn analyze_semantic_intent(
        &self,
        components: &[Component],
        _context: &DesignContext,
    ) -> Result<SemanticResult> {
        let mut intents = Vec::with_capacity(components.len());
        let mut naming_sum = 0.0;
        let mut visual_sum = 0.0;

        for component in components {
            let naming = self.analyze_naming_signals(component);
            let visual = Self::analyze_visual_signals(component);

            naming_sum += naming.as_ref().map_or(0.0, |c| c.confidence);
            visual_sum += visual.as_ref().map_or(0.0, |c| c.confidence);

            intents.push(Self::pick_intent(component, naming, visual));
        }

        let patterns = Self::detect_patterns(components, &intents);

        // Tag each component with the patterns it participates in
        for pattern in &patterns {
            for intent in intents.iter_mut() {
                if pattern.component_ids.contains(&intent.id) {
                    intent.patterns.push(pattern.pattern_type.clone());
                }
            }
        }

        let count = components.len();
        let overall = if count == 0 {
            0.0
        } else {
            Scorer::clamp(intents.iter().map(|i| i.confidence).sum::<f64>() / count as f64)
        };

        Ok(SemanticResult {
            components: intents,
            patterns,
            confidence: SemanticConfidence {
                overall,
                naming: Scorer::coverage_mean(naming_sum, count),
                visual: Scorer::coverage_mean(visual_sum, count),
            },
            error: None,
        })
    }

    /// Naming signal: keyword matching against curated vocabularies
    fn analyze_naming_signals(&self, component: &Component) -> Option<Candidate> {
        let name = component.name.to_lowercase();
        let words: Vec<&str> = name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let category = component.category.as_deref().map(str::to_lowercase);

        let mut best: Option<Candidate> = None;

        for (intent, keywords) in INTENT_VOCABULARY {
            for keyword in *keywords {
                let confidence = if category.as_deref() == Some(*intent)
                    || category.as_deref() == Some(*keyword)
                {
                    CATEGORY_CONFIDENCE
                } else if words.contains(keyword) {
                    NAME_WORD_CONFIDENCE
                } else if !name.is_empty() && name.contains(keyword) {
                    NAME_SUBSTRING_CONFIDENCE
                } else if keyword.len() >= 4
                    && self
                        .matcher
                        .fuzzy_match(&name, keyword)
                        .is_some_and(|s| s >= FUZZY_SCORE_THRESHOLD)
                {
                    NAME_FUZZY_CONFIDENCE
                } else {
                    continue;
                };

                // Longer keywords are more specific
                let confidence = Scorer::clamp(confidence + keyword.len() as f64 * 0.005);

                if best.as_ref().map_or(true, |b| confidence > b.confidence) {
                    best = Some(Candidate {
                        intent,
                        confidence,
                        reason: format!("name matches '{}'", keyword),
                    });
                }
            }
        }

        best
    }

    /// Visual signal: geometry and style heuristics, no name involved
    fn analyze_visual_signals(component: &Component) -> Option<Candidate> {
        match component.kind {
            ComponentKind::Text => {
                return Some(Candidate {
                    intent: "text",
                    confidence: 0.75,
                    reason: "text node".to_string(),
                })
            }
            ComponentKind::Vector => {
                return Some(Candidate {
                    intent: "image",
                    confidence: 0.55,
                    reason: "vector node".to_string(),
                })
            }
            _ => {}
        }

        if !component.has_geometry() {
            return None;
        }

        let g = component.geometry;
        let aspect = g.width / g.height;
        let style = &component.style;

        // Button-shaped: short, wider than tall, solid fill, usually rounded
        if (24.0..=80.0).contains(&g.height)
            && (40.0..=400.0).contains(&g.width)
            && aspect >= 1.2
            && style.background_color().is_some()
        {
            let rounded = style.corner_radius().is_some_and(|r| r >= 2.0);
            return Some(Candidate {
                intent: "button",
                confidence: if rounded { 0.6 } else { 0.5 },
                reason: "button-shaped filled rectangle".to_string(),
            });
        }

        // Input-shaped: long short strip, no strong fill requirement
        if (28.0..=64.0).contains(&g.height) && g.width >= 160.0 && aspect >= 3.5 {
            return Some(Candidate {
                intent: "input",
                confidence: 0.4,
                reason: "wide short field shape".to_string(),
            });
        }

        // Big frames and groups hold other things
        if matches!(component.kind, ComponentKind::Frame | ComponentKind::Group)
            && g.width * g.height >= 40_000.0
        {
            return Some(Candidate {
                intent: "container",
                confidence: 0.45,
                reason: "large frame".to_string(),
            });
        }

        None
    }

    /// Best candidate across both sources; agreement boosts confidence
    fn pick_intent(
        component: &Component,
        naming: Option<Candidate>,
        visual: Option<Candidate>,
    ) -> ComponentIntent {
        let (intent, confidence, reasoning) = match (naming, visual) {
            (Some(n), Some(v)) if n.intent == v.intent => (
                n.intent,
                Scorer::combine(n.confidence, v.confidence),
                format!("{}; {}", n.reason, v.reason),
            ),
            (Some(n), Some(v)) => {
                // Disagreement: take the stronger source as-is
                if n.confidence >= v.confidence {
                    (n.intent, n.confidence, n.reason)
                } else {
                    (v.intent, v.confidence, v.reason)
                }
            }
            (Some(n), None) => (n.intent, n.confidence, n.reason),
            (None, Some(v)) => (v.intent, v.confidence, v.reason),
            (None, None) => {
                // No evidence at all still yields a guess
                if matches!(
                    component.kind,
                    ComponentKind::Frame | ComponentKind::Group | ComponentKind::Instance
                ) {
                    ("container", 0.3, "no signals; frame-like node".to_string())
                } else {
                    ("unknown", 0.1, "no signals".to_string())
                }
            }
        };

        ComponentIntent {
            id: component.id.clone(),
            name: component.name.clone(),
            intent: intent.to_string(),
            confidence: Scorer::clamp(confidence),
            patterns: Vec::new(),
            reasoning,
        }
    }

    /// Cross-component patterns from intent co-occurrence
    fn detect_patterns(components: &[Component], intents: &[ComponentIntent]) -> Vec<DetectedPattern> {
        let mut by_intent: HashMap<&str, Vec<&ComponentIntent>> = HashMap::new();
        for intent in intents {
            by_intent.entry(intent.intent.as_str()).or_default().push(intent);
        }

        let ids = |intent: &str| -> Vec<String> {
            by_intent
                .get(intent)
                .map(|v| v.iter().map(|i| i.id.clone()).collect())
                .unwrap_or_default()
        };

        let inputs = by_intent.get("input").map_or(0, |v| v.len());
        let buttons = by_intent.get("button").map_or(0, |v| v.len());
        let navs = by_intent.get("navigation").map_or(0, |v| v.len());
        let cards = by_intent.get("card").map_or(0, |v| v.len());
        let lists = by_intent.get("list").map_or(0, |v| v.len());

        let mut patterns = Vec::new();

        if inputs >= 1 && buttons >= 1 {
            let mut component_ids = ids("input");
            component_ids.extend(ids("button"));
            patterns.push(DetectedPattern {
                pattern_type: "form".to_string(),
                confidence: Scorer::evidence_confidence(inputs + buttons, 4, 0.9),
                component_ids: component_ids.clone(),
            });

            let auth_hint = components.iter().any(|c| {
                let name = c.name.to_lowercase();
                AUTH_HINTS.iter().any(|h| name.contains(h))
            });
            if auth_hint {
                patterns.push(DetectedPattern {
                    pattern_type: "authentication".to_string(),
                    confidence: Scorer::evidence_confidence(inputs + buttons + 1, 4, 0.95),
                    component_ids,
                });
            }
        }

        if navs >= 2 {
            patterns.push(DetectedPattern {
                pattern_type: "navigation".to_string(),
                confidence: Scorer::evidence_confidence(navs, 4, 0.85),
                component_ids: ids("navigation"),
            });
        }

        if cards >= 3 {
            patterns.push(DetectedPattern {
                pattern_type: "card-collection".to_string(),
                confidence: Scorer::evidence_confidence(cards, 6, 0.85),
                component_ids: ids("card"),
            });
        }

        if lists >= 3 {
            patterns.push(DetectedPattern {
                pattern_type: "list".to_string(),
                confidence: Scorer::evidence_confidence(lists, 6, 0.8),
                component_ids: ids("list"),
            });
        }

        patterns
    }
}

/// Merge semantic intents back onto a fresh copy of the component list
///
/// Enrichment is append-only: geometry, id, and name are untouched; downstream
/// analyzers receive this augmented list instead of mutated shared state.
pub fn augment_components(components: &[Component], result: &SemanticResult) -> Vec<Component> {
    let by_id: HashMap<&str, &ComponentIntent> = result
        .components
        .iter()
        .map(|i| (i.id.as_str(), i))
        .collect();

    components
        .iter()
        .map(|c| {
            let mut component = c.clone();
            if let Some(intent) = by_id.get(c.id.as_str()) {
                component.semantic = Some(SemanticInfo {
                    intent: intent.intent.clone(),
                    confidence: intent.confidence,
                    patterns: intent.patterns.clone(),
                    reasoning: intent.reasoning.clone(),
                });
            }
            component
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(id: &str, name: &str, json: &str) -> Component {
        let mut c: Component = serde_json::from_str(json).unwrap();
        c.id = id.to_string();
        c.name = name.to_string();
        c
    }

    #[test]
    fn test_button_by_name() {
        let analyzer = SemanticAnalyzer::new();
        let components = vec![component("1", "Primary Button", "{}")];

        let result = analyzer
            .analyze_semantic_intent(&components, &DesignContext::default())
            .unwrap();

        assert_eq!(result.components[0].intent, "button");
        assert!(result.components[0].confidence >= 0.8);
    }

    #[test]
    fn test_button_by_shape_without_name() {
        let analyzer = SemanticAnalyzer::new();
        let components = vec![component(
            "1",
            "Rectangle 7",
            r##"{"width":160.0,"height":48.0,"style":{"fill":"#0066CC","cornerRadius":8}}"##,
        )];

        let result = analyzer
            .analyze_semantic_intent(&components, &DesignContext::default())
            .unwrap();

        assert_eq!(result.components[0].intent, "button");
    }

    #[test]
    fn test_agreement_beats_single_signal() {
        let analyzer = SemanticAnalyzer::new();
        let named_only = vec![component("1", "Submit Button", "{}")];
        let both = vec![component(
            "1",
            "Submit Button",
            r##"{"width":160.0,"height":48.0,"style":{"fill":"#0066CC","cornerRadius":8}}"##,
        )];

        let ctx = DesignContext::default();
        let a = analyzer.analyze_semantic_intent(&named_only, &ctx).unwrap();
        let b = analyzer.analyze_semantic_intent(&both, &ctx).unwrap();

        assert!(b.components[0].confidence > a.components[0].confidence);
    }

    #[test]
    fn test_bare_component_still_gets_intent() {
        let analyzer = SemanticAnalyzer::new();
        let components = vec![component("1", "", "{}")];

        let result = analyzer
            .analyze_semantic_intent(&components, &DesignContext::default())
            .unwrap();

        assert_eq!(result.components[0].intent, "unknown");
        assert!(result.components[0].confidence > 0.0);
    }

    #[test]
    fn test_form_pattern_from_input_plus_button() {
        let analyzer = SemanticAnalyzer::new();
        let components = vec![
            component("1", "Email Input", "{}"),
            component("2", "Password Input", "{}"),
            component("3", "Sign In Button", "{}"),
        ];

        let result = analyzer
            .analyze_semantic_intent(&components, &DesignContext::default())
            .unwrap();

        let types: Vec<&str> = result.patterns.iter().map(|p| p.pattern_type.as_str()).collect();
        assert!(types.contains(&"form"));
        assert!(types.contains(&"authentication"));
    }

    #[test]
    fn test_augment_preserves_geometry() {
        let analyzer = SemanticAnalyzer::new();
        let components = vec![component(
            "1",
            "Button",
            r#"{"width":100.0,"height":40.0,"x":10.0,"y":20.0}"#,
        )];

        let result = analyzer
            .analyze_semantic_intent(&components, &DesignContext::default())
            .unwrap();
        let augmented = augment_components(&components, &result);

        assert_eq!(augmented[0].geometry, components[0].geometry);
        assert_eq!(augmented[0].intent(), Some("button"));
    }

    #[test]
    fn test_empty_input() {
        let analyzer = SemanticAnalyzer::new();
        let result = analyzer
            .analyze_semantic_intent(&[], &DesignContext::default())
            .unwrap();

        assert!(result.components.is_empty());
        assert!(result.patterns.is_empty());
        assert_eq!(result.confidence.overall, 0.0);
    }
}
