// WCAG-style compliance scoring
//
// Contrast ratios from the standard relative-luminance formula, 44-unit
// touch targets, text alternatives, and naming clarity. Missing data is
// indeterminate, never an automatic failure.

use crate::analyzers::interaction::InteractionResult;
use crate::analyzers::{Finding, ModuleReport, Scorer, Severity};
use crate::error::Result;
use crate::model::{Component, ComponentKind, DesignContext};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const AAA_RATIO: f64 = 7.0;
const AA_RATIO: f64 = 4.5;
const AA_LARGE_TEXT_RATIO: f64 = 3.0;

// The common mobile/accessibility touch-target baseline, in logical units
const TOUCH_TARGET_MIN: f64 = 44.0;

// Large text per WCAG: 18pt, or 14pt bold
const LARGE_TEXT_SIZE: f64 = 18.0;
const LARGE_TEXT_BOLD_SIZE: f64 = 14.0;
const BOLD_WEIGHT: f64 = 700.0;

// When a principle has nothing to evaluate we stay neutral
const INDETERMINATE_SCORE: f64 = 0.5;

/// WCAG contrast classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContrastLevel {
    Aaa,
    Aa,
    #[default]
    Fail,
}

/// Contrast check for one component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContrastFinding {
    pub component_id: String,
    pub ratio: f64,
    pub level: ContrastLevel,
    pub large_text: bool,
}

/// Touch-target check for one interactive component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TouchTargetFinding {
    pub component_id: String,
    pub width: f64,
    pub height: f64,
    pub valid: bool,
    pub recommended_size: f64,
}

/// Per-principle and overall scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComplianceScores {
    pub overall: f64,
    pub perceivable: f64,
    pub operable: f64,
    pub understandable: f64,
    pub robust: f64,
}

/// Accessibility checker output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityResult {
    pub compliance: ComplianceScores,
    pub contrast_findings: Vec<ContrastFinding>,
    pub touch_targets: Vec<TouchTargetFinding>,
    pub issues: Vec<Finding>,
    pub confidence: f64,
    pub error: Option<String>,
}

impl ModuleReport for AccessibilityResult {
    const NAME: &'static str = "accessibility";

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn set_error(&mut self, reason: String) {
        self.error = Some(reason);
    }
}

/// Scores WCAG-style compliance per component and overall
pub struct AccessibilityChecker;

impl AccessibilityChecker {
    /// Main entry - evaluate the three principle groups and aggregate
    pub fn analyze_accessibility(
        components: &[Component],
        interaction: Option<&InteractionResult>,
        _context: &DesignContext,
    ) -> Result<AccessibilityResult> {
        let mut issues = Vec::new();

        let (contrast_findings, perceivable_hits, perceivable_total) =
            Self::check_perceivable(components, &mut issues);
        let (touch_targets, operable_hits, operable_total) =
            Self::check_operable(components, interaction, &mut issues);
        let understandable = Self::check_understandable(components, &mut issues);
        let robust = Self::check_robust(components);

        let perceivable = Self::principle_score(perceivable_hits, perceivable_total);
        let operable = Self::principle_score(operable_hits, operable_total);

        let overall = Scorer::weighted_mean(&[
            (perceivable, 0.35),
            (operable, 0.35),
            (understandable, 0.2),
            (robust, 0.1),
        ]);

        // Confidence tracks how much of the tree we could actually evaluate
        let evaluated = perceivable_total + operable_total;
        let confidence = if components.is_empty() {
            0.0
        } else {
            Scorer::clamp(0.3 + 0.7 * Scorer::coverage(evaluated, components.len()))
        };

        Ok(AccessibilityResult {
            compliance: ComplianceScores {
                overall,
                perceivable,
                operable,
                understandable,
                robust,
            },
            contrast_findings,
            touch_targets,
            issues,
            confidence,
            error: None,
        })
    }

    fn principle_score(hits: usize, total: usize) -> f64 {
        if total == 0 {
            return INDETERMINATE_SCORE;
        }
        Scorer::coverage(hits, total)
    }

    /// Perceivable: contrast ratios and text alternatives
    fn check_perceivable(
        components: &[Component],
        issues: &mut Vec<Finding>,
    ) -> (Vec<ContrastFinding>, usize, usize) {
        let mut findings = Vec::new();
        let mut hits = 0;
        let mut total = 0;

        for component in components {
            if let (Some(bg), Some(fg)) = (
                component.style.background_color(),
                component.style.text_color(),
            ) {
                // Unparseable colors stay indeterminate
                if let Some(ratio) = contrast_ratio(bg, fg) {
                    total += 1;

                    let large_text = is_large_text(component);
                    let level = classify_contrast(ratio, large_text);
                    if level != ContrastLevel::Fail {
                        hits += 1;
                    } else {
                        issues.push(Finding {
                            category: "accessibility".to_string(),
                            severity: Severity::Critical,
                            description: format!(
                                "'{}' has a contrast ratio of {:.2}:1, below the WCAG AA minimum",
                                component.name, ratio
                            ),
                            action: "Increase contrast between text and background colors"
                                .to_string(),
                            impact: "Text may be unreadable for low-vision users".to_string(),
                            component_id: Some(component.id.clone()),
                        });
                    }

                    findings.push(ContrastFinding {
                        component_id: component.id.clone(),
                        ratio,
                        level,
                        large_text,
                    });
                }
            }

            // Images and icons need a text alternative
            let image_like = component.kind == ComponentKind::Vector
                || component.intent() == Some("image");
            if image_like {
                total += 1;
                if component.style.alt_text().is_some() {
                    hits += 1;
                } else {
                    issues.push(Finding {
                        category: "accessibility".to_string(),
                        severity: Severity::Medium,
                        description: format!("'{}' has no text alternative", component.name),
                        action: "Add alt text or an accessibility label".to_string(),
                        impact: "Screen readers cannot describe this element".to_string(),
                        component_id: Some(component.id.clone()),
                    });
                }
            }
        }

        (findings, hits, total)
    }

    /// Operable: touch-target sizes for interactive components
    fn check_operable(
        components: &[Component],
        interaction: Option<&InteractionResult>,
        issues: &mut Vec<Finding>,
    ) -> (Vec<TouchTargetFinding>, usize, usize) {
        let edge_backed: HashSet<&str> = interaction
            .map(|r| {
                r.interactive_components
                    .iter()
                    .map(|i| i.id.as_str())
                    .collect()
            })
            .unwrap_or_default();

        let mut findings = Vec::new();
        let mut hits = 0;
        let mut total = 0;

        for component in components {
            let interactive = edge_backed.contains(component.id.as_str())
                || matches!(
                    component.intent(),
                    Some("button" | "input" | "link" | "toggle")
                );
            if !interactive || !component.has_geometry() {
                continue;
            }

            total += 1;
            let g = component.geometry;
            let valid = g.width >= TOUCH_TARGET_MIN && g.height >= TOUCH_TARGET_MIN;
            if valid {
                hits += 1;
            } else {
                issues.push(Finding {
                    category: "accessibility".to_string(),
                    severity: Severity::High,
                    description: format!(
                        "'{}' is {:.0}x{:.0}, below the {:.0}-unit touch-target minimum",
                        component.name, g.width, g.height, TOUCH_TARGET_MIN
                    ),
                    action: format!(
                        "Increase the tappable area to at least {:.0}x{:.0}",
                        TOUCH_TARGET_MIN, TOUCH_TARGET_MIN
                    ),
                    impact: "Small targets are hard to activate on touch devices".to_string(),
                    component_id: Some(component.id.clone()),
                });
            }

            findings.push(TouchTargetFinding {
                component_id: component.id.clone(),
                width: g.width,
                height: g.height,
                valid,
                recommended_size: TOUCH_TARGET_MIN,
            });
        }

        (findings, hits, total)
    }

    /// Understandable: inputs should carry meaningful labels
    fn check_understandable(components: &[Component], issues: &mut Vec<Finding>) -> f64 {
        let inputs: Vec<&Component> = components
            .iter()
            .filter(|c| c.intent() == Some("input"))
            .collect();
        if inputs.is_empty() {
            return INDETERMINATE_SCORE;
        }

        let labeled = inputs
            .iter()
            .filter(|c| {
                let has_label = !c.name.trim().is_empty() && !is_default_name(&c.name);
                if !has_label {
                    issues.push(Finding {
                        category: "accessibility".to_string(),
                        severity: Severity::Medium,
                        description: format!("Input '{}' has no meaningful label", c.id),
                        action: "Name the field after the data it collects".to_string(),
                        impact: "Users cannot tell what the field expects".to_string(),
                        component_id: Some(c.id.clone()),
                    });
                }
                has_label
            })
            .count();

        Scorer::coverage(labeled, inputs.len())
    }

    /// Robust: tool-default layer names make poor assistive-tech output
    fn check_robust(components: &[Component]) -> f64 {
        if components.is_empty() {
            return INDETERMINATE_SCORE;
        }
        let meaningful = components
            .iter()
            .filter(|c| !c.name.trim().is_empty() && !is_default_name(&c.name))
            .count();
        Scorer::coverage(meaningful, components.len())
    }
}

/// True for names the design tool generated itself ("Rectangle 12")
fn is_default_name(name: &str) -> bool {
    let mut parts = name.trim().split_whitespace();
    let head = parts.next().unwrap_or("");
    let tail_numeric = parts.clone().all(|p| p.chars().all(|c| c.is_ascii_digit()));
    matches!(
        head,
        "Rectangle" | "Frame" | "Group" | "Ellipse" | "Vector" | "Line" | "Polygon"
    ) && tail_numeric
}

fn is_large_text(component: &Component) -> bool {
    let size = component.style.font_size().unwrap_or(0.0);
    let weight = component.style.font_weight().unwrap_or(400.0);
    size >= LARGE_TEXT_SIZE || (size >= LARGE_TEXT_BOLD_SIZE && weight >= BOLD_WEIGHT)
}

fn classify_contrast(ratio: f64, large_text: bool) -> ContrastLevel {
    if ratio >= AAA_RATIO {
        ContrastLevel::Aaa
    } else if ratio >= AA_RATIO || (large_text && ratio >= AA_LARGE_TEXT_RATIO) {
        ContrastLevel::Aa
    } else {
        ContrastLevel::Fail
    }
}

/// WCAG contrast ratio between two hex colors; None when either fails to parse
pub fn contrast_ratio(a: &str, b: &str) -> Option<f64> {
    let la = relative_luminance(a)?;
    let lb = relative_luminance(b)?;
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    Some((lighter + 0.05) / (darker + 0.05))
}

/// Standard WCAG relative luminance from a #RGB or #RRGGBB hex string
fn relative_luminance(hex: &str) -> Option<f64> {
    let (r, g, b) = parse_hex(hex)?;
    let linear = |channel: f64| {
        if channel <= 0.03928 {
            channel / 12.92
        } else {
            ((channel + 0.055) / 1.055).powf(2.4)
        }
    };
    Some(0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b))
}

fn parse_hex(hex: &str) -> Option<(f64, f64, f64)> {
    let hex = hex.trim().strip_prefix('#')?;
    // Byte slicing below; non-ASCII input would split a char boundary
    if !hex.is_ascii() {
        return None;
    }
    let expand = |s: &str| u8::from_str_radix(&s.repeat(2), 16).ok();
    let (r, g, b) = match hex.len() {
        3 => (
            expand(&hex[0..1])?,
            expand(&hex[1..2])?,
            expand(&hex[2..3])?,
        ),
        6 | 8 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        _ => return None,
    };
    Some((r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Geometry, SemanticInfo};

    fn interactive_component(id: &str, width: f64, height: f64) -> Component {
        Component {
            id: id.to_string(),
            name: format!("Button {}", id),
            geometry: Geometry {
                width,
                height,
                x: 0.0,
                y: 0.0,
            },
            semantic: Some(SemanticInfo {
                intent: "button".to_string(),
                confidence: 0.9,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_blue_on_white_is_aa() {
        let ratio = contrast_ratio("#0066CC", "#FFFFFF").unwrap();
        assert!(ratio > AA_RATIO && ratio < AAA_RATIO, "ratio was {}", ratio);
        assert_eq!(classify_contrast(ratio, false), ContrastLevel::Aa);
    }

    #[test]
    fn test_black_on_white_is_aaa() {
        let ratio = contrast_ratio("#000000", "#FFFFFF").unwrap();
        assert!((ratio - 21.0).abs() < 0.01);
        assert_eq!(classify_contrast(ratio, false), ContrastLevel::Aaa);
    }

    #[test]
    fn test_low_contrast_fails_unless_large() {
        let ratio = contrast_ratio("#777777", "#FFFFFF").unwrap();
        assert!(ratio > 3.0 && ratio < 4.5);
        assert_eq!(classify_contrast(ratio, false), ContrastLevel::Fail);
        assert_eq!(classify_contrast(ratio, true), ContrastLevel::Aa);
    }

    #[test]
    fn test_shorthand_hex_parses() {
        assert_eq!(
            contrast_ratio("#000", "#fff"),
            contrast_ratio("#000000", "#FFFFFF")
        );
        assert!(contrast_ratio("not-a-color", "#fff").is_none());
    }

    #[test]
    fn test_non_ascii_hex_is_rejected() {
        assert!(contrast_ratio("#ÿa", "#fff").is_none());
        assert!(contrast_ratio("#ÿÿÿ", "#fff").is_none());
        assert!(contrast_ratio("#aaaaaÿ", "#fff").is_none());
    }

    #[test]
    fn test_touch_target_flagging() {
        let components = vec![
            interactive_component("small", 30.0, 30.0),
            interactive_component("wide", 120.0, 44.0),
        ];

        let result = AccessibilityChecker::analyze_accessibility(
            &components,
            None,
            &DesignContext::default(),
        )
        .unwrap();

        let small = result
            .touch_targets
            .iter()
            .find(|t| t.component_id == "small")
            .unwrap();
        let wide = result
            .touch_targets
            .iter()
            .find(|t| t.component_id == "wide")
            .unwrap();
        assert!(!small.valid);
        assert_eq!(small.recommended_size, TOUCH_TARGET_MIN);
        assert!(wide.valid);
        assert!(result.issues.iter().any(|i| i.severity == Severity::High));
    }

    #[test]
    fn test_missing_style_is_indeterminate() {
        let bare = Component {
            id: "1".to_string(),
            name: "Header".to_string(),
            ..Default::default()
        };

        let result = AccessibilityChecker::analyze_accessibility(
            &[bare],
            None,
            &DesignContext::default(),
        )
        .unwrap();

        // Nothing evaluable: neutral scores, no failure issues, low confidence
        assert!(result.contrast_findings.is_empty());
        assert_eq!(result.compliance.perceivable, INDETERMINATE_SCORE);
        assert!(result.issues.is_empty());
        assert!(result.confidence < 0.5);
    }

    #[test]
    fn test_overall_in_bounds() {
        let mut c = interactive_component("1", 200.0, 48.0);
        c.style = serde_json::from_str(
            r##"{"backgroundColor":"#0066CC","textColor":"#FFFFFF","fontSize":16}"##,
        )
        .unwrap();

        let result = AccessibilityChecker::analyze_accessibility(
            &[c],
            None,
            &DesignContext::default(),
        )
        .unwrap();

        assert!((0.0..=1.0).contains(&result.compliance.overall));
        assert!(result.compliance.perceivable > 0.9);
        assert!(result.compliance.operable > 0.9);
    }
}
