// Which design system is this, and does anyone actually use it?
//
// Detection matches token naming conventions against a small library of
// known systems; compliance measures how many component style values resolve
// to a declared token instead of an ad-hoc literal.

use crate::analyzers::{Finding, ModuleReport, Scorer, Severity};
use crate::error::Result;
use crate::model::{Component, DesignContext, DesignTokenSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Below this many evidence hits we call the system "Custom"
const MIN_SYSTEM_EVIDENCE: usize = 3;

// Evidence count at which detection confidence saturates
const EVIDENCE_SATURATION: usize = 8;

// Numeric tolerance when matching sizes and spacing against token values
const VALUE_TOLERANCE: f64 = 0.5;

/// A known design system's naming conventions
struct KnownSystem {
    name: &'static str,
    name_patterns: &'static [&'static str],
    spacing_base: f64,
}

const KNOWN_SYSTEMS: &[KnownSystem] = &[
    KnownSystem {
        name: "Material Design",
        name_patterns: &[
            r"^md\.",
            r"^on-(primary|secondary|surface|error|background)",
            r"^(primary|secondary|tertiary)-container$",
            r"^(surface|outline|scrim|inverse)",
            r"^(display|headline|title|body|label)-(large|medium|small)$",
            r"^elevation-",
        ],
        spacing_base: 8.0,
    },
    KnownSystem {
        name: "Tailwind",
        name_patterns: &[
            r"^(slate|gray|zinc|neutral|stone|red|orange|amber|yellow|lime|green|emerald|teal|cyan|sky|blue|indigo|violet|purple|fuchsia|pink|rose)-\d{2,3}$",
            r"^text-(xs|sm|base|lg|\d?xl)$",
            r"^(space|spacing)-\d+$",
            r"^rounded(-|$)",
        ],
        spacing_base: 4.0,
    },
    KnownSystem {
        name: "Bootstrap",
        name_patterns: &[
            r"^(primary|secondary|success|danger|warning|info|light|dark)$",
            r"^(h[1-6]|display-[1-6]|lead|small)$",
            r"^spacer(-\d+)?$",
            r"^(body|muted|white-50|black-50)$",
        ],
        spacing_base: 16.0,
    },
];

/// Outcome of design-system detection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemDetection {
    pub detected_system: String,
    pub confidence: f64,
    pub evidence: Vec<String>,
}

impl Default for SystemDetection {
    fn default() -> Self {
        Self {
            detected_system: "Custom".to_string(),
            confidence: 0.0,
            evidence: Vec::new(),
        }
    }
}

/// Coverage of one token group against component styles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenCoverage {
    pub matched: usize,
    pub total: usize,
    pub ratio: f64,
}

/// Per-group coverage breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenMapping {
    pub colors: TokenCoverage,
    pub typography: TokenCoverage,
    pub spacing: TokenCoverage,
}

/// Compliance scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenCompliance {
    pub overall: f64,
    pub colors: f64,
    pub typography: f64,
    pub spacing: f64,
}

/// Design-token linker output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenResult {
    pub system_detection: SystemDetection,
    pub token_mapping: TokenMapping,
    pub compliance: TokenCompliance,
    pub findings: Vec<Finding>,
    pub confidence: f64,
    pub error: Option<String>,
}

impl ModuleReport for TokenResult {
    const NAME: &'static str = "tokens";

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn set_error(&mut self, reason: String) {
        self.error = Some(reason);
    }
}

/// Detects the token system in use and measures component-to-token compliance
pub struct DesignTokenLinker;

impl DesignTokenLinker {
    /// Main entry - system detection plus coverage analysis
    pub fn analyze_design_tokens(
        design_tokens: &DesignTokenSet,
        components: &[Component],
        context: &DesignContext,
    ) -> Result<TokenResult> {
        let system_detection = Self::detect_design_system(design_tokens, context);

        let colors = Self::analyze_color_tokens(design_tokens, components);
        let typography = Self::analyze_typography_tokens(design_tokens, components);
        let spacing = Self::analyze_spacing_tokens(design_tokens, components);

        // Weight each group by how much there was to evaluate
        let overall = Scorer::weighted_mean(&[
            (colors.ratio, colors.total as f64),
            (typography.ratio, typography.total as f64),
            (spacing.ratio, spacing.total as f64),
        ]);

        let mut findings = Vec::new();
        if design_tokens.is_empty() && !components.is_empty() {
            findings.push(Finding {
                category: "design-system".to_string(),
                severity: Severity::Low,
                description: "No design tokens declared for this file".to_string(),
                action: "Establish color, type, and spacing tokens".to_string(),
                impact: "Ad-hoc values drift and are costly to re-theme".to_string(),
                component_id: None,
            });
        } else if colors.total > 0 && colors.ratio < 0.5 {
            findings.push(Finding {
                category: "design-system".to_string(),
                severity: Severity::Medium,
                description: format!(
                    "Only {} of {} component colors resolve to a declared token",
                    colors.matched, colors.total
                ),
                action: "Replace ad-hoc color literals with token references".to_string(),
                impact: "Inconsistent palette and harder theming".to_string(),
                component_id: None,
            });
        }

        let evaluated = colors.total + typography.total + spacing.total;
        let confidence = Scorer::weighted_mean(&[
            (system_detection.confidence, 0.5),
            (if evaluated > 0 { 0.8 } else { 0.0 }, 0.5),
        ]);

        Ok(TokenResult {
            compliance: TokenCompliance {
                overall,
                colors: colors.ratio,
                typography: typography.ratio,
                spacing: spacing.ratio,
            },
            token_mapping: TokenMapping {
                colors,
                typography,
                spacing,
            },
            system_detection,
            findings,
            confidence,
            error: None,
        })
    }

    /// Match token naming/value conventions against the known-system library
    pub fn detect_design_system(
        design_tokens: &DesignTokenSet,
        context: &DesignContext,
    ) -> SystemDetection {
        let mut best: Option<(usize, Vec<String>, &KnownSystem)> = None;

        for system in KNOWN_SYSTEMS {
            let (evidence_count, evidence) = Self::gather_evidence(design_tokens, context, system);
            if best.as_ref().map_or(true, |(count, _, _)| evidence_count > *count) {
                best = Some((evidence_count, evidence, system));
            }
        }

        match best {
            Some((count, evidence, system)) if count >= MIN_SYSTEM_EVIDENCE => SystemDetection {
                detected_system: system.name.to_string(),
                confidence: Scorer::evidence_confidence(count, EVIDENCE_SATURATION, 0.95),
                evidence,
            },
            _ => SystemDetection::default(),
        }
    }

    /// Score one named system against a token set on demand
    pub fn calculate_system_match(
        design_tokens: &DesignTokenSet,
        system_name: &str,
        context: &DesignContext,
    ) -> f64 {
        KNOWN_SYSTEMS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(system_name))
            .map(|system| {
                let (count, _) = Self::gather_evidence(design_tokens, context, system);
                Scorer::evidence_confidence(count, EVIDENCE_SATURATION, 1.0)
            })
            .unwrap_or(0.0)
    }

    fn gather_evidence(
        design_tokens: &DesignTokenSet,
        context: &DesignContext,
        system: &KnownSystem,
    ) -> (usize, Vec<String>) {
        let mut count = 0;
        let mut evidence = Vec::new();

        let patterns: Vec<Regex> = system
            .name_patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();

        for name in design_tokens.all_names() {
            let name = name.to_lowercase();
            if patterns.iter().any(|re| re.is_match(&name)) {
                count += 1;
                if evidence.len() < 8 {
                    evidence.push(format!("token name '{}'", name));
                }
            }
        }

        // Spacing scales on the system's base grid count once
        let spacing_values: Vec<f64> = design_tokens
            .spacing
            .iter()
            .filter_map(|t| parse_numeric(&t.value))
            .collect();
        if spacing_values.len() >= 2
            && spacing_values
                .iter()
                .all(|v| (v % system.spacing_base).abs() < VALUE_TOLERANCE)
        {
            count += 1;
            evidence.push(format!("spacing scale on a {}-unit base", system.spacing_base));
        }

        // An explicit caller hint is strong evidence
        if let Some(hint) = &context.design_system {
            if system.name.to_lowercase().contains(&hint.to_lowercase()) {
                count += 2;
                evidence.push(format!("caller hint '{}'", hint));
            }
        }

        (count, evidence)
    }

    /// Fraction of component color literals that resolve to a color token
    fn analyze_color_tokens(
        design_tokens: &DesignTokenSet,
        components: &[Component],
    ) -> TokenCoverage {
        let declared: HashSet<String> = design_tokens
            .colors
            .iter()
            .filter_map(|t| normalize_hex(&t.value))
            .collect();

        let mut matched = 0;
        let mut total = 0;
        for component in components {
            for color in [
                component.style.background_color(),
                component.style.text_color(),
            ]
            .into_iter()
            .flatten()
            {
                if let Some(normalized) = normalize_hex(color) {
                    total += 1;
                    if declared.contains(&normalized) {
                        matched += 1;
                    }
                }
            }
        }

        TokenCoverage {
            matched,
            total,
            ratio: Scorer::coverage(matched, total),
        }
    }

    /// Fraction of font sizes that match a typography token value
    fn analyze_typography_tokens(
        design_tokens: &DesignTokenSet,
        components: &[Component],
    ) -> TokenCoverage {
        let declared: Vec<f64> = design_tokens
            .typography
            .iter()
            .filter_map(|t| parse_numeric(&t.value))
            .collect();

        let mut matched = 0;
        let mut total = 0;
        for component in components {
            if let Some(size) = component.style.font_size() {
                total += 1;
                if declared.iter().any(|v| (v - size).abs() < VALUE_TOLERANCE) {
                    matched += 1;
                }
            }
        }

        TokenCoverage {
            matched,
            total,
            ratio: Scorer::coverage(matched, total),
        }
    }

    /// Fraction of padding/gap values that match a spacing token value
    fn analyze_spacing_tokens(
        design_tokens: &DesignTokenSet,
        components: &[Component],
    ) -> TokenCoverage {
        let declared: Vec<f64> = design_tokens
            .spacing
            .iter()
            .filter_map(|t| parse_numeric(&t.value))
            .collect();

        let mut matched = 0;
        let mut total = 0;
        for component in components {
            for value in component.style.spacing_values() {
                total += 1;
                if declared.iter().any(|v| (v - value).abs() < VALUE_TOLERANCE) {
                    matched += 1;
                }
            }
        }

        TokenCoverage {
            matched,
            total,
            ratio: Scorer::coverage(matched, total),
        }
    }
}

/// Lowercase six-digit hex, expanding #RGB shorthand
fn normalize_hex(value: &str) -> Option<String> {
    let hex = value.trim().strip_prefix('#')?;
    // Byte slicing below; non-ASCII input would split a char boundary
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            Some(format!("#{}", expanded.to_lowercase()))
        }
        6 | 8 => Some(format!("#{}", hex[0..6].to_lowercase())),
        _ => None,
    }
}

/// First numeric value in strings like "16px", "0.5rem", "8"
fn parse_numeric(value: &str) -> Option<f64> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse().ok()
}
