/// Caller-supplied inputs: the design spec, context hints, and run options

use super::component::Component;
use super::tokens::DesignTokenSet;
use serde::{Deserialize, Serialize};

/// The materialized design tree plus its declared tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignSpec {
    pub components: Vec<Component>,
    pub design_tokens: DesignTokenSet,
    pub metadata: serde_json::Value,
}

/// Hints about what the design is for; all optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignContext {
    pub purpose: Option<String>,
    pub target_audience: Option<String>,
    pub business_domain: Option<String>,
    pub platform: Option<String>,
    pub design_system: Option<String>,
}

/// Per-call engine options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub enable_caching: bool,
    pub parallel_analysis: bool,
    pub include_performance_metrics: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            enable_caching: false,
            parallel_analysis: true,
            include_performance_metrics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_deserializes() {
        let spec: DesignSpec = serde_json::from_str("{}").unwrap();
        assert!(spec.components.is_empty());
        assert!(spec.design_tokens.is_empty());
    }

    #[test]
    fn test_options_default_parallel() {
        let opts = AnalysisOptions::default();
        assert!(opts.parallel_analysis);
        assert!(!opts.enable_caching);
    }
}
