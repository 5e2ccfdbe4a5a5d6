/// Analyzer modules
///
/// Five independent leaf analyzers plus the shared scorer. Each analyzer is a
/// pure function over its read view of the input and returns a result type
/// implementing `ModuleReport`, the seam the orchestrator uses to swap a
/// failed module for a degraded default.

pub mod accessibility;
pub mod interaction;
pub mod layout;
pub mod scorer;
pub mod semantic;
pub mod tokens;

pub use accessibility::{AccessibilityChecker, AccessibilityResult};
pub use interaction::{InteractionMapper, InteractionResult};
pub use layout::{LayoutIntentExtractor, LayoutResult};
pub use scorer::Scorer;
pub use semantic::{SemanticAnalyzer, SemanticResult};
pub use tokens::{DesignTokenLinker, TokenResult};

use serde::{Deserialize, Serialize};

/// How urgent a finding is; synthesis maps this onto recommendation buckets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    #[default]
    Low,
}

/// One actionable finding from a module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Finding {
    pub category: String,
    pub severity: Severity,
    pub description: String,
    pub action: String,
    pub impact: String,
    pub component_id: Option<String>,
}

/// Common surface of every analyzer result
///
/// A degraded report is the module's `Default` (empty collections, zero
/// scores) with the failure reason attached; it is always safe to synthesize
/// over.
pub trait ModuleReport: Default {
    /// Module name used in logs and error annotations
    const NAME: &'static str;

    /// The module's overall confidence in its own output
    fn confidence(&self) -> f64;

    /// Attach a degradation reason
    fn set_error(&mut self, reason: String);

    /// Build the degraded default for a failed run
    fn degraded(reason: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.set_error(reason.into());
        report
    }
}
