// Runs the five analyzers and fuses their output
//
// The orchestrator is the failure boundary: whatever happens inside a module
// stays inside it. A failed or panicked analyzer is replaced by its degraded
// default and synthesis always sees a complete set of five results.

use crate::analyzers::semantic::augment_components;
use crate::analyzers::{
    AccessibilityChecker, DesignTokenLinker, InteractionMapper, LayoutIntentExtractor,
    ModuleReport, SemanticAnalyzer,
};
use crate::cache::{fingerprint, CacheStore};
use crate::error::Result;
use crate::model::{AnalysisOptions, DesignContext, DesignSpec, PrototypeData};
use crate::synthesis::{synthesize, RunMetadata, SynthesisWeights, SynthesizedContext};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Top-level engine entry point
pub struct ContextIntelligenceOrchestrator {
    semantic: SemanticAnalyzer,
    weights: SynthesisWeights,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
}

impl Default for ContextIntelligenceOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextIntelligenceOrchestrator {
    pub fn new() -> Self {
        Self {
            semantic: SemanticAnalyzer::new(),
            weights: SynthesisWeights::default(),
            cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the synthesis weight table
    pub fn with_weights(mut self, weights: SynthesisWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Attach an external result cache (consulted only when the caller
    /// enables caching in the per-call options)
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Analyze one design and return the synthesized interpretation
    ///
    /// Total for every input shape: missing components, empty token sets, and
    /// failing modules all land in a best-effort result, never an error.
    pub async fn analyze_context_intelligence(
        &self,
        design_spec: &DesignSpec,
        prototype_data: &PrototypeData,
        design_context: &DesignContext,
        options: &AnalysisOptions,
    ) -> SynthesizedContext {
        let started = Instant::now();

        let cache_key = match (&self.cache, options.enable_caching) {
            (Some(_), true) => Some(fingerprint(design_spec, design_context)),
            _ => None,
        };
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(hit) = cache.get(key).await {
                debug!(key = %key, "cache hit, skipping analysis");
                return hit;
            }
        }

        debug!(
            components = design_spec.components.len(),
            edges = prototype_data.interactions.len(),
            parallel = options.parallel_analysis,
            "dispatching analyzers"
        );

        // Semantic runs first: its augmented component list is the read view
        // every other analyzer gets.
        let semantic = unwrap_module(
            self.semantic
                .analyze_semantic_intent(&design_spec.components, design_context),
        );
        let components = Arc::new(augment_components(&design_spec.components, &semantic));

        // Interaction runs second so accessibility can see edge-backed
        // interactive components regardless of dispatch mode.
        let interaction = Arc::new(unwrap_module(InteractionMapper::map_interaction_flows(
            &components,
            prototype_data,
            design_context,
        )));

        let context = Arc::new(design_context.clone());
        let token_set = Arc::new(design_spec.design_tokens.clone());

        let (accessibility, tokens, layout) = if options.parallel_analysis {
            let accessibility_task = {
                let components = Arc::clone(&components);
                let interaction = Arc::clone(&interaction);
                let context = Arc::clone(&context);
                tokio::spawn(async move {
                    AccessibilityChecker::analyze_accessibility(
                        &components,
                        Some(&interaction),
                        &context,
                    )
                })
            };
            let tokens_task = {
                let components = Arc::clone(&components);
                let token_set = Arc::clone(&token_set);
                let context = Arc::clone(&context);
                tokio::spawn(async move {
                    DesignTokenLinker::analyze_design_tokens(&token_set, &components, &context)
                })
            };
            let layout_task = {
                let components = Arc::clone(&components);
                let context = Arc::clone(&context);
                tokio::spawn(async move {
                    LayoutIntentExtractor::extract_layout_intent(&components, &context)
                })
            };

            let (accessibility, tokens, layout) =
                tokio::join!(accessibility_task, tokens_task, layout_task);
            (
                unwrap_join(accessibility),
                unwrap_join(tokens),
                unwrap_join(layout),
            )
        } else {
            (
                unwrap_module(AccessibilityChecker::analyze_accessibility(
                    &components,
                    Some(&interaction),
                    &context,
                )),
                unwrap_module(DesignTokenLinker::analyze_design_tokens(
                    &token_set,
                    &components,
                    &context,
                )),
                unwrap_module(LayoutIntentExtractor::extract_layout_intent(
                    &components, &context,
                )),
            )
        };

        let interaction = Arc::try_unwrap(interaction).unwrap_or_else(|arc| (*arc).clone());

        debug!(stage = "synthesizing", "all module results available");
        let (synthesis, recommendations) = synthesize(
            &semantic,
            &interaction,
            &accessibility,
            &tokens,
            &layout,
            &self.weights,
        );

        let result = SynthesizedContext {
            semantic,
            interaction,
            accessibility,
            tokens,
            layout,
            synthesis,
            recommendations,
            metadata: RunMetadata {
                analysis_id: generate_analysis_id(),
                analysis_time_ms: started.elapsed().as_millis() as u64,
                components_analyzed: design_spec.components.len(),
            },
        };

        if options.include_performance_metrics {
            info!(
                analysis_id = %result.metadata.analysis_id,
                elapsed_ms = result.metadata.analysis_time_ms,
                components = result.metadata.components_analyzed,
                confidence = result.synthesis.overall_confidence,
                "analysis complete"
            );
        }

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            cache.set(key, result.clone(), self.cache_ttl).await;
        }

        result
    }
}

/// Trace identifier for one run: timestamp plus random suffix
///
/// Not a content fingerprint; identical inputs get fresh ids. Cache keys come
/// from `cache::fingerprint` instead.
fn generate_analysis_id() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    format!("ctx-{}-{:08x}", timestamp, suffix)
}

/// A module error becomes that module's degraded default
fn unwrap_module<T: ModuleReport>(outcome: Result<T>) -> T {
    match outcome {
        Ok(result) => result,
        Err(err) => {
            warn!(module = T::NAME, error = %err, "analyzer degraded");
            T::degraded(err.to_string())
        }
    }
}

/// Same, but also absorbs a panicked or cancelled task
fn unwrap_join<T: ModuleReport>(join: std::result::Result<Result<T>, JoinError>) -> T {
    match join {
        Ok(outcome) => unwrap_module(outcome),
        Err(err) => {
            warn!(module = T::NAME, error = %err, "analyzer task aborted");
            T::degraded(format!("analyzer task aborted: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    fn orchestrator() -> ContextIntelligenceOrchestrator {
        ContextIntelligenceOrchestrator::new()
    }

    fn login_spec() -> (DesignSpec, PrototypeData) {
        let spec: DesignSpec = serde_json::from_str(
            r##"{
                "components": [
                    {"id":"1:1","name":"Email Field","type":"INSTANCE","category":"Input",
                     "width":280.0,"height":48.0,"x":40.0,"y":120.0},
                    {"id":"1:2","name":"Sign In","type":"INSTANCE","category":"Button",
                     "width":280.0,"height":48.0,"x":40.0,"y":200.0,
                     "style":{"fill":"#0066CC","textColor":"#FFFFFF","cornerRadius":8}}
                ],
                "designTokens": {"colors":[{"name":"primary","value":"#0066CC"}]}
            }"##,
        )
        .unwrap();
        let prototype: PrototypeData = serde_json::from_str(
            r#"{"interactions":[{"id":"e1","trigger":"ON_CLICK",
                "sourceNodeId":"1:2","targetNodeId":"2:1","transitionType":"NAVIGATE"}]}"#,
        )
        .unwrap();
        (spec, prototype)
    }

    #[tokio::test]
    async fn test_empty_input_is_total() {
        let result = orchestrator()
            .analyze_context_intelligence(
                &DesignSpec::default(),
                &PrototypeData::default(),
                &DesignContext::default(),
                &AnalysisOptions::default(),
            )
            .await;

        assert_eq!(result.metadata.components_analyzed, 0);
        assert!(result.semantic.components.is_empty());
        assert!(result.interaction.interactive_components.is_empty());
        assert!(result.accessibility.issues.is_empty());
        assert!(result.layout.grid_systems.is_empty());
        assert!(result.synthesis.overall_confidence >= 0.0);
        assert!(result.synthesis.overall_confidence <= 1.0);
        assert!(!result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_login_scenario_detects_form() {
        let (spec, prototype) = login_spec();
        let result = orchestrator()
            .analyze_context_intelligence(
                &spec,
                &prototype,
                &DesignContext::default(),
                &AnalysisOptions::default(),
            )
            .await;

        let pattern_types: Vec<&str> = result
            .semantic
            .patterns
            .iter()
            .map(|p| p.pattern_type.as_str())
            .collect();
        assert!(
            pattern_types.iter().any(|t| t.contains("form") || t.contains("authentication")),
            "patterns were {:?}",
            pattern_types
        );
        assert!(!result.interaction.interactive_components.is_empty());
        assert_eq!(result.metadata.components_analyzed, 2);
    }

    #[tokio::test]
    async fn test_parallel_and_sequential_agree() {
        let (spec, prototype) = login_spec();
        let context = DesignContext::default();
        let orchestrator = orchestrator();

        let parallel = orchestrator
            .analyze_context_intelligence(
                &spec,
                &prototype,
                &context,
                &AnalysisOptions {
                    parallel_analysis: true,
                    ..Default::default()
                },
            )
            .await;
        let sequential = orchestrator
            .analyze_context_intelligence(
                &spec,
                &prototype,
                &context,
                &AnalysisOptions {
                    parallel_analysis: false,
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(
            serde_json::to_value(&parallel.accessibility).unwrap(),
            serde_json::to_value(&sequential.accessibility).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&parallel.tokens).unwrap(),
            serde_json::to_value(&sequential.tokens).unwrap()
        );
    }

    #[tokio::test]
    async fn test_classification_is_idempotent() {
        let (spec, prototype) = login_spec();
        let context = DesignContext::default();
        let orchestrator = orchestrator();
        let options = AnalysisOptions::default();

        let first = orchestrator
            .analyze_context_intelligence(&spec, &prototype, &context, &options)
            .await;
        let second = orchestrator
            .analyze_context_intelligence(&spec, &prototype, &context, &options)
            .await;

        for (a, b) in [
            (
                serde_json::to_value(&first.semantic).unwrap(),
                serde_json::to_value(&second.semantic).unwrap(),
            ),
            (
                serde_json::to_value(&first.interaction).unwrap(),
                serde_json::to_value(&second.interaction).unwrap(),
            ),
            (
                serde_json::to_value(&first.accessibility).unwrap(),
                serde_json::to_value(&second.accessibility).unwrap(),
            ),
            (
                serde_json::to_value(&first.tokens).unwrap(),
                serde_json::to_value(&second.tokens).unwrap(),
            ),
            (
                serde_json::to_value(&first.layout).unwrap(),
                serde_json::to_value(&second.layout).unwrap(),
            ),
        ] {
            assert_eq!(a, b);
        }
        // Only the trace id is expected to differ
        assert_ne!(first.metadata.analysis_id, second.metadata.analysis_id);
    }

    #[tokio::test]
    async fn test_malformed_colors_stay_inside_the_engine() {
        // Non-ASCII "hex" values must degrade, not escape, in either mode
        let spec: DesignSpec = serde_json::from_value(serde_json::json!({
            "components": [
                {"id":"1:1","name":"Banner","type":"FRAME",
                 "width":320.0,"height":80.0,"x":0.0,"y":0.0,
                 "style":{"fill":"#ÿa","textColor":"#fff"}}
            ],
            "designTokens": {"colors":[{"name":"odd","value":"#aaaaaÿx"}]}
        }))
        .unwrap();

        for parallel in [false, true] {
            let result = orchestrator()
                .analyze_context_intelligence(
                    &spec,
                    &PrototypeData::default(),
                    &DesignContext::default(),
                    &AnalysisOptions {
                        parallel_analysis: parallel,
                        ..Default::default()
                    },
                )
                .await;

            assert_eq!(result.metadata.components_analyzed, 1);
            assert!(result.accessibility.error.is_none());
            assert!(result.tokens.error.is_none());
            assert!(result.accessibility.contrast_findings.is_empty());
        }
    }

    #[tokio::test]
    async fn test_scaling_counts_all_components() {
        let components: Vec<serde_json::Value> = (0..10)
            .map(|i| {
                serde_json::json!({
                    "id": format!("c{}", i),
                    "name": format!("Card {}", i),
                    "type": "FRAME",
                    "width": 200.0, "height": 120.0,
                    "x": (i % 2) as f64 * 220.0, "y": (i / 2) as f64 * 140.0
                })
            })
            .collect();
        let spec: DesignSpec =
            serde_json::from_value(serde_json::json!({ "components": components })).unwrap();

        let result = orchestrator()
            .analyze_context_intelligence(
                &spec,
                &PrototypeData::default(),
                &DesignContext::default(),
                &AnalysisOptions::default(),
            )
            .await;

        assert_eq!(result.metadata.components_analyzed, 10);
        assert_eq!(result.semantic.components.len(), 10);
    }

    #[tokio::test]
    async fn test_cache_returns_prior_result() {
        let (spec, prototype) = login_spec();
        let cache = Arc::new(MemoryCache::new());
        let orchestrator =
            ContextIntelligenceOrchestrator::new().with_cache(cache);
        let options = AnalysisOptions {
            enable_caching: true,
            ..Default::default()
        };

        let first = orchestrator
            .analyze_context_intelligence(&spec, &prototype, &DesignContext::default(), &options)
            .await;
        let second = orchestrator
            .analyze_context_intelligence(&spec, &prototype, &DesignContext::default(), &options)
            .await;

        // A hit returns the stored run, trace id included
        assert_eq!(first.metadata.analysis_id, second.metadata.analysis_id);
    }

    #[tokio::test]
    async fn test_caching_disabled_recomputes() {
        let (spec, prototype) = login_spec();
        let cache = Arc::new(MemoryCache::new());
        let orchestrator =
            ContextIntelligenceOrchestrator::new().with_cache(cache);

        let first = orchestrator
            .analyze_context_intelligence(
                &spec,
                &prototype,
                &DesignContext::default(),
                &AnalysisOptions::default(),
            )
            .await;
        let second = orchestrator
            .analyze_context_intelligence(
                &spec,
                &prototype,
                &DesignContext::default(),
                &AnalysisOptions::default(),
            )
            .await;

        assert_ne!(first.metadata.analysis_id, second.metadata.analysis_id);
    }

    #[test]
    fn test_analysis_id_shape() {
        let id = generate_analysis_id();
        assert!(id.starts_with("ctx-"));
        assert_ne!(id, generate_analysis_id());
    }
}
