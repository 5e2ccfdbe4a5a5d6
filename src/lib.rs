/// design-intel library
///
/// Context intelligence engine: takes a structural description of a UI design
/// (component tree, design tokens, prototype edges) and produces a synthesized,
/// confidence-scored interpretation of what the design is and does.

pub mod analyzers;
pub mod cache;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod synthesis;

// Re-exports for convenience
pub use cache::{fingerprint, CacheStore, MemoryCache};
pub use error::{EngineError, Result};
pub use model::{AnalysisOptions, DesignContext, DesignSpec, PrototypeData};
pub use orchestrator::ContextIntelligenceOrchestrator;
pub use synthesis::{SynthesisWeights, SynthesizedContext};
