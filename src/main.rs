// design-intel - tells you what a design file actually contains
//
// This is the main entry point. Parses CLI args and dispatches to handlers.
// Input is a JSON file with {designSpec, prototypeData, designContext};
// output is the synthesized analysis as JSON on stdout.

use design_intel::{
    AnalysisOptions, ContextIntelligenceOrchestrator, DesignContext, DesignSpec, EngineError,
    MemoryCache, PrototypeData, Result,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalysisRequest {
    design_spec: DesignSpec,
    prototype_data: PrototypeData,
    design_context: DesignContext,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "analyze" => handle_analyze(&args[2..]).await,
        "version" | "-v" | "--version" => {
            println!("design-intel v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

async fn handle_analyze(args: &[String]) -> Result<()> {
    let mut file: Option<&str> = None;
    let mut sequential = false;
    let mut caching = true;
    let mut pretty = false;

    for arg in args {
        match arg.as_str() {
            "--sequential" => sequential = true,
            "--no-cache" => caching = false,
            "--pretty" => pretty = true,
            path if !path.starts_with("--") => file = Some(path),
            flag => {
                return Err(EngineError::InvalidInput(format!("unknown flag: {}", flag)));
            }
        }
    }

    let Some(path) = file else {
        return Err(EngineError::InvalidInput(
            "usage: design-intel analyze <file.json> [--sequential] [--no-cache] [--pretty]"
                .to_string(),
        ));
    };

    let raw = fs::read_to_string(path)?;
    let request: AnalysisRequest = serde_json::from_str(&raw)?;

    let orchestrator =
        ContextIntelligenceOrchestrator::new().with_cache(Arc::new(MemoryCache::new()));
    let options = AnalysisOptions {
        enable_caching: caching,
        parallel_analysis: !sequential,
        include_performance_metrics: true,
    };

    let result = orchestrator
        .analyze_context_intelligence(
            &request.design_spec,
            &request.prototype_data,
            &request.design_context,
            &options,
        )
        .await;

    let output = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    Ok(())
}

fn print_usage() {
    println!("design-intel - context intelligence for UI design files");
    println!();
    println!("Usage:");
    println!("  design-intel analyze <file.json>   Analyze an exported design spec");
    println!("      --sequential                   Run analyzers one at a time");
    println!("      --no-cache                     Recompute even on identical input");
    println!("      --pretty                       Pretty-print the JSON output");
    println!("  design-intel version               Show version");
    println!("  design-intel help                  Show this help");
}
