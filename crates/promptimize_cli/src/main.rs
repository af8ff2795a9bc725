//! Promptimize - iterative prompt optimization CLI
//!
//! Sends the prompt through N refinement passes against an
//! OpenAI-compatible endpoint and prints the best-known prompt at the
//! end. A failed or empty pass stops early and keeps the last good
//! version.

use clap::Parser;
use promptimize::{Optimizer, OptimizerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "promptimize")]
#[command(about = "Iteratively refine a prompt with an LLM")]
struct Args {
    /// The prompt to optimize
    prompt: String,

    /// Number of optimization iterations
    #[arg(short, long, default_value_t = 1)]
    iterations: u32,

    /// API key for the generation endpoint
    #[arg(short = 'k', long = "api-key")]
    api_key: String,

    /// Model to use
    #[arg(short, long, default_value = "gemini-2.5-flash")]
    model: String,

    /// Base URL of an OpenAI-compatible endpoint (defaults to Gemini)
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Sampling temperature
    #[arg(short, long, default_value_t = 0.7)]
    temperature: f32,

    /// Print the full refinement report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose mode (tracing output)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = OptimizerConfig::new(&args.model)
        .with_temperature(args.temperature)
        .with_progress(!args.json);

    let optimizer = match create_optimizer(&args, config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Failed to create optimizer: {}", e);
            std::process::exit(1);
        }
    };

    let result = match optimizer.optimize(&args.prompt, args.iterations) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!();
        println!("Final Optimized Prompt:");
        println!("{}", "=".repeat(50));
        println!("{}", result.prompt);
    }
}

fn create_optimizer(args: &Args, config: OptimizerConfig) -> promptimize::Result<Optimizer> {
    match &args.base_url {
        Some(url) => Optimizer::with_base_url_and_key(config, url, &args.api_key),
        None => Optimizer::with_api_key(config, &args.api_key),
    }
}
