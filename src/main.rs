//! revisor — CLI entry point for the revision loop.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at configured level
//!   4. Build the LLM provider (or none)
//!   5. Run one revision loop over the task from argv
//!   6. Print the terminal state

use tracing::info;

use revisor::config;
use revisor::error::AppError;
use revisor::llm::providers;
use revisor::logger;
use revisor::workflow::{LoopState, Workflow};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    let (task, strict_flag) = parse_args();
    let strict = strict_flag.unwrap_or(config.strict);

    info!(
        provider = %config.llm.provider,
        max_turns = config.workflow.max_turns,
        strict,
        "config loaded"
    );

    let provider = match config.llm.provider.as_str() {
        "none" => None,
        _ => Some(providers::build(&config.llm, config.llm_api_key.clone())?),
    };

    let workflow = Workflow::new(provider).with_max_turns(config.workflow.max_turns);
    let outcome = workflow.run(LoopState::new(task, strict)).await;

    let state = &outcome.state;
    println!("turns: {}", state.turn_count);
    match &state.proposal {
        Some(p) => {
            println!("proposal [{}]: {}", p.status, p.summary);
            for item in &p.action_items {
                println!("  - {item}");
            }
        }
        None => println!("proposal: none"),
    }
    match &state.feedback {
        Some(f) if f.approved => println!("verdict: approved"),
        Some(f) => {
            println!("verdict: rejected");
            for issue in &f.issues {
                println!("  - {issue}");
            }
        }
        None => println!("verdict: none (turn bound hit before review)"),
    }

    Ok(())
}

/// `revisor [--strict] [task words…]` — no flag leaves strict to the config,
/// no task words fall back to a stock task.
fn parse_args() -> (String, Option<bool>) {
    let mut strict = None;
    let mut words = Vec::new();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = Some(true),
            _ => words.push(arg),
        }
    }

    let task = if words.is_empty() {
        "Write a chapter".to_string()
    } else {
        words.join(" ")
    };
    (task, strict)
}
