//! Support-flow REPL binary: parse flags, build the flow, drive stdin.

use clap::Parser;

use convograph_cli::{build_flow, run, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "convograph")]
#[command(about = "Customer-support flow REPL: identify, get help, request a call back")]
struct Args {
    /// Judge conditions and extract data with the real OpenAI API
    /// (requires OPENAI_API_KEY; build with --features openai).
    #[arg(long)]
    openai: bool,

    /// Model name for the OpenAI backend (defaults to OPENAI_MODEL).
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,
}

fn resolve_config(args: &Args) -> RunConfig {
    if args.openai {
        #[cfg(feature = "openai")]
        {
            let _ = dotenv::dotenv();
            return RunConfig::openai(args.model.clone());
        }
        #[cfg(not(feature = "openai"))]
        {
            eprintln!("--openai requires building with --features openai");
            std::process::exit(2);
        }
    }
    RunConfig::scripted()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = resolve_config(&args);
    let flow = build_flow(&config)?;

    run(flow).await
}
