//! xtts-verify - End-to-end check of a running XTTS server.
//!
//! Exit status: 0 when every call passed, 1 when health or embedding
//! extraction failed, 2 when some languages failed to synthesize.

mod client;
mod harness;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::{ServiceClient, Timeouts};
use harness::{Harness, HarnessConfig};

/// End-to-end verification harness for the XTTS server.
#[derive(Parser, Debug)]
#[command(name = "xtts-verify")]
#[command(about = "End-to-end verification harness for the XTTS server")]
struct Args {
    /// Server base URL
    #[arg(long, default_value = "http://localhost:8000")]
    server: String,

    /// Directory for synthesized WAV files
    #[arg(short = 'o', long, default_value = "test_output")]
    output_dir: PathBuf,

    /// Test tone duration in seconds
    #[arg(long, default_value_t = 4.0)]
    duration: f64,

    /// Test tone sample rate
    #[arg(long, default_value_t = 16000)]
    sample_rate: u32,

    /// Per-language synthesis timeout in seconds
    #[arg(long, default_value_t = 60)]
    synthesis_timeout: u64,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new("xtts_verify=debug"))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let client = ServiceClient::new(&args.server)?.with_timeouts(Timeouts {
        synthesize: Duration::from_secs(args.synthesis_timeout),
        ..Timeouts::default()
    });
    let harness = Harness::new(
        client,
        HarnessConfig {
            output_dir: args.output_dir,
            duration_seconds: args.duration,
            sample_rate: args.sample_rate,
        },
    );

    let outcome = harness.run().await;
    Ok(ExitCode::from(outcome.exit_code()))
}
