//! Modux Verify Binary
//!
//! Checks that a PDF's first page is included under a Merkle root.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use modux_pdf::HashOptions;
use modux_verify::{verify_files, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "modux-verify")]
#[command(
    version,
    about = "Verify a PDF's first-page hash against a Merkle inclusion proof"
)]
struct Args {
    /// PDF file to hash
    pdf: PathBuf,

    /// JSON proof document with `proof` and `merkle_root`
    proof: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Stop walking after this many indirect objects (0 disables the limit)
    #[arg(long, default_value = "1000000")]
    max_objects: usize,

    /// Refuse canonical buffers larger than this (0 disables the limit)
    #[arg(long, default_value = "536870912")]
    max_buffer_bytes: usize,

    /// Log walker and decoder detail to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn hash_options(&self) -> HashOptions {
        let mut options = HashOptions::unbounded();
        if self.max_objects > 0 {
            options = options.with_max_objects(self.max_objects);
        }
        if self.max_buffer_bytes > 0 {
            options = options.with_max_canonical_bytes(self.max_buffer_bytes);
        }
        options
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the verdict, so logs go to stderr
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(pdf = %args.pdf.display(), proof = %args.proof.display(), "Verifying");

    let report = verify_files(&args.pdf, &args.proof, &args.hash_options())?;
    tracing::info!(valid = report.valid, leaf = %report.leaf_hash, "Verification finished");
    let rendered = report
        .render(args.format)
        .context("Failed to render report")?;
    println!("{}", rendered);

    Ok(())
}
