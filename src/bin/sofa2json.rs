use anyhow::{Context, Result};
use clap::Parser;

use sofa2json::convert::Converter;

use std::path::PathBuf;

/// Convert the HRTF data of a SOFA file into the leaves JSON layout.
#[derive(Debug, Parser)]
#[command(name = "sofa2json", version)]
struct Args {
    /// SOFA file to read.
    #[arg(default_value = "public/hrtf/MIT_KEMAR_Normal.sofa")]
    input: PathBuf,

    /// JSON file to write. Replaced only if the conversion succeeds.
    #[arg(default_value = "public/hrtf/hrtf_kemar.json")]
    output: PathBuf,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Skip the position count and receiver count checks.
    #[arg(long)]
    no_validate: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    Converter::new()
        .pretty(args.pretty)
        .validate(!args.no_validate)
        .convert(&args.input, &args.output)
        .with_context(|| {
            format!(
                "Converting {} to {} failed",
                args.input.display(),
                args.output.display()
            )
        })
}
