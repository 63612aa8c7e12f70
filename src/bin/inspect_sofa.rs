use clap::Parser;

use sofa2json::inspect::Inspector;

use std::path::PathBuf;

/// Print the layout of a SOFA file. Always exits successfully.
#[derive(Debug, Parser)]
#[command(name = "inspect-sofa", version)]
struct Args {
    /// SOFA file to inspect.
    #[arg(default_value = "public/hrtf/MIT_KEMAR_Normal.sofa")]
    path: PathBuf,

    /// List every dataset in the file with its shape and type.
    #[arg(long)]
    all: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // argument errors are reported too, but never turn into a failure status
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return;
        }
    };

    Inspector::new().all(args.all).run(&args.path);
}
