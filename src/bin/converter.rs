#![deny(clippy::all)]

use clap::Parser;
use seg2su::{prelude::*, seg2, su, tracing::try_init_tracing_subscriber};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Convert SEG-2 files to Seismic Unix trace files
#[derive(Parser, Debug, Clone)]
#[clap(version)]
pub struct Opts {
    #[clap(flatten)]
    pub convert_opts: ConvertOpts,

    /// Log progress at info level unless RUST_LOG is set
    #[clap(long, short)]
    pub verbose: bool,

    /// Paths to SEG-2 files
    #[clap(name = "input", help_heading = "CONVERSION CONFIGURATION")]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Seg2su(#[from] seg2su::error::Error),

    #[error("At least one SEG-2 input path is required.")]
    MissingInputs,

    #[error("Failed to convert '{}'.", path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: seg2su::error::Error,
    },
}

fn main() {
    match do_main() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            let mut cause = e.source();
            while let Some(err) = cause {
                eprintln!("Caused by: {err}");
                cause = err.source();
            }
            std::process::exit(exitcode::SOFTWARE);
        }
    }
}

fn do_main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    let level = if opts.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    try_init_tracing_subscriber(level)?;

    let mut cfg = ConvertConfig::load_merge_with_opts(opts.convert_opts)?;
    if !opts.inputs.is_empty() {
        cfg.inputs = opts.inputs;
    }
    if cfg.inputs.is_empty() {
        return Err(Error::MissingInputs.into());
    }

    if let Some(dir) = &cfg.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    for input in cfg.inputs.iter() {
        let stream = match seg2::read(input, &cfg.read) {
            Ok(Some(stream)) => stream,
            Ok(None) => {
                warn!("Skipping '{}'", input.display());
                continue;
            }
            Err(source) => {
                return Err(Error::Convert {
                    path: input.clone(),
                    source,
                }
                .into())
            }
        };
        let output = cfg.output_path(input);
        su::write(&stream, &output).map_err(|source| Error::Convert {
            path: input.clone(),
            source,
        })?;
        info!(
            traces = stream.ntraces(),
            samples = stream.nsamples(),
            warnings = stream.warnings().len(),
            "Converted '{}' to '{}'",
            input.display(),
            output.display()
        );
    }

    Ok(())
}
