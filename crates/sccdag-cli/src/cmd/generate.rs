//! `sccdag generate`: write the standard fixture suite.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sccdag_core::config::GenerateConfig;
use sccdag_sim::write_suite;
use serde::Serialize;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render, render_error};

/// Arguments for `sccdag generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory (defaults to `[generate] output_dir`).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Base seed (defaults to `[generate] seed`).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    dir: PathBuf,
    seed: u64,
    files: Vec<PathBuf>,
}

/// Execute `sccdag generate`.
pub fn run_generate(
    args: &GenerateArgs,
    output: OutputMode,
    defaults: &GenerateConfig,
) -> anyhow::Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| defaults.output_dir.clone());
    let seed = args.seed.unwrap_or(defaults.seed);

    let files = match write_suite(&dir, seed) {
        Ok(files) => files,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    "check that the output directory is writable",
                    "generate_failed",
                ),
            )?;
            return Err(err);
        }
    };

    let payload = GenerateOutput { dir, seed, files };
    render(output, &payload, |p, w| render_generate_human(p, output.is_pretty(), w))
}

fn render_generate_human(
    payload: &GenerateOutput,
    pretty: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if pretty {
        pretty_section(w, &format!("Generated {} datasets", payload.files.len()))?;
        pretty_kv(w, "directory", payload.dir.display().to_string())?;
        pretty_kv(w, "seed", payload.seed.to_string())?;
        writeln!(w)?;
    }
    for file in &payload.files {
        writeln!(w, "{}", file.display())?;
    }
    Ok(())
}
