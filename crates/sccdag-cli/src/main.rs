#![forbid(unsafe_code)]

mod cmd;
mod output;
mod timing;

use std::env;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use sccdag_core::config::{AnalysisConfig, load_effective_config};
use sccdag_core::error::ErrorCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sccdag: strongly connected components, condensation, and DAG paths",
    long_about = None
)]
struct Cli {
    /// Log the resolved configuration and output mode.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Shorthand for `--format json`.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Run the full pipeline on a graph file",
        long_about = "Decompose into SCCs, condense, order, and report shortest and longest paths.",
        after_help = "EXAMPLES:\n    # Full report\n    sccdag analyze data/small_cyclic.json\n\n    # Shortest paths from vertex 3\n    sccdag analyze data/small_cyclic.json --source 3\n\n    # Emit machine-readable output\n    sccdag analyze data/small_cyclic.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "List strongly connected components",
        after_help = "EXAMPLES:\n    sccdag scc data/medium_multiple_scc.json"
    )]
    Scc(cmd::scc::SccArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Topologically order the condensation",
        long_about = "Topologically order the condensation, or with --raw the input graph itself.",
        after_help = "EXAMPLES:\n    # Kahn order of the condensation\n    sccdag topo data/small_dag.json\n\n    # DFS order of the raw graph (reports a cycle if there is one)\n    sccdag topo data/small_cyclic.json --raw --algorithm dfs"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        next_help_heading = "Paths",
        about = "Shortest distances from a source",
        after_help = "EXAMPLES:\n    sccdag shortest data/small_dag.json --source 0 --target 9"
    )]
    Shortest(cmd::shortest::ShortestArgs),

    #[command(
        next_help_heading = "Paths",
        about = "Longest (critical) path",
        after_help = "EXAMPLES:\n    # Critical path over the condensation\n    sccdag longest data/large_dag.json\n\n    # Over the input graph; cyclic inputs report no path\n    sccdag longest data/large_cyclic.json --raw"
    )]
    Longest(cmd::longest::LongestArgs),

    #[command(
        next_help_heading = "Fixtures",
        about = "Write the standard dataset suite",
        after_help = "EXAMPLES:\n    sccdag generate --dir data --seed 42"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    sccdag completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCCDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "sccdag=debug,info"
        } else {
            "sccdag=info,warn"
        })
    });

    let format = env::var("SCCDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(output: OutputMode) -> anyhow::Result<AnalysisConfig> {
    let project_root = env::current_dir()?;
    match load_effective_config(&project_root) {
        Ok(config) => Ok(config),
        Err(err) => {
            let code = ErrorCode::ConfigParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            Err(err)
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);

    let output = cli.output_mode();
    let config = timing::timed("config", || load_config(output))?;

    if cli.verbose {
        info!(?output, ?config, "resolved settings");
    }

    let precision = config.report.precision;
    let command_result = match cli.command {
        Commands::Analyze(ref args) => timing::timed("cmd.analyze", || {
            cmd::analyze::run_analyze(args, output, config.topo.algorithm, precision)
        }),
        Commands::Scc(ref args) => timing::timed("cmd.scc", || cmd::scc::run_scc(args, output)),
        Commands::Topo(ref args) => timing::timed("cmd.topo", || {
            cmd::topo::run_topo(args, output, config.topo.algorithm)
        }),
        Commands::Shortest(ref args) => timing::timed("cmd.shortest", || {
            cmd::shortest::run_shortest(args, output, precision)
        }),
        Commands::Longest(ref args) => timing::timed("cmd.longest", || {
            cmd::longest::run_longest(args, output, precision)
        }),
        Commands::Generate(ref args) => timing::timed("cmd.generate", || {
            cmd::generate::run_generate(args, output, &config.generate)
        }),
        Commands::Completions(ref args) => timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else if output.is_json() {
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        } else {
            eprintln!("timing report:");
            eprint!("{}", report.display_table());
        }
    }

    command_result
}
