use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use jsprune_core::{
    print_program, CleanResult, Cleaner, CleanerConfig, CliOverrides, EliminationMode, Program,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "jsprune.yaml";

/// jsprune - dead-code elimination for JavaScript program trees
#[derive(Parser, Debug)]
#[command(name = "jsprune")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean one or more program trees given as JSON files
    Clean(CleanArgs),
    /// Write a jsprune.yaml with the default settings
    Init,
}

#[derive(clap::Args, Debug)]
struct CleanArgs {
    /// Program tree files (JSON)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Path to a jsprune.yaml configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write one output file per input into this directory instead of stdout
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Emit::Json)]
    emit: Emit,

    /// Report only; exit with status 1 if anything would be removed
    #[arg(long)]
    check: bool,

    /// Do not fold constant if/switch statements
    #[arg(long)]
    no_fold: bool,

    /// Keep statements after return/throw
    #[arg(long)]
    no_unreachable: bool,

    /// Keep unreferenced functions
    #[arg(long)]
    no_unused_functions: bool,

    /// Keep unreferenced variables
    #[arg(long)]
    no_unused_variables: bool,

    /// Do not report unreferenced parameters
    #[arg(long)]
    no_unused_parameters: bool,

    /// Keep function declarations after return/throw, as hoisting may still call them
    #[arg(long)]
    hoist_functions: bool,

    /// Never remove program-level declarations
    #[arg(long)]
    preserve_top_level: bool,

    /// Run function and variable elimination once instead of to a fixed point
    #[arg(long)]
    single_round: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Diagnostics and transformed tree as JSON
    Json,
    /// Transformed program as JavaScript text
    Js,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    // Set RUST_LOG=debug for per-pass details.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Init => init_config(),
        Command::Clean(args) => {
            let config = load_config(&args)?;
            let anything_removed = clean_files(&args, &config)?;
            if args.check && anything_removed {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_config() -> anyhow::Result<()> {
    let path = Path::new(DEFAULT_CONFIG);
    if path.exists() {
        bail!("{} already exists", DEFAULT_CONFIG);
    }
    let yaml = CleanerConfig::default().to_yaml_string()?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", DEFAULT_CONFIG))?;
    println!("Created {}", DEFAULT_CONFIG);
    Ok(())
}

/// Config file (explicit, or jsprune.yaml in the current directory) with
/// command-line overrides applied
fn load_config(args: &CleanArgs) -> anyhow::Result<CleanerConfig> {
    let mut config = match &args.config {
        Some(path) => CleanerConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);
            if default_path.exists() {
                CleanerConfig::from_file(&default_path)
                    .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG))?
            } else {
                CleanerConfig::default()
            }
        }
    };

    let disabled = |flag: bool| flag.then_some(false);
    let overrides = CliOverrides {
        fold_constants: disabled(args.no_fold),
        remove_unreachable: disabled(args.no_unreachable),
        remove_unused_functions: disabled(args.no_unused_functions),
        remove_unused_variables: disabled(args.no_unused_variables),
        report_unused_parameters: disabled(args.no_unused_parameters),
        hoist_function_declarations: args.hoist_functions.then_some(true),
        preserve_top_level: args.preserve_top_level.then_some(true),
        elimination_mode: args.single_round.then_some(EliminationMode::SingleRound),
    };
    config.merge(&overrides);
    debug!(?config, "effective configuration");
    Ok(config)
}

/// Clean every file in parallel, then report and write results in input
/// order. Returns whether anything was (or would be) removed.
fn clean_files(args: &CleanArgs, config: &CleanerConfig) -> anyhow::Result<bool> {
    use rayon::prelude::*;

    info!("Cleaning {} file(s)", args.files.len());
    let cleaner = Cleaner::new(config.clone());

    let results: Vec<(PathBuf, anyhow::Result<CleanResult>)> = args
        .files
        .par_iter()
        .map(|path| (path.clone(), clean_file(&cleaner, path)))
        .collect();

    if let Some(out_dir) = &args.out_dir {
        if !args.check {
            std::fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
        }
    }

    let mut failures = 0;
    let mut anything_removed = false;
    for (path, result) in results {
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                eprintln!("error: {}: {:#}", path.display(), err);
                failures += 1;
                continue;
            }
        };

        for diagnostic in &result.diagnostics {
            eprintln!("{}: {}", path.display(), diagnostic);
        }
        anything_removed |= result.removed_anything();

        if args.check {
            continue;
        }
        let output = render(&result, args.emit)?;
        match &args.out_dir {
            Some(out_dir) => {
                let target = output_path(out_dir, &path, args.emit);
                std::fs::write(&target, output)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                info!("Wrote {}", target.display());
            }
            None => print!("{}", output),
        }
    }

    if failures > 0 {
        bail!("{} of {} file(s) could not be cleaned", failures, args.files.len());
    }
    Ok(anything_removed)
}

fn clean_file(cleaner: &Cleaner, path: &Path) -> anyhow::Result<CleanResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let program = Program::from_json(&json)?;
    let result = cleaner.clean(program)?;
    debug!(file = %path.display(), rounds = result.rounds, "cleaned");
    Ok(result)
}

fn render(result: &CleanResult, emit: Emit) -> anyhow::Result<String> {
    Ok(match emit {
        Emit::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        Emit::Js => print_program(&result.program),
    })
}

/// `<out_dir>/<stem>.clean.json` or `<out_dir>/<stem>.js`
fn output_path(out_dir: &Path, input: &Path, emit: Emit) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = match emit {
        Emit::Json => format!("{}.clean.json", stem),
        Emit::Js => format!("{}.js", stem),
    };
    out_dir.join(file_name)
}
