//! Summarise an AMReX plotfile and optionally decode one variable

// pltools modules
use pltools::plotfile::{Plotfile, Result};
use pltools::utils::{ShapeExt, ValueExt};

// standard library
use std::path::PathBuf;

// external crates
use clap::{ArgAction, Parser};
use log::{error, warn};

/// Summarise an AMReX plotfile
///
/// Prints the header information, and the shape and range of a variable if
/// one is given.
#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help(true))]
struct Cli {
    /// Path to the plotfile directory
    #[arg(value_name = "PLOTFILE")]
    path: PathBuf,

    /// Variable to decode
    #[arg(value_name = "VARIABLE")]
    variable: Option<String>,

    /// Refinement level to decode
    #[arg(short, long, default_value_t = 0)]
    level: usize,

    /// Print the header metadata as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut plotfile = Plotfile::open(&cli.path)?;

    if cli.json {
        match serde_json::to_string_pretty(plotfile.metadata()) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Unable to serialise metadata: {e}"),
        }
    } else {
        println!("{}", plotfile.metadata());
    }

    let detected = plotfile.detected_levels();
    let declared = plotfile.metadata().level_count;
    if detected != declared {
        warn!("Found {detected} level directories but the header declares {declared}");
    }

    let Some(variable) = &cli.variable else {
        return Ok(());
    };

    if !cli.quiet {
        plotfile.enable_progress();
    }

    let field = plotfile.decode_level(variable, cli.level)?;
    let shape = field
        .shape()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<String>>()
        .join(" x ");

    println!("{} (level {})", field.name(), field.level());
    println!("    shape: {shape} ({} cells)", field.shape().element_count());
    match field.min_max() {
        Some((lo, hi)) => println!("    range: {} to {}", lo.sci(5, 2), hi.sci(5, 2)),
        None => println!("    range: no finite values"),
    }
    for problem in field.diagnostics() {
        println!("    warning: {problem}");
    }

    Ok(())
}

/// Sets up logging at runtime to allow for multiple verbosity levels
fn init_logging(cli: &Cli) {
    let result = stderrlog::new()
        .modules(["pltinfo", "pltools_plotfile"])
        .quiet(cli.quiet)
        .verbosity(cli.verbose as usize + 2)
        .show_level(true)
        .init();

    if let Err(e) = result {
        eprintln!("Unable to initialise logging: {e}");
    }
}
