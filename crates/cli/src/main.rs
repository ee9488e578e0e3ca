mod cmd;
mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use repatch_lib::config::{PackagePaths, RunConfig};
use repatch_lib::consts::{APP_NAME, DEFAULT_WORK_DIR, PACKAGE_PATHS_ENV};

use crate::output::{OutputFormat, print_error};

/// repatch - patch a zipped Maven repository and generate galleon patches
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Zipped Maven repository to patch
  original: PathBuf,

  /// Zipped repository patch with the updated artifacts
  patch: PathBuf,

  /// Where the patched repository archive is written (replaced if it exists)
  #[arg(value_name = "OUTPUT")]
  output_file: PathBuf,

  /// Comma separated feature-pack paths, relative to the repository root
  #[arg(long, env = PACKAGE_PATHS_ENV, value_name = "PATHS")]
  packages: Option<String>,

  /// Scratch directory, wiped at start. It can be deleted once the run is over
  #[arg(long, value_name = "DIR", default_value = DEFAULT_WORK_DIR)]
  work_dir: PathBuf,

  /// Output format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let packages = cli
    .packages
    .as_deref()
    .map(PackagePaths::parse)
    .unwrap_or_default();
  let config = RunConfig::new(cli.original, cli.patch, cli.output_file)
    .with_work_dir(cli.work_dir)
    .with_packages(packages);

  if let Err(err) = cmd::cmd_patch(&config, cli.output) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}
