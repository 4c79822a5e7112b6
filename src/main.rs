//! `load-mappers` — print the mapper registry for a TypeScript tree as JSON.

mod logging;

use std::path::PathBuf;

use clap::Parser;
use mapper_registry::{load_mappers, MappersError, ScanOptions};

#[derive(Parser, Debug)]
#[command(
    name = "load-mappers",
    about = "Scan *.mappers.ts files and print a Key -> ./path#KeyMapper registry as JSON"
)]
struct Cli {
    /// Directory every recorded path is made relative to
    output_dir: PathBuf,

    /// Directory to scan (default: current directory)
    #[arg(long = "dir", short = 'd', value_name = "DIR")]
    current_dir: Option<PathBuf>,

    /// Directory basename to skip; repeat to build the list (replaces the default list)
    #[arg(long = "ignore", value_name = "NAME")]
    ignore: Vec<String>,

    /// Keep the .ts extension in recorded paths
    #[arg(long, conflicts_with = "strip_extension")]
    keep_extension: bool,

    /// Drop the .ts extension from recorded paths (the default; overrides a config file)
    #[arg(long)]
    strip_extension: bool,

    /// Regex a file name must match to be parsed
    #[arg(long, value_name = "REGEX")]
    files_pattern: Option<String>,

    /// Regex a declared name must match to count as a mapper
    #[arg(long, value_name = "REGEX")]
    suffix_pattern: Option<String>,

    /// JSON options file; command line flags override it
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the registry on a single line
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Options given as flags; unset flags stay `None` so they do not mask
    /// values from a config file.
    fn flag_options(&self) -> ScanOptions {
        ScanOptions {
            current_dir: self.current_dir.clone(),
            ignore_list: (!self.ignore.is_empty()).then(|| self.ignore.clone()),
            remove_extension: match (self.keep_extension, self.strip_extension) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            },
            mapper_files_pattern: self.files_pattern.clone(),
            mapper_suffix_pattern: self.suffix_pattern.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("load-mappers: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, MappersError> {
    let base = match &cli.config {
        Some(path) => ScanOptions::from_file(path)?,
        None => ScanOptions::default(),
    };
    let options = base.overlay(cli.flag_options());

    let registry = load_mappers(&cli.output_dir, options)?;
    tracing::debug!(mappers = registry.len(), "registry built");

    let json = if cli.compact {
        serde_json::to_string(&registry)
    } else {
        serde_json::to_string_pretty(&registry)
    };
    // Serializing a string map cannot fail.
    Ok(json.unwrap_or_default())
}
