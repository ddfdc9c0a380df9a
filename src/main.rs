use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gedtree::{load_genealogy, render_tree, GedtreeError, MarriagePlacement, TreeOptions};

#[derive(Debug, Parser)]
#[command(name = "gedtree")]
#[command(about = "Convert GEDCOM records to a genealogytree chart", long_about = None)]
struct Cli {
    /// GEDCOM file, or a JSON record set (`.json`)
    input: PathBuf,

    /// Xref of the proband, e.g. `I1` or `@I1@`
    #[arg(short, long, required_unless_present = "dump_json")]
    root: Option<String>,

    /// Generations of ancestors, the proband included
    #[arg(short, long, default_value_t = 0)]
    ancestors: u32,

    /// Generations of descendants, the proband included
    #[arg(short, long, default_value_t = 0)]
    descendants: u32,

    /// Where marriage dates are written
    #[arg(short, long, value_enum, default_value_t = MarriagePlacement::Family)]
    marriage: MarriagePlacement,

    /// Individual or family xrefs left out of the tree (repeatable, comma separated)
    #[arg(short, long, value_delimiter = ',')]
    ignore: Vec<String>,

    /// Add a floruit field computed from dated events
    #[arg(short, long)]
    floruit: bool,

    /// Trace the traversal on stderr
    #[arg(long)]
    debug: bool,

    /// Write the tree to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the loaded records as JSON instead of a tree
    #[arg(long)]
    dump_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let usage = err
                .downcast_ref::<GedtreeError>()
                .is_some_and(GedtreeError::is_usage);
            if usage {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "gedtree=debug" } else { "gedtree=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_ansi(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.dump_json {
        let genealogy = load(&cli.input)?;
        let json = serde_json::to_string_pretty(&genealogy.to_record_set())?;
        return write_output(cli.output.as_deref(), &format!("{}\n", json));
    }

    let root = cli.root.as_deref().context("--root is required")?;
    let options = TreeOptions::new(root)
        .with_ancestors(cli.ancestors)
        .with_descendants(cli.descendants)
        .with_marriage(cli.marriage)
        .with_floruit(cli.floruit)
        .with_debug(cli.debug)
        .ignoring(&cli.ignore);
    options.validate()?;

    let genealogy = load(&cli.input)?;
    let tree = render_tree(&genealogy, &options)?;
    write_output(cli.output.as_deref(), &tree)
}

fn load(path: &Path) -> Result<gedtree::Genealogy> {
    load_genealogy(path).with_context(|| format!("failed to load {}", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
