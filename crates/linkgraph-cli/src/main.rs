//! graph_console: seed the Star Wars demo store, run a query, print JSON.
//!
//! ```bash
//! # index page: features with their planets and climates
//! graph_console --pretty
//!
//! # selected roots with their default selections
//! graph_console --root characters --root starships
//!
//! # worker pool from a config file
//! graph_console --config linkgraph.toml
//! ```

use clap::Parser;
use linkgraph::{
    EngineConfig,
    core::{config::ConfigError, store::StoreError},
    prelude::*,
    to_json,
};
use linkgraph_testing_demo_starwars_fixtures::{display_schema, index_request, seed};
use std::{fs, path::PathBuf, process::ExitCode, sync::Arc};
use thiserror::Error as ThisError;
use tracing::{error, info};

const ROOTS: [&str; 4] = ["features", "planets", "characters", "starships"];

#[derive(Debug, Parser)]
#[command(name = "graph_console")]
#[command(about = "Run demo graph queries against an in-memory store", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root link to query; repeat for several. Defaults to the index page.
    #[arg(short, long = "root", value_parser = clap::builder::PossibleValuesParser::new(ROOTS))]
    roots: Vec<String>,

    /// Pretty-print the JSON result
    #[arg(short, long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

///
/// CliError
///

#[derive(Debug, ThisError)]
enum CliError {
    #[error("cannot read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] linkgraph::Error),

    #[error("seeding failed: {0}")]
    Seed(#[from] StoreError),

    #[error("cannot render result: {0}")]
    Render(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(%err, "graph console failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

// Returns whether every root link resolved.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let config = load_config(cli.config.as_ref())?;

    let store = MemoryStore::new();
    seed(&store)?;

    let engine = Engine::new(Arc::new(display_schema()?), Arc::new(store), &config)?;
    let request = request_for(&cli.roots);
    let response = engine.execute(&request);

    println!("{}", to_json(&response, cli.pretty)?);
    for err in response.errors() {
        error!(path = %err.path, class = %err.error.class(), "{}", err.error);
    }
    info!(roots = response.len(), ok = response.is_ok(), "query finished");

    Ok(response.is_ok())
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let source = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.clone(),
        source,
    })?;

    Ok(EngineConfig::from_toml_str(&source)?)
}

fn request_for(roots: &[String]) -> Request {
    if roots.is_empty() {
        return index_request();
    }

    roots
        .iter()
        .fold(Request::new(), |req, root| req.root(root, default_selection(root)))
}

fn default_selection(root: &str) -> Selection {
    match root {
        "features" => Selection::new()
            .fields(&["title", "director", "episode-num", "release-date"])
            .link("planets", Selection::new().field("name")),
        "planets" => Selection::new()
            .fields(&["name", "climate", "terrain"])
            .link("features", Selection::new().field("title")),
        "characters" => Selection::new()
            .fields(&["name", "gender", "birth-year"])
            .link("home-planet", Selection::new().field("name")),
        _ => Selection::new()
            .fields(&["name", "model", "class"])
            .link("features", Selection::new().field("title")),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if verbose {
        EnvFilter::new("linkgraph_core=debug,graph_console=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
