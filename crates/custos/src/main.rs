use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

use custos::{
    aggregate_permissions, load_and_validate, load_fixtures, registry_from_fixtures,
    run_policies, session_factory_for, RootConfig, RootError,
};

/// Custos: cloud-resource policy engine
///
/// Loads policy documents, validates them against a provider registry,
/// and polls them to report matching resources.
#[derive(Parser, Debug)]
#[command(name = "custos", version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate a policy document without polling
    Validate {
        /// Policy document (JSON)
        #[arg(long)]
        policies: PathBuf,

        /// Fixture document defining the provider environment (JSON)
        #[arg(long)]
        fixtures: PathBuf,
    },

    /// Validate and poll a policy document, printing matched resources
    Run {
        /// Policy document (JSON)
        #[arg(long)]
        policies: PathBuf,

        /// Fixture document defining the provider environment (JSON)
        #[arg(long)]
        fixtures: PathBuf,
    },

    /// Report the aggregated permission footprint of a policy document
    Permissions {
        /// Policy document (JSON)
        #[arg(long)]
        policies: PathBuf,

        /// Fixture document defining the provider environment (JSON)
        #[arg(long)]
        fixtures: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("custos=debug,custos_policy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("custos=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RootConfig, RootError> {
    match path {
        Some(p) => RootConfig::load(p),
        None => RootConfig::load(&RootConfig::default_config_path()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RootError> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Validate { policies, fixtures } => {
            let validated = load(&config, &policies, &fixtures)?;
            println!("{} policies valid:", validated.len());
            for policy in &validated {
                println!("  {} ({})", policy.name(), policy.resource_type());
            }
            Ok(())
        }
        Commands::Run { policies, fixtures } => {
            let validated = load(&config, &policies, &fixtures)?;
            let runs = run_policies(&validated)?;
            for run in &runs {
                println!(
                    "{} ({}): {} matched",
                    run.policy,
                    run.resource_type,
                    run.matched.len()
                );
                for resource in &run.matched {
                    println!("  {}", resource);
                }
            }
            Ok(())
        }
        Commands::Permissions { policies, fixtures } => {
            let validated = load(&config, &policies, &fixtures)?;
            for permission in aggregate_permissions(&validated) {
                println!("{}", permission);
            }
            Ok(())
        }
    }
}

fn load(
    config: &RootConfig,
    policies: &Path,
    fixtures: &Path,
) -> Result<Vec<custos_policy::Policy>, RootError> {
    let fixture_doc = load_fixtures(fixtures)?;
    let registry = Arc::new(registry_from_fixtures(&fixture_doc));
    let session_factory = session_factory_for(&config.runtime);
    load_and_validate(policies, registry, config.runtime.clone(), session_factory)
}
