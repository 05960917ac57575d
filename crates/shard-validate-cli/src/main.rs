//! shard-validate CLI - plan shard-by-shard, partition-by-partition
//! validation of migrated tables.

use clap::{Parser, Subcommand};
use shard_validate::{
    partition::bind_table, resolve, Config, DialectPair, LoaderChain, TableCatalog, TopologyConfig,
    ValidateError, ValidationConfig, ValidationPlan,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "shard-validate")]
#[command(about = "Plan validation of sharded MySQL/PostgreSQL data migrated to Spanner")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file [default: config.yaml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Topology descriptor path (local file or gs://bucket/object);
    /// overrides the configured topology source
    #[arg(long)]
    topology: Option<String>,

    /// Dialect pair: mysql_spanner or postgres_spangres
    #[arg(long)]
    dialect_pair: Option<String>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the shard identities the topology expands to
    Shards,

    /// List the table specs in the selected catalog
    Tables,

    /// Show partition boundaries and bound queries
    Partitions {
        /// Restrict to these tables (repeatable)
        #[arg(short, long)]
        table: Vec<String>,
    },

    /// Build the full validation plan
    Plan {
        /// Restrict to these tables (repeatable)
        #[arg(short, long)]
        table: Vec<String>,
    },

    /// Validate configuration, topology and catalog without printing the plan
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ValidateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = load_config(&cli)?;

    if let Some(ref pair) = cli.dialect_pair {
        config.validation.dialect_pair = pair.parse::<DialectPair>()?;
    }
    match cli.command {
        Commands::Partitions { ref table } | Commands::Plan { ref table } if !table.is_empty() => {
            config.validation.tables = table.clone();
        }
        _ => {}
    }
    config.validate()?;

    match cli.command {
        Commands::Shards => {
            let topology = LoaderChain::from_config(&config.topology).load().await?;
            let shards = resolve(&topology)?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&shards)?);
            } else {
                for shard in &shards {
                    println!("{}", shard);
                }
                println!("\n  Shards: {}", shards.len());
            }
        }

        Commands::Tables => {
            let catalog = TableCatalog::load(config.validation.dialect_pair)?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(catalog.specs())?);
            } else {
                println!("Tables ({}):", catalog.dialect_pair());
                for spec in catalog.specs() {
                    println!(
                        "  {} [{}] key column {}, fraction {}%, keys {}..={}",
                        spec.name(),
                        spec.key_type(),
                        spec.key_column_index(),
                        spec.partition_fraction(),
                        spec.min_key(),
                        spec.max_key()
                    );
                }
            }
        }

        Commands::Partitions { .. } => {
            let catalog = TableCatalog::load(config.validation.dialect_pair)?
                .retain_tables(&config.validation.tables)?;

            let mut tables = Vec::with_capacity(catalog.len());
            for spec in catalog.specs() {
                tables.push((spec, bind_table(spec)?));
            }

            if cli.output_json {
                let json: Vec<_> = tables
                    .iter()
                    .map(|(spec, partitions)| {
                        serde_json::json!({
                            "table": spec.name(),
                            "partitions": partitions,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                for (spec, partitions) in &tables {
                    println!(
                        "{} [{}] {} partitions",
                        spec.name(),
                        spec.key_type(),
                        partitions.len()
                    );
                    for p in partitions {
                        println!("  {:>3} {}", p.range.index, p.range);
                        println!("      source: {}", p.source.inline_sql());
                        println!("      target: {}", p.target.inline_sql());
                    }
                }
            }
        }

        Commands::Plan { .. } => {
            let plan = ValidationPlan::from_config(&config).await?;

            if cli.output_json {
                println!("{}", plan.to_json()?);
            } else {
                print_summary(&plan)?;
            }
        }

        Commands::Check => {
            let plan = ValidationPlan::from_config(&config).await?;
            info!("Configuration hash: {}", config.hash());

            if cli.output_json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "ok": true,
                        "dialect_pair": plan.dialect_pair,
                        "shards": plan.shards.len(),
                        "tables": plan.tables.len(),
                        "query_pairs": plan.total_query_pairs(),
                        "fingerprint": plan.fingerprint()?,
                    }))?
                );
            } else {
                println!("Check passed");
                print_summary(&plan)?;
            }
        }
    }

    Ok(())
}

/// Resolve the run configuration from `--config` and the override flags.
///
/// With `--topology` and no `--config`, no file is read. The result is not
/// validated; `run` validates once every override is applied.
fn load_config(cli: &Cli) -> Result<Config, ValidateError> {
    let mut config = match (&cli.config, &cli.topology) {
        (Some(path), _) => {
            let config = Config::read(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        (None, Some(_)) => Config {
            topology: TopologyConfig::default(),
            validation: ValidationConfig::default(),
        },
        (None, None) => Config::read(DEFAULT_CONFIG)?,
    };

    if let Some(ref topology) = cli.topology {
        config.topology.resource = None;
        config.topology.path = Some(topology.clone());
    }

    Ok(config)
}

fn print_summary(plan: &ValidationPlan) -> Result<(), ValidateError> {
    println!("\nValidation plan ({}):", plan.dialect_pair);
    println!("  Shards: {}", plan.shards.len());
    for table in &plan.tables {
        println!(
            "  Table {} [{}]: {} partitions",
            table.table,
            table.key_type,
            table.partitions.len()
        );
    }
    println!("  Query pairs: {}", plan.total_query_pairs());
    println!("  Fingerprint: {}", plan.fingerprint()?);
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
