use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use laptop_rank::catalog::{self, CandidateInput, CandidatePatch, Catalog, RawValue};
use laptop_rank::config::{self, init, Config};
use laptop_rank::output;
use laptop_rank::scoring::{self, Criterion, RankError, WeightConfig};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum SortBy {
    /// Best Weighted Product score first
    Wp,
    /// Best MAUT score first
    Maut,
    /// Order the laptops were added
    Input,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Row order of the output
    #[arg(long, value_enum, default_value_t = SortBy::Wp)]
    sort: SortBy,

    /// Tab-separated output for scripting
    #[arg(long, conflicts_with = "json")]
    tsv: bool,

    /// JSON output including normalized values and skipped laptops
    #[arg(long)]
    json: bool,

    /// Also write the ranking to a CSV file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: String,
    /// Memory in GB
    #[arg(long)]
    memory: String,
    /// Storage in GB
    #[arg(long)]
    storage: String,
    /// Processor label, e.g. "Intel Core i7-1255U"
    #[arg(long)]
    processor: String,
    /// Graphics label, e.g. "RTX 3050"
    #[arg(long)]
    graphics: String,
    /// Screen size in inches
    #[arg(long)]
    screen: String,
    #[arg(long)]
    rating: String,

    /// Do nothing if a laptop with the same name, processor and memory exists
    #[arg(long)]
    skip_duplicate: bool,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Id of the laptop (see `list`)
    id: u64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    memory: Option<String>,
    #[arg(long)]
    storage: Option<String>,
    #[arg(long)]
    processor: Option<String>,
    #[arg(long)]
    graphics: Option<String>,
    #[arg(long)]
    screen: Option<String>,
    #[arg(long)]
    rating: Option<String>,
}

#[derive(Args, Debug)]
struct SetWeightsArgs {
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    price: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    memory: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    storage: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    processor: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    graphics: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    screen: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    rating: u32,
}

#[derive(Subcommand, Debug)]
enum WeightsAction {
    /// Replace all seven weights (percentages totalling 100)
    Set(SetWeightsArgs),
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank your laptops with WP and MAUT (default if no subcommand)
    Rank(RankArgs),
    /// Add a laptop
    Add(AddArgs),
    /// Add laptops from a CSV file, skipping ones you already have
    Import {
        /// CSV file with a header row (name, price, ram, storage, cpu, gpu, screen, rating)
        path: PathBuf,
    },
    /// List your laptops
    List {
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Change fields of one of your laptops
    Edit(EditArgs),
    /// Remove one of your laptops by id
    Remove {
        id: u64,
    },
    /// Remove all of your laptops
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show the criterion weights, or replace them
    Weights {
        #[command(subcommand)]
        action: Option<WeightsAction>,
    },
    /// Interactively set owner and weights
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "laptop-rank")]
#[command(about = "Rank laptops by Weighted Product and MAUT scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/laptop-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Whose laptops to work with (defaults to config owner, then $USER)
    #[arg(short, long, global = true)]
    owner: Option<String>,

    /// Path to catalog file (defaults to ~/.config/laptop-rank/catalog.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Ranking flags, also accepted without the `rank` subcommand
    #[command(flatten)]
    rank: RankArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn fail(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = laptop_rank::telemetry::init(cli.verbose) {
        eprintln!("{}", e);
    }

    let command = match cli.command {
        Some(command) => command,
        None => Commands::Rank(cli.rank),
    };

    // Commands that write the config may create it at a new --config path
    let loaded = if matches!(command, Commands::Init | Commands::Weights { .. }) {
        config::load_config_or_default(cli.config.clone())
    } else {
        config::load_config(cli.config.clone())
    };
    let config = match loaded {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    // Config-only commands don't touch the catalog
    let command = match command {
        Commands::Init => {
            if let Err(e) = init::run_init_wizard(cli.config, config) {
                fail(EXIT_CONFIG, format!("Init failed: {:#}", e));
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Weights { action } => {
            run_weights(action, cli.config, config);
            std::process::exit(EXIT_SUCCESS);
        }
        other => other,
    };

    let owner = config::resolve_owner(cli.owner, &config);
    let catalog_path = match config::resolve_catalog_path(cli.catalog, &config) {
        Ok(p) => p,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };
    let mut catalog = match catalog::load_catalog(&catalog_path) {
        Ok(c) => c,
        Err(e) => fail(EXIT_STORAGE, format!("Catalog error: {:#}", e)),
    };
    tracing::debug!(%owner, catalog = %catalog_path.display(), "session");

    match command {
        Commands::Rank(args) => run_rank(&args, &config, &catalog, &owner),
        Commands::Add(args) => {
            let skip_duplicate = args.skip_duplicate;
            let input = CandidateInput {
                name: args.name,
                price: RawValue::parse(&args.price),
                memory: RawValue::parse(&args.memory),
                storage: RawValue::parse(&args.storage),
                processor: args.processor,
                graphics: args.graphics,
                screen_size: RawValue::parse(&args.screen),
                rating: RawValue::parse(&args.rating),
            };
            let name = input.name.clone();
            let inserted = if skip_duplicate {
                catalog.add_if_absent(&owner, input)
            } else {
                Some(catalog.add(&owner, input))
            };
            match inserted {
                Some(id) => {
                    warn_unrankable(&catalog, &owner, id);
                    save(&catalog_path, &catalog);
                    println!("Added '{}' with id {}", name, id);
                }
                None => println!("'{}' already exists, nothing added", name),
            }
        }
        Commands::Import { path } => {
            let summary = match catalog::import_file(&path, &mut catalog, &owner) {
                Ok(s) => s,
                Err(e) => fail(EXIT_DATA, format!("Import failed: {:#}", e)),
            };
            for &id in &summary.inserted {
                warn_unrankable(&catalog, &owner, id);
            }
            if !summary.inserted.is_empty() {
                save(&catalog_path, &catalog);
            }
            println!(
                "{} new laptops imported from {} ({} already present)",
                summary.inserted.len(),
                path.display(),
                summary.duplicates
            );
        }
        Commands::List { json } => {
            let laptops = catalog.list(&owner);
            if json {
                match serde_json::to_string_pretty(&laptops) {
                    Ok(text) => println!("{}", text),
                    Err(e) => fail(EXIT_DATA, format!("Failed to serialize laptops: {}", e)),
                }
            } else {
                println!(
                    "{}",
                    output::format_catalog(&laptops, output::should_use_colors())
                );
            }
        }
        Commands::Edit(args) => {
            let id = args.id;
            let patch = CandidatePatch {
                name: args.name,
                price: args.price.as_deref().map(RawValue::parse),
                memory: args.memory.as_deref().map(RawValue::parse),
                storage: args.storage.as_deref().map(RawValue::parse),
                processor: args.processor,
                graphics: args.graphics,
                screen_size: args.screen.as_deref().map(RawValue::parse),
                rating: args.rating.as_deref().map(RawValue::parse),
            };
            if patch.is_empty() {
                fail(EXIT_DATA, "Nothing to change. Pass at least one field flag.");
            }
            if !catalog.update(&owner, id, patch) {
                fail(EXIT_DATA, format!("No laptop with id {} for {}", id, owner));
            }
            warn_unrankable(&catalog, &owner, id);
            save(&catalog_path, &catalog);
            println!("Updated laptop {}", id);
        }
        Commands::Remove { id } => {
            if !catalog.remove(&owner, id) {
                fail(EXIT_DATA, format!("No laptop with id {} for {}", id, owner));
            }
            save(&catalog_path, &catalog);
            println!("Removed laptop {}", id);
        }
        Commands::Clear { yes } => {
            if !yes {
                fail(
                    EXIT_DATA,
                    format!("This removes every laptop of {}. Re-run with --yes to confirm.", owner),
                );
            }
            let removed = catalog.clear(&owner);
            save(&catalog_path, &catalog);
            println!("Removed {} laptops of {}", removed, owner);
        }
        Commands::Weights { .. } | Commands::Init => {}
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

fn save(path: &std::path::Path, catalog: &Catalog) {
    if let Err(e) = catalog::save_catalog(path, catalog) {
        fail(EXIT_STORAGE, format!("Catalog error: {:#}", e));
    }
}

/// Tell the user right away when a stored value will keep a laptop out of
/// the ranking, instead of leaving it to disappear silently.
fn warn_unrankable(catalog: &Catalog, owner: &str, id: u64) {
    let Some(candidate) = catalog.get(owner, id) else {
        return;
    };
    for criterion in Criterion::ALL {
        match candidate.value(criterion) {
            Some(v) if v > 0.0 => {}
            _ => tracing::warn!(
                "{} = {} is not a positive number; '{}' will be skipped when ranking",
                criterion,
                candidate.raw(criterion),
                candidate.name
            ),
        }
    }
}

fn run_rank(args: &RankArgs, config: &Config, catalog: &Catalog, owner: &str) {
    let Some(weights) = config.weights.as_ref() else {
        fail(
            EXIT_CONFIG,
            "No weights configured. Run `laptop-rank init` or `laptop-rank weights set`.",
        );
    };

    // Validate weights before ranking
    if let Err(errors) = scoring::validate_weights(weights) {
        eprintln!("Weight config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let candidates = catalog.list(owner);
    tracing::debug!(laptops = candidates.len(), %owner, "ranking");

    let ranking = match scoring::rank(&candidates, weights) {
        Ok(r) => r,
        Err(e @ RankError::InvalidWeightConfiguration(_)) => fail(EXIT_CONFIG, e),
        Err(e @ RankError::NoRankableCandidates { .. }) => fail(EXIT_DATA, e),
    };

    for exclusion in &ranking.excluded {
        tracing::warn!("{}", exclusion);
    }

    let rows = match args.sort {
        SortBy::Wp => ranking.by_wp(),
        SortBy::Maut => ranking.by_maut(),
        SortBy::Input => ranking.rows.iter().collect(),
    };

    if args.json {
        match output::format_json(&ranking) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(EXIT_DATA, format!("Failed to serialize ranking: {:#}", e)),
        }
    } else if args.tsv {
        println!("{}", output::format_tsv(&rows));
    } else {
        println!(
            "{}",
            output::format_ranking_table(&rows, output::should_use_colors())
        );
    }

    if let Some(path) = &args.export {
        if let Err(e) = output::export_csv(path, &rows) {
            fail(EXIT_STORAGE, format!("Export failed: {:#}", e));
        }
        eprintln!("Exported {} laptops to {}", rows.len(), path.display());
    }
}

fn run_weights(action: Option<WeightsAction>, config_path: Option<PathBuf>, mut config: Config) {
    let Some(WeightsAction::Set(args)) = action else {
        match &config.weights {
            Some(weights) => println!(
                "{}",
                output::format_weights(weights, output::should_use_colors())
            ),
            None => {
                println!("No weights configured. Defaults would be:");
                println!(
                    "{}",
                    output::format_weights(&WeightConfig::default(), output::should_use_colors())
                );
            }
        }
        return;
    };

    let entries = [
        (Criterion::Price, args.price),
        (Criterion::Memory, args.memory),
        (Criterion::Storage, args.storage),
        (Criterion::ProcessorScore, args.processor),
        (Criterion::GraphicsScore, args.graphics),
        (Criterion::ScreenSize, args.screen),
        (Criterion::Rating, args.rating),
    ];
    if let Err(e) = init::check_percent_total(&entries) {
        fail(EXIT_CONFIG, format!("Weights not saved: {}", e));
    }

    let weights = WeightConfig::from_percentages(&entries);
    if let Err(errors) = scoring::validate_weights(&weights) {
        fail(EXIT_CONFIG, format!("Weights not saved: {}", errors.join("; ")));
    }

    let path = match config_path {
        Some(p) => p,
        None => match config::get_config_path() {
            Ok(p) => p,
            Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
        },
    };

    config.weights = Some(weights);
    if let Err(e) = config::save_config(&path, &config) {
        fail(EXIT_CONFIG, format!("Config error: {:#}", e));
    }
    println!("Weights saved to {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rank_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["laptop-rank", "--tsv", "--sort", "maut"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.rank.tsv);
        assert_eq!(cli.rank.sort, SortBy::Maut);
    }

    #[test]
    fn test_rank_flags_with_subcommand() {
        let cli = Cli::try_parse_from(["laptop-rank", "rank", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Rank(args)) => {
                assert!(args.json);
                assert_eq!(args.sort, SortBy::Wp);
            }
            other => panic!("expected rank, got {:?}", other),
        }
    }

    #[test]
    fn test_import_takes_path() {
        let cli = Cli::try_parse_from(["laptop-rank", "-o", "alice", "import", "laptops.csv"]).unwrap();
        assert_eq!(cli.owner.as_deref(), Some("alice"));
        match cli.command {
            Some(Commands::Import { path }) => assert_eq!(path, PathBuf::from("laptops.csv")),
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_weights_set_rejects_out_of_range() {
        let result = Cli::try_parse_from([
            "laptop-rank", "weights", "set", "--price", "101", "--memory", "0", "--storage", "0",
            "--processor", "0", "--graphics", "0", "--screen", "0", "--rating", "0",
        ]);
        assert!(result.is_err());
    }
}
