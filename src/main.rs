use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use chargen_tags::app::ports::FormResolver;
use chargen_tags::config::{Config, DEFAULT_CONFIG_PATH};
use chargen_tags::infra::{FormTable, FsResourceProvider, LoadOrder};
use chargen_tags::logging;
use chargen_tags::{FormId, PartType, TagLoader, TagRegistry};

#[derive(Parser)]
#[command(name = "chargen-tags")]
#[command(about = "Load and query per-package form and part tags")]
#[command(version)]
struct Cli {
    /// Configuration file; defaults are used when it does not exist
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override loader.data_dir
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every package and print all tagged forms and part types
    Load,
    /// Print the tags of one form, e.g. "Hair.esp|0x000D62"
    Tags { identifier: String },
    /// Print the part tags of one part type
    Parts { part_type: PartType },
}

fn build_form_table(config: &Config) -> Result<FormTable> {
    let load_order = match &config.loader.load_order {
        Some(path) => LoadOrder::from_file(path)?,
        None => LoadOrder::new(config.loader.packages.iter().cloned()),
    };
    if load_order.is_empty() {
        warn!("Load order is empty; no tag files will be read");
    }

    let mut table = FormTable::new(load_order);
    if config.loader.strict_forms {
        for identifier in &config.loader.known_forms {
            table
                .insert(identifier)
                .with_context(|| format!("invalid entry in loader.known_forms: {}", identifier))?;
        }
    } else {
        table = table.accept_all_local_ids();
    }
    Ok(table)
}

fn print_form(table: &FormTable, registry: &TagRegistry, form: FormId) {
    let name = table.lookup(form).unwrap_or_else(|| form.to_string());
    println!("{}: {}", name, registry.tags(form).join(", "));
}

fn print_part_type(registry: &TagRegistry, part_type: PartType) {
    println!("part type {}:", part_type);
    registry.visit_part_tags(part_type, |name, label| {
        println!("  {} ({})", name, label);
    });
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.loader.data_dir = data_dir;
    }
    let _guard = logging::init_logging(&config.logging);

    let table = build_form_table(&config)?;
    let resources = FsResourceProvider::new(&config.loader.data_dir);
    let registry = TagRegistry::new();

    TagLoader::new(&registry, &table, table.load_order(), &resources)
        .with_plugins_root(&config.loader.plugins_root)
        .load_mods();
    info!(
        "Registry holds {} forms and {} part types",
        registry.form_count(),
        registry.part_type_count()
    );

    match cli.command {
        Commands::Load => {
            let mut forms = registry.forms();
            forms.sort();
            for form in forms {
                print_form(&table, &registry, form);
            }
            let mut part_types = registry.part_types();
            part_types.sort();
            for part_type in part_types {
                print_part_type(&registry, part_type);
            }
        }
        Commands::Tags { identifier } => {
            let form = table
                .resolve_identifier(&identifier)
                .with_context(|| format!("unknown form: {}", identifier))?;
            if registry.has_tags(form) {
                print_form(&table, &registry, form);
            } else {
                println!("{}: no tags", identifier);
            }
        }
        Commands::Parts { part_type } => {
            if registry.has_part_tags(part_type) {
                print_part_type(&registry, part_type);
            } else {
                println!("part type {}: no tags", part_type);
            }
        }
    }

    Ok(())
}
