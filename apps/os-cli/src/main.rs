use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use os_app::{AppError, AppResult, LogMessage, TranslatorConfig, model_service, project_service};
use os_idf::StrictnessLevel;

#[derive(Parser)]
#[command(name = "os-cli")]
#[command(about = "Building energy model toolkit - read, translate and update models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a model against the schema
    Validate {
        /// Model file (.osm, .idf, .xml, .gbxml, .sdd)
        path: PathBuf,
        /// Strictness level: none, minimal, draft or final
        #[arg(long, default_value = "draft")]
        strictness: String,
    },
    /// Print object counts and floor area of a model
    Summary {
        /// Model file (.osm, .idf, .xml, .gbxml, .sdd)
        path: PathBuf,
    },
    /// Translate a model between formats, chosen by file extension
    Translate {
        input: PathBuf,
        output: PathBuf,
        /// Translator settings (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Update an OSM file to the current version
    Update {
        path: PathBuf,
        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage a project database
    #[command(subcommand)]
    Project(ProjectCommands),
    /// Inspect EnergyPlus SQL output
    #[command(subcommand)]
    Sql(SqlCommands),
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a project database, or migrate an existing one
    Init { db: PathBuf },
    /// Add an analysis to a project
    AddAnalysis {
        db: PathBuf,
        name: String,
        /// Seed model for the analysis
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// List the analyses in a project
    List { db: PathBuf },
}

#[derive(Subcommand)]
enum SqlCommands {
    /// Print the EnergyPlus version, environments and energy totals
    Summary { path: PathBuf },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path, strictness } => cmd_validate(&path, &strictness),
        Commands::Summary { path } => cmd_summary(&path),
        Commands::Translate {
            input,
            output,
            config,
        } => cmd_translate(&input, &output, config.as_deref()),
        Commands::Update { path, output } => cmd_update(&path, output.as_deref()),
        Commands::Project(project_cmd) => match project_cmd {
            ProjectCommands::Init { db } => cmd_project_init(&db),
            ProjectCommands::AddAnalysis { db, name, seed } => {
                cmd_project_add_analysis(&db, &name, seed.as_deref())
            }
            ProjectCommands::List { db } => cmd_project_list(&db),
        },
        Commands::Sql(SqlCommands::Summary { path }) => cmd_sql_summary(&path),
    }
}

fn load_config(path: Option<&Path>) -> AppResult<TranslatorConfig> {
    match path {
        Some(path) => os_app::load_config(path),
        None => Ok(TranslatorConfig::default()),
    }
}

fn print_messages(messages: &[LogMessage]) {
    for message in messages {
        println!("  {message}");
    }
}

fn cmd_validate(path: &Path, strictness: &str) -> AppResult<()> {
    let level: StrictnessLevel = strictness.parse().map_err(AppError::Config)?;
    println!("Validating model: {}", path.display());
    let loaded = model_service::load_model(path, &TranslatorConfig::default())?;
    print_messages(&loaded.messages);
    let report = model_service::validate_model(&loaded.model, level);
    if report.is_valid() {
        println!("✓ Model is valid at {} strictness", level.as_str());
        Ok(())
    } else {
        print!("{report}");
        Err(AppError::Invalid {
            level: level.as_str(),
            count: report.errors.len(),
        })
    }
}

fn cmd_summary(path: &Path) -> AppResult<()> {
    let loaded = model_service::load_model(path, &TranslatorConfig::default())?;
    let summary = model_service::summarize_model(&loaded.model);
    println!("{} ({} format, version {})", path.display(), loaded.format.as_str(), summary.version);
    if let Some(from) = &loaded.updated_from {
        println!("  Updated from version {from}");
    }
    println!("  Objects: {}", summary.object_count);
    println!("  Stories: {}", summary.stories);
    println!("  Thermal zones: {}", summary.thermal_zones);
    println!("  Spaces: {}", summary.spaces);
    println!("  Surfaces: {} ({} sub-surfaces)", summary.surfaces, summary.sub_surfaces);
    println!("  Floor area: {:.2} m²", summary.floor_area_m2);
    println!("  Object types:");
    for (type_name, count) in &summary.object_counts {
        println!("    {type_name}: {count}");
    }
    Ok(())
}

fn cmd_translate(input: &Path, output: &Path, config: Option<&Path>) -> AppResult<()> {
    let config = load_config(config)?;
    println!("Translating {} -> {}", input.display(), output.display());
    let report = model_service::translate(input, output, &config)?;
    print_messages(&report.messages);
    println!(
        "✓ Wrote {} ({} warning(s), {} error(s))",
        report.output_format.as_str(),
        report.warnings,
        report.errors
    );
    Ok(())
}

fn cmd_update(path: &Path, output: Option<&Path>) -> AppResult<()> {
    let report = model_service::update_model(path, output, &TranslatorConfig::default())?;
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    if report.applied_updates.is_empty() {
        println!("✓ Already at version {}", report.version);
    } else {
        println!(
            "✓ Updated from {} to {} via {}",
            report.original_version.as_deref().unwrap_or("unknown"),
            report.version,
            report.applied_updates.join(", ")
        );
    }
    println!(
        "  Deprecated: {}, refactored: {}, untranslated: {}",
        report.deprecated_objects, report.refactored_objects, report.untranslated_objects
    );
    Ok(())
}

fn cmd_project_init(db: &Path) -> AppResult<()> {
    let record = project_service::init_project(db)?;
    println!("✓ Project '{}' ready at {}", record.base.name, db.display());
    Ok(())
}

fn cmd_project_add_analysis(db: &Path, name: &str, seed: Option<&Path>) -> AppResult<()> {
    let analysis = project_service::add_analysis(db, name, seed)?;
    println!("✓ Added analysis '{}' (id {})", analysis.base.name, analysis.base.id);
    Ok(())
}

fn cmd_project_list(db: &Path) -> AppResult<()> {
    let listing = project_service::list_project(db)?;
    if listing.analyses.is_empty() {
        println!("No analyses in project '{}'", listing.project.base.name);
        return Ok(());
    }
    println!("Analyses in project '{}':", listing.project.base.name);
    for a in listing.analyses {
        println!(
            "  {} - {} ({} data points, {} complete, {} failed{})",
            a.id,
            a.name,
            a.data_points,
            a.complete,
            a.failed,
            if a.results_are_invalid { ", results invalid" } else { "" }
        );
        if let Some(seed) = a.seed {
            println!("      seed: {seed}");
        }
    }
    Ok(())
}

fn cmd_sql_summary(path: &Path) -> AppResult<()> {
    let summary = os_app::sql_summary(path)?;
    let text = os_app::to_yaml(&summary)?;
    print!("{text}");
    Ok(())
}
