use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mbzgen::generator::archive::ArchiveSummary;
use mbzgen::{BackupFileGenerator, DslDocument, ExportOptions, LearningWorld, OsFs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Export learning worlds as Moodle course backups (.mbz)", long_about = None)]
struct Cli {
    /// JSON file with export options; missing keys keep their defaults
    #[arg(long, global = true, value_name = "OPTIONS_JSON")]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a world as a .mbz backup
    Export {
        #[arg(value_name = "WORLD_JSON")]
        world: Utf8PathBuf,
        /// Destination archive, replaced when it exists
        #[arg(short, long, value_name = "OUT_MBZ")]
        output: Utf8PathBuf,
        /// Parent directory of the temporary staging tree
        #[arg(long, env = "MBZGEN_STAGING_DIR")]
        staging_dir: Option<Utf8PathBuf>,
        /// Also write DSL_Document.json next to the archive
        #[arg(long)]
        write_dsl: bool,
    },
    /// Print the DSL document derived from a world
    Dsl {
        #[arg(value_name = "WORLD_JSON")]
        world: Utf8PathBuf,
    },
    /// Print what an existing backup contains
    Inspect {
        #[arg(value_name = "MBZ_FILE")]
        archive: Utf8PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mbzgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut options = match &cli.config {
        Some(path) => ExportOptions::from_json_file(path)?,
        None => ExportOptions::default(),
    };

    match cli.command {
        Command::Export {
            world,
            output,
            staging_dir,
            write_dsl,
        } => {
            if let Some(dir) = staging_dir {
                options = options.with_staging_parent(dir);
            }
            options.write_dsl_document |= write_dsl;
            let world = LearningWorld::load_json(&world)?;
            let mut generator = BackupFileGenerator::new(OsFs, options);
            let path = generator
                .export(&world, &output)
                .with_context(|| format!("Failed to export '{}'", world.name))?;
            println!("{}", path);
        }
        Command::Dsl { world } => {
            let world = LearningWorld::load_json(&world)?;
            let doc = DslDocument::from_world(&world)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Inspect { archive } => {
            let summary = ArchiveSummary::from_file(&archive)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
