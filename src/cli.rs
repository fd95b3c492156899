use crate::sync::{SyncOptions, DEFAULT_ENGINE};
use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "migkit")]
#[command(about = "Audit and sync toolkit for SQL Server migration-script repositories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Attribute script-folder changes to authors across git history
    Audit {
        #[arg(long, help = "Path to git repository")]
        repo: Option<PathBuf>,

        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = ["Scripts".to_string(), "migrations".to_string(), "Quests".to_string()],
            help = "Comma-separated folders to audit"
        )]
        folders: Vec<String>,

        #[arg(long, value_name = "PATH", conflicts_with = "json", help = "Write records as delimited text to PATH")]
        csv: Option<PathBuf>,

        #[arg(long, help = "Output the report as JSON")]
        json: bool,
    },
    /// Sync detected schema changes into the model and migration scripts
    Sync {
        #[arg(
            long,
            value_delimiter = ',',
            conflicts_with = "all",
            required_unless_present = "all",
            help = "Comma-separated Schema.ObjectName list to sync"
        )]
        objects: Vec<String>,

        #[arg(long, help = "Sync every detected change")]
        all: bool,

        #[arg(long, help = "Description for the generated script (synthesized when omitted)")]
        description: Option<String>,

        #[arg(long, help = "Update the model but skip script generation")]
        skip_generate: bool,

        #[arg(long, help = "Preview only; make no model or migration changes")]
        dry_run: bool,

        #[arg(long, default_value = DEFAULT_ENGINE, help = "Schema engine executable")]
        engine: String,

        #[arg(long, default_value = "SchemaModel", help = "Schema-model folder")]
        model_dir: PathBuf,

        #[arg(long, default_value = "migrations", help = "Target folder for generated scripts")]
        migrations_dir: PathBuf,

        #[arg(long, help = "Path to git repository")]
        repo: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse arguments; usage errors exit with code 1 rather than
    /// clap's default 2, while help and version still exit 0.
    pub fn parse() -> Self {
        match <Self as Parser>::try_parse() {
            Ok(cli) => cli,
            Err(err) => {
                let code = match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                    _ => 1,
                };
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Audit {
                repo,
                folders,
                csv,
                json,
            } => crate::audit::exec(repo, folders, csv, json),
            Commands::Sync {
                objects,
                all,
                description,
                skip_generate,
                dry_run,
                engine,
                model_dir,
                migrations_dir,
                repo,
            } => crate::sync::exec(SyncOptions {
                objects,
                all,
                description,
                skip_generate,
                dry_run,
                engine,
                model_dir,
                migrations_dir,
                repo,
            }),
        }
    }
}
