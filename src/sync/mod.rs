//! Change-set sync: compare the schema model against the development
//! database, pick the requested objects out of the diff, update the
//! model, and generate a versioned migration script.

mod engine;
pub mod table;

pub use engine::{Engine, DEFAULT_ENGINE};

use crate::error::MigkitError;
use crate::git::GitRepo;
use crate::model::DiffChange;
use crate::util::underscore_token;
use anyhow::Context;
use console::style;
use std::collections::HashSet;
use std::path::PathBuf;

pub struct SyncOptions {
    pub objects: Vec<String>,
    pub all: bool,
    pub description: Option<String>,
    pub skip_generate: bool,
    pub dry_run: bool,
    pub engine: String,
    pub model_dir: PathBuf,
    pub migrations_dir: PathBuf,
    pub repo: Option<PathBuf>,
}

pub fn exec(opts: SyncOptions) -> anyhow::Result<()> {
    // Validate the requested names before touching the engine.
    let targets = if opts.all {
        Vec::new()
    } else {
        parse_object_names(&opts.objects)?
    };

    let engine = Engine::new(&opts.engine, &opts.model_dir);

    let diff_output = engine.diff().context("Schema diff failed")?;
    let entries = table::parse_diff_table(&diff_output);

    let selected = if opts.all {
        if entries.is_empty() {
            println!("No differences found; nothing to sync.");
            return Ok(());
        }
        entries
    } else {
        let (selected, unmatched) = select_changes(&entries, &targets);
        for name in &unmatched {
            eprintln!(
                "{} no detected change matches '{}'",
                style("warning:").yellow().bold(),
                name
            );
        }
        if selected.is_empty() {
            return Err(MigkitError::NoMatchingObjects.into());
        }
        selected
    };

    println!("{}", style("Selected changes").bold());
    for change in &selected {
        println!(
            "  {:<4} {:<7} {:<12} {}",
            change.id,
            change.kind.to_string(),
            change.object_type,
            change.qualified_name()
        );
    }

    let change_ids = selected
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(",");

    if opts.dry_run {
        let preview = engine
            .diff_text(&change_ids)
            .context("Textual diff preview failed")?;
        println!("\n{}", style("Textual diff preview").bold());
        println!("{}", preview.trim_end());

        if !opts.skip_generate {
            let description = resolve_description(&opts, &selected)?;
            if let Err(err) = preview_generation(&engine, &change_ids, &description) {
                eprintln!(
                    "{} script generation preview failed: {err:#}",
                    style("warning:").yellow().bold()
                );
            }
        }

        println!("\nDry run: no model or migration changes were made.");
        return Ok(());
    }

    let model_output = engine
        .apply_model(&change_ids)
        .context("Model update failed")?;
    if !model_output.trim().is_empty() {
        println!("{}", model_output.trim_end());
    }

    let rediff_output = engine.diff().context("Re-diff after model update failed")?;
    let remaining = table::parse_diff_table(&rediff_output);
    if remaining.is_empty() {
        println!("Schema model is now in sync.");
    } else {
        println!(
            "{} difference(s) remain after the model update.",
            remaining.len()
        );
    }

    if !opts.skip_generate {
        let description = resolve_description(&opts, &selected)?;
        let generate_output = engine
            .generate(&change_ids, &opts.migrations_dir, &description)
            .context("Script generation failed")?;
        if !generate_output.trim().is_empty() {
            println!("{}", generate_output.trim_end());
        }
        println!(
            "Generated migration script in {}",
            opts.migrations_dir.display()
        );
    }

    Ok(())
}

/// Generate into a scratch directory and show what the script would
/// contain. The directory is removed when this returns, on success or
/// failure.
fn preview_generation(engine: &Engine, change_ids: &str, description: &str) -> anyhow::Result<()> {
    let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
    engine.generate(change_ids, scratch.path(), description)?;

    println!("\n{}", style("Generated script preview").bold());
    let mut found = false;
    for entry in std::fs::read_dir(scratch.path())? {
        let entry = entry?;
        let content = std::fs::read_to_string(entry.path()).unwrap_or_default();
        println!("--- {}", entry.file_name().to_string_lossy());
        println!("{}", content.trim_end());
        found = true;
    }
    if !found {
        println!("(engine produced no script files)");
    }
    Ok(())
}

fn resolve_description(opts: &SyncOptions, selected: &[DiffChange]) -> anyhow::Result<String> {
    if let Some(description) = &opts.description {
        return Ok(description.clone());
    }
    let repo = GitRepo::open(opts.repo.as_ref())
        .context("Cannot synthesize a description outside a git work tree; pass --description")?;
    let branch = repo.branch_name().unwrap_or_else(|| "detached".to_string());
    let user = repo.user_name().unwrap_or_else(|| "unknown".to_string());
    Ok(build_description(&branch, &user, selected))
}

fn build_description(branch: &str, user: &str, selected: &[DiffChange]) -> String {
    let fragments = selected
        .iter()
        .map(|c| format!("{}_{}_{}", c.kind, c.schema, c.name))
        .collect::<Vec<_>>()
        .join("_");
    underscore_token(&format!("{branch}_{fragments}_{user}"))
}

fn parse_object_names(objects: &[String]) -> Result<Vec<(String, String)>, MigkitError> {
    objects
        .iter()
        .map(|raw| {
            let trimmed = raw.trim();
            match trimmed.split_once('.') {
                Some((schema, name))
                    if !schema.is_empty() && !name.is_empty() && !name.contains('.') =>
                {
                    Ok((schema.to_string(), name.to_string()))
                }
                _ => Err(MigkitError::InvalidObjectName(raw.clone())),
            }
        })
        .collect()
}

/// Pick the entries whose schema and name exactly match a requested
/// object. Unmatched requests are returned for warning; duplicates
/// (two requests hitting the same entry) are selected once.
fn select_changes(
    entries: &[DiffChange],
    targets: &[(String, String)],
) -> (Vec<DiffChange>, Vec<String>) {
    let mut selected = Vec::new();
    let mut selected_ids: HashSet<&str> = HashSet::new();
    let mut unmatched = Vec::new();

    for (schema, name) in targets {
        let mut hit = false;
        for entry in entries {
            if entry.schema == *schema && entry.name == *name {
                hit = true;
                if selected_ids.insert(entry.id.as_str()) {
                    selected.push(entry.clone());
                }
            }
        }
        if !hit {
            unmatched.push(format!("{schema}.{name}"));
        }
    }

    (selected, unmatched)
}
