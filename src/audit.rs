use crate::git::GitRepo;
use crate::identity::{CanonicalMap, HeuristicMatcher};
use crate::report;
use anyhow::Context;
use console::style;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Run the audit pipeline: collect history for the monitored folders,
/// canonicalize authors, then render or export the report.
pub fn exec(
    repo_path: Option<PathBuf>,
    folders: Vec<String>,
    csv: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let repo = GitRepo::open(repo_path.as_ref()).context("Not inside a git work tree")?;

    let mut existing = Vec::new();
    let mut skipped = Vec::new();
    for folder in folders.iter() {
        if repo.folder_exists(folder) {
            existing.push(folder.clone());
        } else {
            eprintln!(
                "{} folder '{}' not found in work tree, skipping",
                style("warning:").yellow().bold(),
                folder
            );
            skipped.push(folder.clone());
        }
    }

    let mut records = repo
        .collect_history(&existing)
        .context("Failed to collect history from repository")?;

    let matcher = HeuristicMatcher;
    let map = CanonicalMap::build(records.iter().map(|r| r.author.as_str()), &matcher);
    map.apply(&mut records);

    let audit_report = report::build_report(&records);

    if let Some(path) = csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create export file {}", path.display()))?;
        report::write_csv(&records, BufWriter::new(file))
            .with_context(|| format!("Failed to write export file {}", path.display()))?;
        println!(
            "Wrote {} records to {}",
            style(records.len()).cyan(),
            path.display()
        );
    } else if json {
        report::output_json(&audit_report, &records, repo.path(), &folders, &skipped)?;
    } else {
        report::output_console(&audit_report, &skipped);
    }

    Ok(())
}
