use crate::model::{
    AuditOutput, AuditReport, AuthorStats, ChangeKind, ChangeRecord, FolderStats, SCHEMA_VERSION,
};
use crate::util::csv_row;
use chrono::Utc;
use console::style;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

const RECENT_LIMIT: usize = 10;

/// Aggregate canonicalized records into the audit report. Pure: the
/// input slice is not modified and no output is produced here.
pub fn build_report(records: &[ChangeRecord]) -> AuditReport {
    let mut authors: HashMap<&str, AuthorStats> = HashMap::new();
    let mut commits_by_author: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut folders: HashMap<&str, usize> = HashMap::new();
    let (mut added, mut modified, mut deleted) = (0usize, 0usize, 0usize);

    for record in records {
        let entry = authors
            .entry(&record.author)
            .or_insert_with(|| AuthorStats {
                author: record.author.clone(),
                records: 0,
                commits: 0,
                added: 0,
                modified: 0,
                deleted: 0,
            });
        entry.records += 1;
        match record.kind {
            ChangeKind::Added => {
                entry.added += 1;
                added += 1;
            }
            ChangeKind::Modified => {
                entry.modified += 1;
                modified += 1;
            }
            ChangeKind::Deleted => {
                entry.deleted += 1;
                deleted += 1;
            }
        }
        commits_by_author
            .entry(&record.author)
            .or_default()
            .insert(&record.commit_id);
        *folders.entry(&record.folder).or_insert(0) += 1;
    }

    let mut by_author: Vec<AuthorStats> = authors
        .into_iter()
        .map(|(name, mut stats)| {
            stats.commits = commits_by_author.get(name).map_or(0, HashSet::len);
            stats
        })
        .collect();
    by_author.sort_by(|a, b| b.records.cmp(&a.records).then_with(|| a.author.cmp(&b.author)));

    let mut by_folder: Vec<FolderStats> = folders
        .into_iter()
        .map(|(folder, records)| FolderStats {
            folder: folder.to_string(),
            records,
        })
        .collect();
    by_folder.sort_by(|a, b| b.records.cmp(&a.records).then_with(|| a.folder.cmp(&b.folder)));

    // Day-level ordering; the stable sort keeps collection order among
    // records from the same day.
    let mut recent: Vec<ChangeRecord> = records.to_vec();
    recent.sort_by(|a, b| b.timestamp.date_naive().cmp(&a.timestamp.date_naive()));
    recent.truncate(RECENT_LIMIT);

    AuditReport {
        total_records: records.len(),
        author_count: by_author.len(),
        added,
        modified,
        deleted,
        by_author,
        by_folder,
        recent,
    }
}

pub fn output_console(report: &AuditReport, skipped_folders: &[String]) {
    println!("{}", style("Schema change audit").bold());
    println!("{}", "─".repeat(72));
    println!(
        "Records: {}   Authors: {}   Added: {}   Modified: {}   Deleted: {}",
        style(report.total_records).cyan(),
        style(report.author_count).cyan(),
        style(report.added).green(),
        style(report.modified).yellow(),
        style(report.deleted).red(),
    );

    if report.total_records == 0 {
        println!("\nNo changes recorded under the requested folders.");
        return;
    }

    println!("\n{}", style("By author").bold());
    println!(
        "{:<32} {:>8} {:>8} {:>8} {:>9} {:>8}",
        style("Author").bold(),
        style("Records").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Modified").bold(),
        style("Deleted").bold()
    );
    for stats in &report.by_author {
        println!(
            "{:<32} {:>8} {:>8} {:>8} {:>9} {:>8}",
            stats.author, stats.records, stats.commits, stats.added, stats.modified, stats.deleted
        );
    }

    println!("\n{}", style("By folder").bold());
    for stats in &report.by_folder {
        println!("{:<32} {:>8}", stats.folder, stats.records);
    }

    println!("\n{}", style("Most recent changes").bold());
    for record in &report.recent {
        println!(
            "{} {:<9} {:<24} {}",
            style(record.timestamp.format("%Y-%m-%d")).dim(),
            record.kind.to_string(),
            record.author,
            record.path
        );
    }

    if !skipped_folders.is_empty() {
        println!(
            "\n{} skipped missing folders: {}",
            style("note:").yellow(),
            skipped_folders.join(", ")
        );
    }
}

pub fn output_json(
    report: &AuditReport,
    records: &[ChangeRecord],
    repository_path: &Path,
    folders: &[String],
    skipped_folders: &[String],
) -> crate::error::Result<()> {
    let output = AuditOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string_lossy().to_string(),
        folders: folders.to_vec(),
        skipped_folders: skipped_folders.to_vec(),
        report: report.clone(),
        records: records.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Serialize every record as delimited text, one row per record in
/// collection order.
pub fn write_csv<W: Write>(records: &[ChangeRecord], mut writer: W) -> std::io::Result<()> {
    writeln!(
        writer,
        "Folder,Author,Email,Date,ChangeType,File,Commit,Message"
    )?;
    for record in records {
        let date = record.timestamp.format("%Y-%m-%d").to_string();
        let kind = record.kind.to_string();
        writeln!(
            writer,
            "{}",
            csv_row(&[
                &record.folder,
                &record.author,
                &record.email,
                &date,
                &kind,
                &record.path,
                &record.commit_id,
                &record.message,
            ])
        )?;
    }
    Ok(())
}
