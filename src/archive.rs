// File: ./src/archive.rs
//! Moves stale remote-day folders into the archive subtree.
use crate::error::{IoContext, PlannerResult};
use crate::model::Vocabulary;
use crate::model::span::parse_iso_date;
use crate::storage::list_dirs;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Outcome of one archive pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    /// Folder names moved into the archive.
    pub moved: Vec<String>,
    /// Folders that were due but could not be moved, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl ArchiveSummary {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.skipped.is_empty()
    }
}

/// Whether a remote day dated `date` is older than the retention threshold.
pub fn is_stale(date: NaiveDate, today: NaiveDate, threshold_days: u32) -> bool {
    (today - date).num_days() > i64::from(threshold_days)
}

/// Archives every date-named folder directly under `base` that is older than
/// `threshold_days`. Re-running finds nothing left to move.
///
/// The archive folder is created on demand. An existing folder of the same
/// name inside the archive is never overwritten.
pub fn archive_remote_days(
    base: &Path,
    today: NaiveDate,
    threshold_days: u32,
    vocab: &Vocabulary,
) -> PlannerResult<ArchiveSummary> {
    let archive_dir = base.join(vocab.archive_folder);
    let mut summary = ArchiveSummary::default();

    let due: Vec<String> = list_dirs(base)
        .into_iter()
        .filter(|name| {
            parse_iso_date(name).is_some_and(|date| is_stale(date, today, threshold_days))
        })
        .collect();

    if due.is_empty() {
        log::debug!("Nothing to archive under {}", base.display());
        return Ok(summary);
    }

    fs::create_dir_all(&archive_dir).at(&archive_dir)?;

    for name in due {
        let target = archive_dir.join(&name);
        if target.exists() {
            log::warn!(
                "Not archiving {}: {} already exists",
                name,
                target.display()
            );
            summary
                .skipped
                .push((name, "already present in archive".to_string()));
            continue;
        }
        let source = base.join(&name);
        fs::rename(&source, &target).at(&source)?;
        log::info!("Archived remote day {}", name);
        summary.moved.push(name);
    }

    Ok(summary)
}
