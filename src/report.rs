// File: ./src/report.rs
//! Outstanding-task report across active and archived remote days.
use crate::calendar::{RemoteDayLocation, remote_day_folders};
use crate::error::PlannerResult;
use crate::model::{SCHEDULE_FILE, Vocabulary};
use crate::model::schedule::extract_in_progress;
use crate::storage::LocalStorage;
use std::fs;
use std::path::{Path, PathBuf};

/// Open tasks of one remote day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingDay {
    pub name: String,
    pub location: RemoteDayLocation,
    pub tasks: Vec<String>,
}

impl OutstandingDay {
    /// Wiki-link target of the day's schedule, relative to the remote-day base.
    fn link_target(&self, vocab: &Vocabulary) -> String {
        let stem = SCHEDULE_FILE.trim_end_matches(".md");
        match self.location {
            RemoteDayLocation::Active => format!("{}/{}", self.name, stem),
            RemoteDayLocation::Archived => {
                format!("{}/{}/{}", vocab.archive_folder, self.name, stem)
            }
        }
    }
}

/// Scans every remote day and keeps those with at least one open task.
/// Schedules that cannot be read are skipped with a warning.
pub fn collect_outstanding(remote_base: &Path, vocab: &Vocabulary) -> Vec<OutstandingDay> {
    remote_day_folders(remote_base, vocab)
        .into_iter()
        .filter_map(|folder| {
            let schedule = folder.schedule_path();
            let content = match fs::read_to_string(&schedule) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Skipping schedule {}: {}", schedule.display(), e);
                    return None;
                }
            };
            let tasks = extract_in_progress(&content, vocab);
            if tasks.is_empty() {
                return None;
            }
            Some(OutstandingDay {
                name: folder.name(),
                location: folder.location,
                tasks,
            })
        })
        .collect()
}

pub fn render_report(days: &[OutstandingDay], vocab: &Vocabulary) -> String {
    let mut out = String::from("\n");
    for day in days {
        out.push_str(&format!("## [[{}|{}]]\n\n", day.link_target(vocab), day.name));
        for task in &day.tasks {
            out.push_str(task);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Writes the report into the remote-day base and returns its path.
pub fn write_report(remote_base: &Path, vocab: &Vocabulary) -> PlannerResult<(PathBuf, usize)> {
    let days = collect_outstanding(remote_base, vocab);
    let task_count = days.iter().map(|d| d.tasks.len()).sum();
    let path = remote_base.join(vocab.report_file);
    LocalStorage::atomic_write(&path, render_report(&days, vocab))?;
    log::info!(
        "Wrote report with {} open tasks to {}",
        task_count,
        path.display()
    );
    Ok((path, task_count))
}
