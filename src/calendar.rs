// File: ./src/calendar.rs
//! Calendar Aggregator.
//!
//! Walks the customer tree and the remote-day tree and builds a date-keyed
//! index. Nothing is cached: every call rescans the tree, which is fine for
//! the tens to low hundreds of folders a single team keeps.
use crate::model::span::{DateSpan, format_iso_date, parse_iso_date};
use crate::model::{DeploymentStatus, RECORD_FILE, SCHEDULE_FILE, Vocabulary};
use crate::storage::list_dirs;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    Completed,
    /// Pre-check done, work not finished.
    Ready,
    /// Pre-check still open.
    New,
}

impl DeploymentState {
    pub fn from_status(status: &DeploymentStatus) -> Self {
        if status.completed {
            DeploymentState::Completed
        } else if status.pre_check_done {
            DeploymentState::Ready
        } else {
            DeploymentState::New
        }
    }

    /// Single-letter code used in the month grid.
    pub fn code(self) -> char {
        match self {
            DeploymentState::Completed => 'C',
            DeploymentState::Ready => 'R',
            DeploymentState::New => 'N',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOccurrence {
    pub customer: String,
    pub folder: String,
    pub record_path: PathBuf,
    pub status: DeploymentStatus,
    pub state: DeploymentState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteDayLocation {
    Active,
    Archived,
}

/// A remote-day folder found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDayFolder {
    pub date: NaiveDate,
    pub location: RemoteDayLocation,
    pub path: PathBuf,
}

impl RemoteDayFolder {
    pub fn name(&self) -> String {
        format_iso_date(self.date)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.path.join(SCHEDULE_FILE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub deployments: Vec<DeploymentOccurrence>,
    pub remote_day: Option<RemoteDayLocation>,
}

/// A deployment folder that looked like a date range but could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFolder {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarIndex {
    pub days: BTreeMap<NaiveDate, CalendarDay>,
    pub skipped: Vec<SkippedFolder>,
}

impl CalendarIndex {
    pub fn get(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.get(&date)
    }

    /// Lookup by ISO date string. Malformed strings find nothing.
    pub fn day(&self, iso: &str) -> Option<&CalendarDay> {
        parse_iso_date(iso).and_then(|date| self.get(date))
    }

    /// Deployments occupying `iso`, empty when there are none.
    pub fn deployments_on(&self, iso: &str) -> &[DeploymentOccurrence] {
        self.day(iso).map(|d| d.deployments.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn entry(&mut self, date: NaiveDate) -> &mut CalendarDay {
        self.days.entry(date).or_default()
    }

    fn mark_remote_day(&mut self, date: NaiveDate, location: RemoteDayLocation) {
        let day = self.entry(date);
        // Active wins over Archived.
        day.remote_day = Some(match day.remote_day {
            Some(existing) => existing.min(location),
            None => location,
        });
    }
}

/// Date-named remote-day folders, active ones first, each group sorted.
pub fn remote_day_folders(base: &Path, vocab: &Vocabulary) -> Vec<RemoteDayFolder> {
    let archive_dir = base.join(vocab.archive_folder);
    let mut folders = Vec::new();
    for (dir, location) in [
        (base.to_path_buf(), RemoteDayLocation::Active),
        (archive_dir, RemoteDayLocation::Archived),
    ] {
        for name in list_dirs(&dir) {
            if let Some(date) = parse_iso_date(&name) {
                folders.push(RemoteDayFolder {
                    date,
                    location,
                    path: dir.join(&name),
                });
            }
        }
    }
    folders
}

/// Builds the index from every customer's deployments and every remote day.
///
/// Either base may be `None` when it is not configured; that tree is then
/// left out.
pub fn build_index(
    customer_base: Option<&Path>,
    remote_base: Option<&Path>,
    vocab: &Vocabulary,
) -> CalendarIndex {
    let mut index = CalendarIndex::default();

    if let Some(base) = customer_base {
        for customer in list_dirs(base) {
            let deployments_dir = base.join(&customer).join(vocab.deployments_folder);
            for folder in list_dirs(&deployments_dir) {
                let folder_path = deployments_dir.join(&folder);
                let span = match DateSpan::from_folder_name(&folder) {
                    None => continue,
                    Some(Err(e)) => {
                        log::warn!("Skipping deployment {}: {}", folder_path.display(), e);
                        index.skipped.push(SkippedFolder {
                            path: folder_path,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                    Some(Ok(span)) => span,
                };

                let record_path = folder_path.join(RECORD_FILE);
                let status = DeploymentStatus::read(&record_path, vocab);
                let state = DeploymentState::from_status(&status);
                for date in span.occupied_days() {
                    index.entry(date).deployments.push(DeploymentOccurrence {
                        customer: customer.clone(),
                        folder: folder.clone(),
                        record_path: record_path.clone(),
                        status: status.clone(),
                        state,
                    });
                }
            }
        }
    }

    if let Some(base) = remote_base {
        for folder in remote_day_folders(base, vocab) {
            index.mark_remote_day(folder.date, folder.location);
        }
    }

    log::debug!(
        "Calendar index: {} days, {} skipped folders",
        index.days.len(),
        index.skipped.len()
    );
    index
}
