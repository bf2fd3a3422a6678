// File: ./src/model/record.rs
//! Deployment record document (`Einsatz.md`).
//!
//! Reading goes through `RecordDocument::parse`, which pulls the known markers
//! out of the Markdown into a typed value; `DeploymentStatus` is derived from
//! it. Writing goes through `RecordFields::apply`, which fills the template's
//! labels and placeholders.
use crate::error::{IoContext, PlannerResult};
use crate::model::markers::{Checkbox, Vocabulary, parse_checkbox, parse_heading};
use crate::storage::LocalStorage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Markers found in a record document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDocument {
    pub completed: bool,
    pub title: Option<String>,
    /// `None` when the document has no pre-check section.
    pub pre_check: Option<Vec<Checkbox>>,
}

impl RecordDocument {
    pub fn parse(content: &str, vocab: &Vocabulary) -> Self {
        Self {
            completed: has_completed_marker(content, vocab),
            title: extract_title(content, vocab),
            pre_check: extract_pre_check(content, vocab),
        }
    }

    /// Pre-check is satisfied when completed, absent, empty, or fully checked.
    pub fn pre_check_done(&self) -> bool {
        if self.completed {
            return true;
        }
        match &self.pre_check {
            None => true,
            Some(items) => items.iter().all(|c| *c == Checkbox::Checked),
        }
    }
}

/// Derived state of a deployment as shown on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub completed: bool,
    pub pre_check_done: bool,
    pub title: String,
}

impl DeploymentStatus {
    pub fn parse(content: &str, vocab: &Vocabulary) -> Self {
        let doc = RecordDocument::parse(content, vocab);
        Self {
            completed: doc.completed,
            pre_check_done: doc.pre_check_done(),
            title: doc
                .title
                .clone()
                .unwrap_or_else(|| vocab.unknown_title.to_string()),
        }
    }

    /// Status used when the record document cannot be read.
    pub fn unreadable(vocab: &Vocabulary) -> Self {
        Self {
            completed: false,
            pre_check_done: false,
            title: vocab.unknown_title.to_string(),
        }
    }

    /// Reads and parses a record document. Never fails; unreadable files
    /// produce `unreadable()` and a warning.
    pub fn read(path: &Path, vocab: &Vocabulary) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, vocab),
            Err(e) => {
                log::warn!("Could not read record {}: {}", path.display(), e);
                Self::unreadable(vocab)
            }
        }
    }
}

/// The completed marker, also with `[X]` as the tick like checklist items.
fn has_completed_marker(content: &str, vocab: &Vocabulary) -> bool {
    content.contains(vocab.completed_marker)
        || content.contains(&vocab.completed_marker.replacen("[x]", "[X]", 1))
}

fn extract_title(content: &str, vocab: &Vocabulary) -> Option<String> {
    let heading_at = content.find(vocab.summary_heading)?;
    let after_heading = &content[heading_at + vocab.summary_heading.len()..];
    let sub_at = after_heading.find(vocab.summary_subheading)?;
    let rest = after_heading[sub_at + vocab.summary_subheading.len()..]
        .trim_start_matches('#')
        .trim_start();
    let line = rest.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

fn extract_pre_check(content: &str, vocab: &Vocabulary) -> Option<Vec<Checkbox>> {
    let target = parse_heading(vocab.pre_check_heading)?;
    let mut lines = content.lines();

    lines.find(|line| {
        parse_heading(line)
            .is_some_and(|h| h.level == target.level && h.text.starts_with(target.text))
    })?;

    let items = lines
        .take_while(|line| parse_heading(line).is_none_or(|h| h.level > target.level))
        .filter_map(parse_checkbox)
        .collect();
    Some(items)
}

/// Values written into a freshly instantiated record document.
///
/// Labels (`customer`, `date`) fill the slot after the first occurrence of the
/// label when that slot is still empty. A slot ends at the end of its line or
/// at the other label when both share a line. Placeholders (`title`, `checklist`) replace
/// their first occurrence. Only the first occurrence of any marker is ever
/// considered.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFields<'a> {
    pub customer: Option<&'a str>,
    pub date: Option<&'a str>,
    pub title: Option<&'a str>,
    pub checklist: Option<&'a str>,
}

impl<'a> RecordFields<'a> {
    pub fn apply(&self, content: &str, vocab: &Vocabulary) -> String {
        let mut out = content.to_string();
        let labels = [vocab.customer_label, vocab.date_label];
        if let Some(customer) = self.customer {
            out = fill_label(&out, vocab.customer_label, customer, &labels);
        }
        if let Some(date) = self.date {
            out = fill_label(&out, vocab.date_label, date, &labels);
        }
        if let Some(title) = self.title {
            out = out.replacen(vocab.title_placeholder, title, 1);
        }
        if let Some(checklist) = self.checklist {
            out = out.replacen(vocab.checklist_placeholder, checklist, 1);
        }
        out
    }

    /// Reads `source`, applies the fields and writes the result to `dest`
    /// (which may be the same file).
    pub fn write_file(&self, source: &Path, dest: &Path, vocab: &Vocabulary) -> PlannerResult<()> {
        let content = fs::read_to_string(source).at(source)?;
        let updated = self.apply(&content, vocab);
        LocalStorage::atomic_write(dest, updated)
    }

    pub fn update_in_place(&self, path: &Path, vocab: &Vocabulary) -> PlannerResult<()> {
        self.write_file(path, path, vocab)
    }
}

/// Fills the slot after the first `label`. The slot runs to the end of the
/// line, or up to the next of `stops` when another label shares the line.
fn fill_label(content: &str, label: &str, value: &str, stops: &[&str]) -> String {
    let Some(at) = content.find(label) else {
        return content.to_string();
    };
    let slot_start = at + label.len();
    let rest = &content[slot_start..];
    let line_len = rest.find(['\n', '\r']).unwrap_or(rest.len());
    let stop_at = stops
        .iter()
        .filter(|stop| **stop != label)
        .filter_map(|stop| rest[..line_len].find(stop))
        .min();
    let slot_len = stop_at.unwrap_or(line_len);
    let slot = &rest[..slot_len];
    if !slot.trim().is_empty() || value.is_empty() {
        return content.to_string();
    }
    let separator = if stop_at.is_some() { " " } else { "" };
    format!(
        "{}{} {}{}{}",
        &content[..at],
        label,
        value,
        separator,
        &rest[slot_len..]
    )
}
