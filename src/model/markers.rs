// File: ./src/model/markers.rs
//! Literal markers recognised inside record and schedule documents.
//!
//! Templates are plain Markdown maintained by hand, so every label, heading
//! and folder name the planner looks for is collected here. Two presets exist
//! because the same tree layout is used with English and German templates.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// File name of a deployment's record document.
pub const RECORD_FILE: &str = "Einsatz.md";
/// File name of a remote day's schedule document.
pub const SCHEDULE_FILE: &str = "Zeitplan.md";
/// File name of a task's record document.
pub const TASK_FILE: &str = "Auftrag.md";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VocabularyPreset {
    #[default]
    En,
    De,
}

impl VocabularyPreset {
    pub fn vocabulary(self) -> &'static Vocabulary {
        match self {
            VocabularyPreset::En => &ENGLISH,
            VocabularyPreset::De => &GERMAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub customer_label: &'static str,
    pub date_label: &'static str,
    pub title_placeholder: &'static str,
    pub checklist_placeholder: &'static str,
    /// Written with `[x]`; `[X]` is accepted when reading.
    pub completed_marker: &'static str,
    pub summary_heading: &'static str,
    pub summary_subheading: &'static str,
    pub pre_check_heading: &'static str,
    pub tasks_heading: &'static str,
    pub ignored_sections: &'static [&'static str],
    pub deployments_folder: &'static str,
    pub archive_folder: &'static str,
    pub report_file: &'static str,
    pub unknown_title: &'static str,
}

pub static ENGLISH: Vocabulary = Vocabulary {
    customer_label: "**Customer**:",
    date_label: "**Date**:",
    title_placeholder: "[Title]",
    checklist_placeholder: "[Checklist]",
    completed_marker: "- [x] **Task completed**",
    summary_heading: "### Short description",
    summary_subheading: "#####",
    pre_check_heading: "#### Pre-check",
    tasks_heading: "## Tasks",
    ignored_sections: &["Done", "Cancelled"],
    deployments_folder: "1. Deployments",
    archive_folder: "_Archive",
    report_file: "Outstanding tasks.md",
    unknown_title: "Unknown",
};

pub static GERMAN: Vocabulary = Vocabulary {
    customer_label: "**Kunde**:",
    date_label: "**Datum**:",
    title_placeholder: "[Title]",
    checklist_placeholder: "[Checklist]",
    completed_marker: "- [x] **Auftrag abgeschlossen**",
    summary_heading: "### Kurzbeschrieb Auftrag",
    summary_subheading: "#####",
    pre_check_heading: "#### Abklären",
    tasks_heading: "## Aufträge",
    ignored_sections: &["Done", "Abgebrochen"],
    deployments_folder: "1. Einsätze",
    archive_folder: "_Archiv",
    report_file: "Nicht abgeschlossene Aufträge.md",
    unknown_title: "Unbekannt",
};

/// A Markdown ATX heading: `level` leading `#`s followed by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: usize,
    pub text: &'a str,
}

/// Parses a line as an ATX heading. Leading indentation is not allowed.
pub fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(Heading {
        level,
        text: rest.trim(),
    })
}

/// State of a Markdown checkbox list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkbox {
    Open,
    Checked,
}

/// Recognises `- [ ] ...` and `- [x] ...` list items (also `*` bullets).
pub fn parse_checkbox(line: &str) -> Option<Checkbox> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))?;
    if rest.starts_with("[ ]") {
        Some(Checkbox::Open)
    } else if rest.starts_with("[x]") || rest.starts_with("[X]") {
        Some(Checkbox::Checked)
    } else {
        None
    }
}
