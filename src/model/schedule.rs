// File: ./src/model/schedule.rs
//! Remote-day schedule document (`Zeitplan.md`).
//!
//! Tasks are listed as checklist lines under the tasks heading. Other headings
//! split the document into sections; sections whose heading contains one of
//! the ignored terms (e.g. "Done") hold finished work.
use crate::error::{IoContext, PlannerError, PlannerResult};
use crate::model::markers::{Vocabulary, parse_heading};
use crate::storage::LocalStorage;
use std::fs;
use std::path::Path;

/// Builds the wiki-link target for `path`: relative to `vault_root`,
/// `/`-separated. Falls back to the full path outside the vault.
pub fn vault_link(vault_root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(vault_root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Checklist line referencing a task's record document.
pub fn task_entry(link_target: &str, task_name: &str) -> String {
    format!("- [ ] [[{}|{}]]", link_target, task_name)
}

/// Inserts `entry` as the first line of the tasks section.
///
/// The entry goes directly after the heading line, or after the blank line
/// that follows it. Returns `None` when the heading is missing.
pub fn insert_task_entry(content: &str, entry: &str, vocab: &Vocabulary) -> Option<String> {
    let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let mut offset = 0;
    let mut segments = content.split_inclusive('\n').peekable();

    while let Some(segment) = segments.next() {
        offset += segment.len();
        if segment.trim_end() != vocab.tasks_heading {
            continue;
        }

        let mut prefix = String::new();
        if !segment.ends_with('\n') {
            // Heading is the last line and has no terminator.
            prefix.push_str(eol);
        } else if let Some(next) = segments.peek()
            && next.trim().is_empty()
            && next.ends_with('\n')
        {
            offset += next.len();
        }

        let mut out = String::with_capacity(content.len() + entry.len() + 4);
        out.push_str(&content[..offset]);
        out.push_str(&prefix);
        out.push_str(entry);
        out.push_str(eol);
        out.push_str(&content[offset..]);
        return Some(out);
    }
    None
}

/// Adds an unchecked entry for `task_name` to the schedule at `schedule_path`.
///
/// `task_file` is the task's record document; the entry links to it relative
/// to `vault_root`. The edit runs under the tree lock at `vault_root`.
pub fn add_task_to_schedule(
    schedule_path: &Path,
    vault_root: &Path,
    task_file: &Path,
    task_name: &str,
    vocab: &Vocabulary,
) -> PlannerResult<()> {
    let entry = task_entry(&vault_link(vault_root, task_file), task_name);
    LocalStorage::with_tree_lock(vault_root, || {
        let content = fs::read_to_string(schedule_path).at(schedule_path)?;
        let updated = insert_task_entry(&content, &entry, vocab).ok_or_else(|| {
            PlannerError::MalformedStructure {
                path: schedule_path.to_path_buf(),
                detail: format!("section '{}' not found", vocab.tasks_heading),
            }
        })?;
        LocalStorage::atomic_write(schedule_path, updated)
    })
}

/// Collects unchecked checklist lines from every section that is not
/// ignored, trimmed, in document order.
pub fn extract_in_progress(content: &str, vocab: &Vocabulary) -> Vec<String> {
    let mut ignored = false;
    let mut tasks = Vec::new();

    for line in content.lines() {
        if let Some(heading) = parse_heading(line) {
            ignored = vocab
                .ignored_sections
                .iter()
                .any(|term| heading.text.contains(term));
            continue;
        }
        if !ignored && line.contains("- [ ]") {
            tasks.push(line.trim().to_string());
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::markers::ENGLISH;
    use std::path::PathBuf;

    #[test]
    fn test_vault_link_uses_forward_slashes() {
        let root = PathBuf::from("/vault");
        let file = root.join("Remote").join("2024-06-03").join("Fix VPN").join("Auftrag.md");
        assert_eq!(vault_link(&root, &file), "Remote/2024-06-03/Fix VPN/Auftrag.md");
    }

    #[test]
    fn test_insert_after_blank_line() {
        let doc = "# Day\n\n## Tasks\n\n- [ ] old\n";
        let out = insert_task_entry(doc, "- [ ] new", &ENGLISH).unwrap();
        assert_eq!(out, "# Day\n\n## Tasks\n\n- [ ] new\n- [ ] old\n");
    }

    #[test]
    fn test_insert_directly_after_heading() {
        let doc = "## Tasks\n- [ ] old\n";
        let out = insert_task_entry(doc, "- [ ] new", &ENGLISH).unwrap();
        assert_eq!(out, "## Tasks\n- [ ] new\n- [ ] old\n");
    }

    #[test]
    fn test_insert_heading_at_eof() {
        let out = insert_task_entry("## Tasks", "- [ ] new", &ENGLISH).unwrap();
        assert_eq!(out, "## Tasks\n- [ ] new\n");
    }

    #[test]
    fn test_insert_preserves_crlf() {
        let doc = "## Tasks\r\n\r\n- [x] old\r\n";
        let out = insert_task_entry(doc, "- [ ] new", &ENGLISH).unwrap();
        assert_eq!(out, "## Tasks\r\n\r\n- [ ] new\r\n- [x] old\r\n");
    }

    #[test]
    fn test_insert_requires_heading() {
        assert!(insert_task_entry("## Notes\n", "- [ ] new", &ENGLISH).is_none());
        // A deeper heading with the same words is a different section.
        assert!(insert_task_entry("### Tasks\n", "- [ ] new", &ENGLISH).is_none());
    }
}
