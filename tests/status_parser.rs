// File: tests/status_parser.rs
use fieldplan::model::markers::{ENGLISH, GERMAN};
use fieldplan::model::{DeploymentStatus, RecordDocument};
use proptest::prelude::*;

const COMPLETED: &str = "- [x] **Task completed**";
const OPEN: &str = "- [ ] **Task completed**";

fn pre_check_section(items: &[bool]) -> String {
    let mut out = String::from("#### Pre-check\n");
    for checked in items {
        out.push_str(if *checked { "- [x] item\n" } else { "- [ ] item\n" });
    }
    out
}

/// Free text that can never be mistaken for a marker.
fn filler() -> impl Strategy<Value = String> {
    "[a-z ]{0,40}"
}

#[test]
fn test_completed_marker_overrides_pre_check() {
    proptest!(|(items in prop::collection::vec(any::<bool>(), 0..8), text in filler())| {
        let doc = format!("{}\n{}\n\n{}", text, COMPLETED, pre_check_section(&items));
        let status = DeploymentStatus::parse(&doc, &ENGLISH);
        prop_assert!(status.completed);
        prop_assert!(status.pre_check_done);
    });
}

#[test]
fn test_partially_checked_pre_check_is_pending() {
    let doc = format!("{}\n\n#### Pre-check\n- [x] VPN\n- [ ] Badge\n", OPEN);
    let status = DeploymentStatus::parse(&doc, &ENGLISH);
    assert!(!status.completed);
    assert!(!status.pre_check_done);
}

#[test]
fn test_missing_pre_check_section_is_vacuously_done() {
    proptest!(|(text in filler())| {
        let doc = format!("# Deployment\n{}\n{}\n", OPEN, text);
        let status = DeploymentStatus::parse(&doc, &ENGLISH);
        prop_assert!(!status.completed);
        prop_assert!(status.pre_check_done);
    });
}

#[test]
fn test_pre_check_is_all_checked_items() {
    proptest!(|(items in prop::collection::vec(any::<bool>(), 0..8), trailing in any::<bool>())| {
        // Section is either the last one in the file or followed by another heading.
        let mut doc = format!("{}\n\n{}", OPEN, pre_check_section(&items));
        if trailing {
            doc.push_str("#### Notes\n- [ ] unrelated\n");
        }
        let status = DeploymentStatus::parse(&doc, &ENGLISH);
        prop_assert_eq!(status.pre_check_done, items.iter().all(|c| *c));
    });
}

#[test]
fn test_no_markers_at_all() {
    proptest!(|(text in filler())| {
        let status = DeploymentStatus::parse(&text, &ENGLISH);
        prop_assert!(!status.completed);
        prop_assert!(status.pre_check_done);
        prop_assert_eq!(status.title, "Unknown");
    });
}

#[test]
fn test_all_markers_present() {
    let doc = "\
### Short description
##### Network rollout
**Customer**: Acme

#### Pre-check
- [x] Access
- [X] Hardware

#### Work
- [x] **Task completed**
";
    let status = DeploymentStatus::parse(doc, &ENGLISH);
    assert_eq!(
        status,
        DeploymentStatus {
            completed: true,
            pre_check_done: true,
            title: "Network rollout".to_string(),
        }
    );
}

#[test]
fn test_unchecked_items_in_later_section_do_not_count() {
    let doc = format!(
        "{}\n#### Pre-check\n- [x] done\n### Followup\n- [ ] later\n",
        OPEN
    );
    let record = RecordDocument::parse(&doc, &ENGLISH);
    assert_eq!(record.pre_check.as_ref().map(Vec::len), Some(1));
    assert!(record.pre_check_done());
}

#[test]
fn test_empty_pre_check_section_is_done() {
    let doc = format!("{}\n#### Pre-check\n\nNothing to clarify.\n", OPEN);
    assert!(DeploymentStatus::parse(&doc, &ENGLISH).pre_check_done);
}

#[test]
fn test_german_markers() {
    let doc = "\
### Kurzbeschrieb Auftrag
#####
Serverumzug

#### Abklären
- [ ] Zutritt
";
    let status = DeploymentStatus::parse(doc, &GERMAN);
    assert!(!status.completed);
    assert!(!status.pre_check_done);
    assert_eq!(status.title, "Serverumzug");

    let done = format!("{}\n- [x] **Auftrag abgeschlossen**\n", doc);
    assert!(DeploymentStatus::parse(&done, &GERMAN).pre_check_done);
}

#[test]
fn test_unreadable_record_defaults() {
    let status = DeploymentStatus::read(std::path::Path::new("/nonexistent/Einsatz.md"), &GERMAN);
    assert_eq!(status, DeploymentStatus::unreadable(&GERMAN));
    assert_eq!(status.title, "Unbekannt");
    assert!(!status.completed && !status.pre_check_done);
}

#[test]
fn test_upper_case_tick_completes_deployment() {
    let doc = "- [X] **Task completed**\n#### Pre-check\n- [ ] a\n";
    let status = DeploymentStatus::parse(doc, &ENGLISH);
    assert!(status.completed);
    assert!(status.pre_check_done);

    let german = "- [X] **Auftrag abgeschlossen**\n#### Abklären\n- [ ] Zutritt\n";
    assert!(DeploymentStatus::parse(german, &GERMAN).completed);
}
