// File: tests/controller_flow.rs
// End-to-end flows through `Planner` on a throwaway planning tree.
use fieldplan::calendar::{DeploymentState, RemoteDayLocation};
use fieldplan::config::Config;
use fieldplan::context::TestContext;
use fieldplan::controller::{NoticeLevel, Planner};
use fieldplan::error::PlannerError;
use fieldplan::model::DateSpan;
use fieldplan::model::span::parse_iso_date;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const RECORD_TEMPLATE: &str = "\
# Deployment
**Customer**:
**Date**:

### Short description
##### [Title]

#### Pre-check
[Checklist]

- [ ] **Task completed**
";

const SCHEDULE_TEMPLATE: &str = "# Remote day\n\n## Tasks\n\n## Done\n";

fn write(path: PathBuf, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup() -> (Arc<TestContext>, Planner) {
    let ctx = Arc::new(TestContext::new());
    let vault = ctx.vault();

    fs::create_dir_all(vault.join("Templates/Customer/1. Deployments")).unwrap();
    write(vault.join("Templates/Customer/Contacts.md"), "# Contacts\n");
    write(vault.join("Templates/Deployment/Einsatz.md"), RECORD_TEMPLATE);
    fs::create_dir_all(vault.join("Templates/Deployment/Photos")).unwrap();
    write(vault.join("Templates/Types/Rollout.md"), "- [ ] Badge\n- [ ] VPN");
    write(vault.join("Templates/Types/Maintenance.md"), "- [x] Nothing to clarify");
    write(vault.join("Templates/RemoteDay/Zeitplan.md"), SCHEDULE_TEMPLATE);
    write(vault.join("Templates/Task/Auftrag.md"), "# Task\n**Customer**:\n");

    let config = Config {
        vault_root: vault.to_string_lossy().into_owned(),
        customer_template_path: "Templates/Customer".into(),
        customer_destination_path: "Customers/".into(),
        deployment_template_path: "Templates/Deployment".into(),
        deployment_types_path: "Templates/Types".into(),
        remote_day_template_path: "Templates/RemoteDay".into(),
        remote_day_destination_path: "Remote".into(),
        remote_task_template_path: "Templates/Task".into(),
        ..Config::default()
    };
    let planner = Planner::new(config, ctx.clone());
    (ctx, planner)
}

fn d(s: &str) -> chrono::NaiveDate {
    parse_iso_date(s).unwrap()
}

#[test]
fn test_calendar_round_trip_single_day() {
    let (_ctx, planner) = setup();
    planner.create_customer("Acme").unwrap();
    let span = DateSpan::parse("2024-01-01", Some("2024-01-01")).unwrap();
    planner.create_deployment("Acme", span, "Rollout").unwrap();

    let index = planner.calendar().unwrap();
    let entries = index.deployments_on("2024-01-01");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].customer, "Acme");
    assert_eq!(entries[0].folder, "2024-01-01");
    assert_eq!(index.days.len(), 1);
}

#[test]
fn test_deployment_record_is_filled_and_spans_weekdays() {
    let (ctx, planner) = setup();
    planner.create_customer("Acme").unwrap();
    let span = DateSpan::parse("2024-06-07", Some("2024-06-10")).unwrap();
    let dest = planner.create_deployment("Acme", span, "Rollout").unwrap();

    assert_eq!(
        dest,
        ctx.vault().join("Customers/Acme/1. Deployments/2024-06-07 - 2024-06-10")
    );
    assert!(dest.join("Photos").is_dir());
    let record = fs::read_to_string(dest.join("Einsatz.md")).unwrap();
    assert!(record.contains("**Customer**: Acme\n**Date**: 2024-06-07\n"));
    assert!(record.contains("##### Rollout\n"));
    assert!(record.contains("#### Pre-check\n- [ ] Badge\n- [ ] VPN\n"));

    let index = planner.calendar().unwrap();
    assert_eq!(index.deployments_on("2024-06-07").len(), 1);
    assert!(index.day("2024-06-08").is_none());
    assert!(index.day("2024-06-09").is_none());
    let monday = &index.deployments_on("2024-06-10")[0];
    assert_eq!(monday.state, DeploymentState::New);
    assert_eq!(monday.status.title, "Rollout");
}

#[test]
fn test_manual_ticks_change_state() {
    let (_ctx, planner) = setup();
    planner.create_customer("Acme").unwrap();
    let dest = planner
        .create_deployment("Acme", DateSpan::single(d("2024-06-03")), "Rollout")
        .unwrap();
    let record = dest.join("Einsatz.md");

    let ticked = fs::read_to_string(&record)
        .unwrap()
        .replace("- [ ] Badge", "- [x] Badge")
        .replace("- [ ] VPN", "- [x] VPN");
    fs::write(&record, &ticked).unwrap();
    assert_eq!(
        planner.calendar().unwrap().deployments_on("2024-06-03")[0].state,
        DeploymentState::Ready
    );

    let completed = ticked.replace("- [ ] **Task completed**", "- [x] **Task completed**");
    fs::write(&record, completed).unwrap();
    assert_eq!(
        planner.calendar().unwrap().deployments_on("2024-06-03")[0].state,
        DeploymentState::Completed
    );
}

#[test]
fn test_inverted_folder_is_skipped_and_reported() {
    let (ctx, planner) = setup();
    planner.create_customer("Acme").unwrap();
    let deployments = ctx.vault().join("Customers/Acme/1. Deployments");
    fs::create_dir_all(deployments.join("2024-06-10 - 2024-06-03")).unwrap();
    fs::create_dir_all(deployments.join("Ideas")).unwrap();

    let index = planner.calendar().unwrap();
    assert!(index.is_empty());
    assert_eq!(index.skipped.len(), 1);
}

#[test]
fn test_missing_settings_abort_before_touching_disk() {
    let ctx = Arc::new(TestContext::new());
    let planner = Planner::new(Config::default(), ctx.clone());

    let err = planner.create_customer("Acme").unwrap_err();
    assert!(matches!(
        err,
        PlannerError::ConfigMissing {
            setting: "customer_template_path"
        }
    ));
    assert!(!PathBuf::from("Acme").exists());

    let notice = planner.run("Create customer", |p| {
        p.create_customer("Acme").map(|_| String::new())
    });
    assert_eq!(notice.level, NoticeLevel::Failure);
    assert!(notice.message.contains("customer_template_path"));

    assert!(matches!(
        planner.open_in_viewer(&ctx.root.join("a.xml")),
        Err(PlannerError::ConfigMissing { setting: "xml_program_path" })
    ));
}

#[test]
fn test_existing_customer_is_refused() {
    let (_ctx, planner) = setup();
    planner.create_customer("Acme").unwrap();
    assert!(matches!(
        planner.create_customer("Acme"),
        Err(PlannerError::AlreadyExists(_))
    ));
    assert_eq!(planner.customers().unwrap(), vec!["Acme".to_string()]);
}

#[test]
fn test_deployment_for_unknown_customer_or_type() {
    let (_ctx, planner) = setup();
    let span = DateSpan::single(d("2024-06-03"));
    assert!(matches!(
        planner.create_deployment("Nobody", span, "Rollout"),
        Err(PlannerError::NotFound(_))
    ));
    planner.create_customer("Acme").unwrap();
    assert!(matches!(
        planner.create_deployment("Acme", span, "Unknown type"),
        Err(PlannerError::InvalidInput(_))
    ));
}

#[test]
fn test_deployment_types_listing() {
    let (ctx, planner) = setup();
    let titles: Vec<String> = planner
        .deployment_types()
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Maintenance", "Rollout"]);

    fs::remove_file(ctx.vault().join("Templates/Types/Rollout.md")).unwrap();
    fs::remove_file(ctx.vault().join("Templates/Types/Maintenance.md")).unwrap();
    assert!(matches!(
        planner.deployment_types(),
        Err(PlannerError::InvalidInput(_))
    ));

    fs::remove_dir(ctx.vault().join("Templates/Types")).unwrap();
    assert!(matches!(
        planner.deployment_types(),
        Err(PlannerError::NotFound(_))
    ));
}

#[test]
fn test_remote_day_and_tasks() {
    let (ctx, planner) = setup();
    let day = d("2024-06-03");

    let schedule = planner.create_remote_day(day).unwrap();
    assert_eq!(schedule, ctx.vault().join("Remote/2024-06-03/Zeitplan.md"));
    assert!(matches!(
        planner.create_remote_day(day),
        Err(PlannerError::AlreadyExists(_))
    ));
    assert_eq!(planner.remote_days().unwrap(), vec!["2024-06-03".to_string()]);

    let task = planner.create_task(day, "Fix VPN").unwrap();
    assert_eq!(
        fs::read_to_string(&task).unwrap(),
        "# Task\n**Customer**: Fix VPN\n"
    );
    assert_eq!(
        fs::read_to_string(&schedule).unwrap(),
        "# Remote day\n\n## Tasks\n\n\
         - [ ] [[Remote/2024-06-03/Fix VPN/Auftrag.md|Fix VPN]]\n## Done\n"
    );

    assert!(matches!(
        planner.create_task(day, "Fix VPN"),
        Err(PlannerError::AlreadyExists(_))
    ));
    assert!(matches!(
        planner.create_task(d("2024-06-04"), "Printer"),
        Err(PlannerError::NotFound(_))
    ));
    assert!(matches!(
        planner.create_task(day, "../escape"),
        Err(PlannerError::InvalidInput(_))
    ));
}

#[test]
fn test_task_on_schedule_without_heading_leaves_no_folder() {
    let (ctx, planner) = setup();
    let day = d("2024-06-03");
    let schedule = planner.create_remote_day(day).unwrap();
    fs::write(&schedule, "# Remote day\n").unwrap();

    assert!(matches!(
        planner.create_task(day, "Printer"),
        Err(PlannerError::MalformedStructure { .. })
    ));
    assert!(!ctx.vault().join("Remote/2024-06-03/Printer").exists());
}

#[test]
fn test_archive_then_report_lists_both_locations() {
    let (ctx, planner) = setup();
    planner.create_remote_day(d("2024-05-01")).unwrap();
    planner.create_remote_day(d("2024-06-14")).unwrap();
    planner.create_task(d("2024-05-01"), "Old printer").unwrap();
    planner.create_task(d("2024-06-14"), "New laptop").unwrap();

    let summary = planner.archive(d("2024-06-15")).unwrap();
    assert_eq!(summary.moved, vec!["2024-05-01".to_string()]);
    let mut archived: Vec<String> = fs::read_dir(ctx.vault().join("Remote/_Archive/2024-05-01"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    archived.sort();
    assert_eq!(archived, vec!["Old printer", "Zeitplan.md"]);

    let index = planner.calendar().unwrap();
    assert_eq!(
        index.day("2024-05-01").unwrap().remote_day,
        Some(RemoteDayLocation::Archived)
    );
    assert_eq!(
        index.day("2024-06-14").unwrap().remote_day,
        Some(RemoteDayLocation::Active)
    );

    let (path, count) = planner.write_report().unwrap();
    assert_eq!(path, ctx.vault().join("Remote/Outstanding tasks.md"));
    assert_eq!(count, 2);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "\n## [[2024-06-14/Zeitplan|2024-06-14]]\n\n\
         - [ ] [[Remote/2024-06-14/New laptop/Auftrag.md|New laptop]]\n\n\
         ## [[_Archive/2024-05-01/Zeitplan|2024-05-01]]\n\n\
         - [ ] [[Remote/2024-05-01/Old printer/Auftrag.md|Old printer]]\n\n"
    );

    let info = planner.day_info(d("2024-05-01")).unwrap();
    assert_eq!(
        info.schedule,
        Some(ctx.vault().join("Remote/_Archive/2024-05-01/Zeitplan.md"))
    );
}

#[test]
fn test_schedule_recognition() {
    let (ctx, planner) = setup();
    let remote = ctx.vault().join("Remote");
    assert_eq!(
        planner.schedule_date_for(&remote.join("2024-06-03/Zeitplan.md")),
        Some(d("2024-06-03"))
    );
    assert_eq!(planner.schedule_date_for(&remote.join("2024-06-03/Notes.md")), None);
    assert_eq!(planner.schedule_date_for(&remote.join("Templates/Zeitplan.md")), None);
    assert_eq!(
        planner.schedule_date_for(&remote.join("_Archive/2024-06-03/Zeitplan.md")),
        None
    );
}

#[test]
fn test_planned_template_copies() {
    let (_ctx, mut planner) = setup();
    planner.config.plan_template_copies = true;
    let schedule = planner.create_remote_day(d("2024-06-03")).unwrap();
    assert_eq!(fs::read_to_string(schedule).unwrap(), SCHEDULE_TEMPLATE);
}
