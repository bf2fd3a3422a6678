// File: ./src/view.rs
//! Plain-text rendering of the calendar index: month grids and day details.
use crate::calendar::{CalendarDay, CalendarIndex, DeploymentState, RemoteDayLocation};
use crate::model::span::format_iso_date;
use chrono::{Datelike, Months, NaiveDate};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_MONTHS: u32 = 4;

const WEEKDAY_HEADER: &str = "Mo   Tu   We   Th   Fr   Sa   Su";

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The state that most needs attention among a day's deployments.
fn day_state(day: &CalendarDay) -> Option<DeploymentState> {
    let states = day.deployments.iter().map(|d| d.state);
    [
        DeploymentState::New,
        DeploymentState::Ready,
        DeploymentState::Completed,
    ]
    .into_iter()
    .find(|wanted| states.clone().any(|s| s == *wanted))
}

fn remote_code(location: RemoteDayLocation) -> char {
    match location {
        RemoteDayLocation::Active => 'r',
        RemoteDayLocation::Archived => 'a',
    }
}

fn cell(date: NaiveDate, index: &CalendarIndex) -> String {
    let (state, remote) = match index.get(date) {
        Some(day) => (
            day_state(day).map(DeploymentState::code).unwrap_or(' '),
            day.remote_day.map(remote_code).unwrap_or(' '),
        ),
        None => (' ', ' '),
    };
    format!("{:>2}{}{}", date.day(), state, remote)
}

fn render_month(first: NaiveDate, index: &CalendarIndex, out: &mut String) {
    out.push_str(&first.format("%B %Y").to_string());
    out.push('\n');
    out.push_str(WEEKDAY_HEADER);
    out.push('\n');

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<String> = vec!["    ".to_string(); offset];
    cells.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == first.month())
            .map(|d| cell(d, index)),
    );

    for week in cells.chunks(7) {
        out.push_str(week.join(" ").trim_end());
        out.push('\n');
    }
}

/// Renders `months` consecutive month grids starting at the month of `from`.
/// Weeks start on Monday.
pub fn render_months(index: &CalendarIndex, from: NaiveDate, months: u32) -> String {
    let mut out = String::new();
    let start = month_start(from);
    for i in 0..months {
        let Some(first) = start.checked_add_months(Months::new(i)) else {
            break;
        };
        if i > 0 {
            out.push('\n');
        }
        render_month(first, index, &mut out);
    }
    out.push('\n');
    out.push_str(
        "C completed   R ready   N pre-check open   r remote day   a archived remote day\n",
    );
    if !index.skipped.is_empty() {
        out.push('\n');
        for skipped in &index.skipped {
            out.push_str(&format!(
                "skipped {}: {}\n",
                skipped.path.display(),
                skipped.reason
            ));
        }
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Details for one date: the remote day, if any, then each deployment.
pub fn render_day(
    date: NaiveDate,
    day: Option<&CalendarDay>,
    remote_schedule: Option<&Path>,
) -> String {
    let mut out = format!("{}\n", format_iso_date(date));

    match (day.and_then(|d| d.remote_day), remote_schedule) {
        (Some(location), Some(schedule)) => {
            let label = match location {
                RemoteDayLocation::Active => "remote day",
                RemoteDayLocation::Archived => "remote day (archived)",
            };
            out.push_str(&format!("  {}: {}\n", label, schedule.display()));
        }
        (Some(_), None) | (None, _) => out.push_str("  no remote day\n"),
    }

    let deployments = day.map(|d| d.deployments.as_slice()).unwrap_or(&[]);
    if deployments.is_empty() {
        out.push_str("  no deployments\n");
        return out;
    }

    let width = deployments
        .iter()
        .map(|d| UnicodeWidthStr::width(d.customer.as_str()))
        .max()
        .unwrap_or(0);
    for occurrence in deployments {
        out.push_str(&format!(
            "  [{}] {}  {}\n",
            occurrence.state.code(),
            pad(&occurrence.customer, width),
            occurrence.status.title
        ));
        out.push_str(&format!(
            "      {}  {}\n",
            occurrence.folder,
            occurrence.record_path.display()
        ));
    }
    out
}
