// File: ./src/controller.rs
//! Central controller for planner actions.
//!
//! Every host-facing action lives on `Planner`. Actions read the file tree
//! fresh each time; there is no in-memory model to keep in sync. Front ends
//! call an action through `Planner::run`, which turns the outcome into a
//! single `Notice` and logs failures, so no error crosses that boundary.
use crate::archive::{ArchiveSummary, archive_remote_days};
use crate::calendar::{CalendarDay, CalendarIndex, build_index, remote_day_folders};
use crate::config::{Config, keys};
use crate::context::AppContext;
use crate::error::{IoContext, PlannerError, PlannerResult};
use crate::model::schedule::{add_task_to_schedule, insert_task_entry};
use crate::model::span::{format_iso_date, parse_iso_date};
use crate::model::{DateSpan, RECORD_FILE, RecordFields, SCHEDULE_FILE, TASK_FILE, Vocabulary};
use crate::report;
use crate::storage::{TemplatePlan, instantiate_template, list_dirs, list_files};
use crate::system;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// User-visible outcome of one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

/// A selectable deployment type: a file whose stem is the title and whose
/// body is the checklist embedded into new deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentType {
    pub title: String,
    pub path: PathBuf,
}

impl DeploymentType {
    pub fn load_checklist(&self) -> PlannerResult<String> {
        fs::read_to_string(&self.path).at(&self.path)
    }
}

/// Everything known about one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub day: Option<CalendarDay>,
    /// Schedule of the remote day on this date, active or archived.
    pub schedule: Option<PathBuf>,
}

/// Rejects names that are empty or would escape their parent folder.
pub fn validate_name(kind: &str, name: &str) -> PlannerResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::invalid(format!("{} name is empty", kind)));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(PlannerError::invalid(format!(
            "{} name '{}' is not a plain folder name",
            kind, trimmed
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone)]
pub struct Planner {
    pub config: Config,
    pub ctx: Arc<dyn AppContext>,
}

impl Planner {
    pub fn new(config: Config, ctx: Arc<dyn AppContext>) -> Self {
        Self { config, ctx }
    }

    /// Loads the configuration for `ctx`, falling back to defaults when no
    /// file exists yet.
    pub fn load(ctx: Arc<dyn AppContext>) -> anyhow::Result<Self> {
        let config = Config::load_or_default(ctx.as_ref())?;
        Ok(Self::new(config, ctx))
    }

    pub fn vocab(&self) -> &'static Vocabulary {
        self.config.vocab()
    }

    /// Action boundary. Runs `f` and converts its outcome into a notice;
    /// failures additionally produce one diagnostic log line.
    pub fn run<F>(&self, action: &str, f: F) -> Notice
    where
        F: FnOnce(&Self) -> PlannerResult<String>,
    {
        match f(self) {
            Ok(message) => {
                log::debug!("{} succeeded", action);
                Notice::success(message)
            }
            Err(e) => {
                log::error!("{} failed [{}]: {}", action, e.kind(), e);
                Notice::failure(format!("{} failed: {}", action, e))
            }
        }
    }

    fn instantiate(&self, src: &Path, dest: &Path) -> PlannerResult<usize> {
        let copied = if self.config.plan_template_copies {
            TemplatePlan::scan(src, dest)?.apply()
        } else {
            instantiate_template(src, dest)
        };
        match copied {
            Ok(n) => {
                log::info!("Copied {} files from {} to {}", n, src.display(), dest.display());
                Ok(n)
            }
            Err(e) => {
                if dest.exists() {
                    log::warn!("Partial copy left at {}", dest.display());
                }
                Err(e)
            }
        }
    }

    // --- Customers ---

    pub fn customers(&self) -> PlannerResult<Vec<String>> {
        let base = self.config.require_path(keys::CUSTOMER_DESTINATION)?;
        Ok(list_dirs(&base))
    }

    /// Creates `<customer base>/<name>` from the customer template.
    pub fn create_customer(&self, name: &str) -> PlannerResult<PathBuf> {
        let name = validate_name("Customer", name)?;
        let template = self.config.require_path(keys::CUSTOMER_TEMPLATE)?;
        let base = self.config.require_path(keys::CUSTOMER_DESTINATION)?;

        let dest = base.join(&name);
        if dest.exists() {
            return Err(PlannerError::AlreadyExists(dest));
        }
        self.instantiate(&template, &dest)?;
        Ok(dest)
    }

    // --- Deployments ---

    /// Deployment types sorted by title. A missing directory is `NotFound`,
    /// an empty one is rejected since a deployment cannot be created from it.
    pub fn deployment_types(&self) -> PlannerResult<Vec<DeploymentType>> {
        let dir = self.config.require_path(keys::DEPLOYMENT_TYPES)?;
        if !dir.is_dir() {
            return Err(PlannerError::NotFound(dir));
        }
        let types: Vec<DeploymentType> = list_files(&dir)
            .into_iter()
            .map(|file| {
                let path = dir.join(&file);
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or(file);
                DeploymentType { title, path }
            })
            .collect();
        if types.is_empty() {
            return Err(PlannerError::invalid(format!(
                "no deployment types in {}",
                dir.display()
            )));
        }
        Ok(types)
    }

    pub fn deployment_type(&self, title: &str) -> PlannerResult<DeploymentType> {
        self.deployment_types()?
            .into_iter()
            .find(|t| t.title == title.trim())
            .ok_or_else(|| PlannerError::invalid(format!("unknown deployment type '{}'", title)))
    }

    /// Creates a deployment folder for `customer` covering `span`, then fills
    /// its record document with the customer, start date, type title and the
    /// type's checklist.
    pub fn create_deployment(
        &self,
        customer: &str,
        span: DateSpan,
        type_title: &str,
    ) -> PlannerResult<PathBuf> {
        let template = self.config.require_path(keys::DEPLOYMENT_TEMPLATE)?;
        let base = self.config.require_path(keys::CUSTOMER_DESTINATION)?;
        let deployment_type = self.deployment_type(type_title)?;
        let checklist = deployment_type.load_checklist()?;

        let customer = validate_name("Customer", customer)?;
        let customer_dir = base.join(&customer);
        if !customer_dir.is_dir() {
            return Err(PlannerError::NotFound(customer_dir));
        }

        let dest = customer_dir
            .join(self.vocab().deployments_folder)
            .join(span.folder_name());
        if dest.exists() {
            return Err(PlannerError::AlreadyExists(dest));
        }
        self.instantiate(&template, &dest)?;

        let start = format_iso_date(span.start());
        let fields = RecordFields {
            customer: Some(customer.as_str()),
            date: Some(start.as_str()),
            title: Some(deployment_type.title.as_str()),
            checklist: Some(checklist.as_str()),
        };
        fields.update_in_place(&dest.join(RECORD_FILE), self.vocab())?;
        log::info!("Created deployment {} for {}", span, customer);
        Ok(dest)
    }

    // --- Remote days ---

    /// Active remote days, by date.
    pub fn remote_days(&self) -> PlannerResult<Vec<String>> {
        let base = self.config.require_path(keys::REMOTE_DAY_DESTINATION)?;
        Ok(list_dirs(&base)
            .into_iter()
            .filter(|name| parse_iso_date(name).is_some())
            .collect())
    }

    /// Creates the remote day for `date` and returns its schedule path.
    pub fn create_remote_day(&self, date: NaiveDate) -> PlannerResult<PathBuf> {
        let template = self.config.require_path(keys::REMOTE_DAY_TEMPLATE)?;
        let base = self.config.require_path(keys::REMOTE_DAY_DESTINATION)?;

        let dest = base.join(format_iso_date(date));
        if dest.exists() {
            return Err(PlannerError::AlreadyExists(dest));
        }
        self.instantiate(&template, &dest)?;

        let schedule = dest.join(SCHEDULE_FILE);
        if !schedule.is_file() {
            log::warn!("Remote day template has no {}", SCHEDULE_FILE);
        }
        Ok(schedule)
    }

    /// Adds a task folder under the active remote day for `date`, links it
    /// from the day's schedule and fills the task document.
    pub fn create_task(&self, date: NaiveDate, name: &str) -> PlannerResult<PathBuf> {
        let name = validate_name("Task", name)?;
        let template = self.config.require_path(keys::REMOTE_TASK_TEMPLATE)?;
        let base = self.config.require_path(keys::REMOTE_DAY_DESTINATION)?;
        let vocab = self.vocab();

        let day_dir = base.join(format_iso_date(date));
        if !day_dir.is_dir() {
            return Err(PlannerError::NotFound(day_dir));
        }
        let schedule = day_dir.join(SCHEDULE_FILE);
        let content = fs::read_to_string(&schedule).at(&schedule)?;
        // Checked up front so a broken schedule does not leave a stray folder.
        if insert_task_entry(&content, "", vocab).is_none() {
            return Err(PlannerError::MalformedStructure {
                path: schedule,
                detail: format!("section '{}' not found", vocab.tasks_heading),
            });
        }

        let task_dir = day_dir.join(&name);
        if task_dir.exists() {
            return Err(PlannerError::AlreadyExists(task_dir));
        }
        self.instantiate(&template, &task_dir)?;

        let task_file = task_dir.join(TASK_FILE);
        add_task_to_schedule(&schedule, &self.config.root(), &task_file, &name, vocab)?;

        let fields = RecordFields {
            customer: Some(name.as_str()),
            ..RecordFields::default()
        };
        fields.update_in_place(&task_file, vocab)?;
        log::info!("Added task '{}' to {}", name, format_iso_date(date));
        Ok(task_file)
    }

    // --- Maintenance ---

    pub fn archive(&self, today: NaiveDate) -> PlannerResult<ArchiveSummary> {
        let base = self.config.require_path(keys::REMOTE_DAY_DESTINATION)?;
        archive_remote_days(&base, today, self.config.archive_after_days, self.vocab())
    }

    /// Writes the outstanding-task report; returns its path and task count.
    pub fn write_report(&self) -> PlannerResult<(PathBuf, usize)> {
        let base = self.config.require_path(keys::REMOTE_DAY_DESTINATION)?;
        report::write_report(&base, self.vocab())
    }

    // --- Calendar ---

    /// Builds the calendar index from whichever trees are configured.
    pub fn calendar(&self) -> PlannerResult<CalendarIndex> {
        let customers = self.config.require_path(keys::CUSTOMER_DESTINATION).ok();
        let remote = self.config.require_path(keys::REMOTE_DAY_DESTINATION).ok();
        if customers.is_none() && remote.is_none() {
            return Err(PlannerError::ConfigMissing {
                setting: keys::CUSTOMER_DESTINATION,
            });
        }
        Ok(build_index(
            customers.as_deref(),
            remote.as_deref(),
            self.vocab(),
        ))
    }

    pub fn day_info(&self, date: NaiveDate) -> PlannerResult<DayInfo> {
        let index = self.calendar()?;
        let schedule = match self.config.require_path(keys::REMOTE_DAY_DESTINATION) {
            Ok(base) => remote_day_folders(&base, self.vocab())
                .into_iter()
                .find(|f| f.date == date)
                .map(|f| f.schedule_path()),
            Err(_) => None,
        };
        Ok(DayInfo {
            date,
            day: index.get(date).cloned(),
            schedule,
        })
    }

    /// Date of the remote day whose schedule is `path`, if it is one.
    pub fn schedule_date_for(&self, path: &Path) -> Option<NaiveDate> {
        let base = self.config.require_path(keys::REMOTE_DAY_DESTINATION).ok()?;
        if path.file_name()? != SCHEDULE_FILE {
            return None;
        }
        let day_dir = path.parent()?;
        if day_dir.parent()? != base.as_path() {
            return None;
        }
        parse_iso_date(&day_dir.file_name()?.to_string_lossy())
    }

    // --- External viewer ---

    pub fn open_in_viewer(&self, file: &Path) -> PlannerResult<()> {
        let program = self.config.require_path(keys::XML_PROGRAM)?;
        system::open_in_viewer(&program, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Task", "  Fix VPN ").unwrap(), "Fix VPN");
        assert!(validate_name("Task", "   ").is_err());
        assert!(validate_name("Task", "../etc").is_err());
        assert!(validate_name("Task", "a\\b").is_err());
        assert!(validate_name("Task", "..").is_err());
    }

    #[test]
    fn test_notice_levels() {
        assert!(Notice::success("ok").is_success());
        assert!(!Notice::failure("no").is_success());
    }
}
