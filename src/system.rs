// File: ./src/system.rs
// Process-level integration: logger setup and the external viewer.
use crate::error::{IoContext, PlannerError, PlannerResult};
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::Command;

/// Extension handled by the external viewer.
pub const VIEWER_EXTENSION: &str = "xml";

/// Installs the global logger: warnings (or everything with `verbose`) on
/// stderr, plus an appending log file when `log_path` is given.
pub fn init_logging(verbose: bool, log_path: Option<&Path>) -> anyhow::Result<()> {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_path {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let file_level = if verbose {
                    LevelFilter::Debug
                } else {
                    LevelFilter::Info
                };
                loggers.push(WriteLogger::new(file_level, LogConfig::default(), file));
            }
            Err(e) => eprintln!("Log file {} unavailable: {}", path.display(), e),
        }
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

pub fn is_viewer_file(file: &Path) -> bool {
    file.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(VIEWER_EXTENSION))
}

/// Launches `program` with `file` as its only argument. No shell is involved,
/// so paths with spaces need no quoting. The child is not waited for.
pub fn open_in_viewer(program: &Path, file: &Path) -> PlannerResult<()> {
    if !is_viewer_file(file) {
        return Err(PlannerError::invalid(format!(
            "{} is not a .{} file",
            file.display(),
            VIEWER_EXTENSION
        )));
    }
    if !file.is_file() {
        return Err(PlannerError::NotFound(file.to_path_buf()));
    }

    let child = Command::new(program).arg(file).spawn().at(program)?;
    log::info!(
        "Opened {} with {} (pid {})",
        file.display(),
        program.display(),
        child.id()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_only_xml_is_accepted() {
        assert!(is_viewer_file(Path::new("/tmp/config.XML")));
        assert!(!is_viewer_file(Path::new("/tmp/notes.md")));
        assert!(!is_viewer_file(Path::new("/tmp/xml")));
    }

    #[test]
    fn test_missing_program_is_reported() {
        let ctx = TestContext::new();
        let file = ctx.root.join("export.xml");
        std::fs::write(&file, "<a/>").unwrap();
        let err = open_in_viewer(&ctx.root.join("no-such-viewer"), &file).unwrap_err();
        assert!(matches!(err, PlannerError::NotFound(_)));
    }
}
