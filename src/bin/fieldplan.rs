use anyhow::Result;
use fieldplan::cli::{self, CliCommand};
use fieldplan::context::{AppContext, StandardContext};
use fieldplan::controller::Planner;
use fieldplan::system;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|a| std::path::Path::new(a).file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fieldplan".to_string());

    let parsed = match cli::parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if parsed.command == CliCommand::Help {
        cli::print_help(&binary_name);
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = Arc::new(StandardContext::new(parsed.root.clone()));
    if let Err(e) = system::init_logging(parsed.verbose, ctx.get_log_path().as_deref()) {
        eprintln!("Logging disabled: {}", e);
    }

    let planner = match Planner::load(ctx) {
        Ok(planner) => planner,
        Err(e) => {
            log::error!("Configuration unusable: {:#}", e);
            eprintln!("Error: {:#}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let today = chrono::Local::now().date_naive();
    let notice = cli::execute(&planner, &parsed.command, today);
    if notice.is_success() {
        if !notice.message.is_empty() {
            println!("{}", notice.message);
        }
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Error: {}", notice.message);
        Ok(ExitCode::FAILURE)
    }
}
