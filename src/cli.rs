// File: ./src/cli.rs
//! Command-line interface: help text, argument parsing and dispatch of
//! commands onto `Planner` actions.
use crate::config::Config;
use crate::controller::{Notice, Planner};
use crate::error::{PlannerError, PlannerResult};
use crate::model::DateSpan;
use crate::model::span::{format_iso_date, parse_iso_date};
use crate::view;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Help,
    Customers,
    NewCustomer {
        name: String,
    },
    Types,
    NewDeployment {
        customer: String,
        start: String,
        end: Option<String>,
        type_title: String,
    },
    RemoteDays,
    NewRemoteDay {
        date: String,
    },
    NewTask {
        date: String,
        name: String,
    },
    Archive,
    Check,
    Calendar {
        from: Option<String>,
        months: u32,
        json: bool,
    },
    Day {
        date: String,
    },
    Open {
        file: PathBuf,
    },
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: CliCommand,
}

pub fn print_help(binary_name: &str) {
    println!(
        "Fieldplan v{} - deployments and remote days kept as Markdown folders",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <COMMAND> [ARGS]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and log.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    customers                              List customers");
    println!("    new-customer <name>                    Create a customer from the template");
    println!("    types                                  List deployment types");
    println!("    new-deployment <customer> <start> [<end>] --type <title>");
    println!("                                           Create a deployment for a customer");
    println!("    remote-days                            List active remote days");
    println!("    new-remote-day <date>                  Create a remote day");
    println!("    new-task <date> <name>                 Add a task to a remote day");
    println!("    archive                                Move old remote days to the archive");
    println!("    check                                  Write the outstanding-task report");
    println!("    calendar [YYYY-MM] [--months N] [--json]");
    println!("                                           Show the calendar (default 4 months)");
    println!("    day <date>                             Show what happens on a date");
    println!("    open <file.xml>                        Open a file in the configured viewer");
    println!("    config                                 Show the config path and settings");
    println!();
    println!("DATES:");
    println!("    Dates are YYYY-MM-DD. 'today' is accepted wherever a date is expected.");
    println!();
    println!("EXAMPLES:");
    println!("    {} new-deployment Acme 2024-06-03 2024-06-07 --type Rollout", binary_name);
    println!("    {} new-task today \"Fix VPN\"", binary_name);
    println!("    {} calendar 2024-06 --months 2", binary_name);
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    match args.get(*i) {
        Some(v) => Ok(v.clone()),
        None => bail!("{} requires a value", flag),
    }
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut verbose = false;
    let mut type_title = None;
    let mut months = None;
    let mut json = false;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                return Ok(CliArgs {
                    root,
                    verbose,
                    command: CliCommand::Help,
                });
            }
            "-r" | "--root" => root = Some(PathBuf::from(take_value(args, &mut i, "--root")?)),
            "-v" | "--verbose" => verbose = true,
            "-t" | "--type" => type_title = Some(take_value(args, &mut i, "--type")?),
            "-m" | "--months" => {
                let raw = take_value(args, &mut i, "--months")?;
                match raw.parse::<u32>() {
                    Ok(n) if n > 0 => months = Some(n),
                    _ => bail!("--months expects a positive number, got '{}'", raw),
                }
            }
            "--json" => json = true,
            other if other.starts_with('-') && other.len() > 1 => {
                bail!("Unknown option '{}'", other)
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let Some((name, rest)) = positional.split_first() else {
        return Ok(CliArgs {
            root,
            verbose,
            command: CliCommand::Help,
        });
    };

    let arity = |min: usize, max: usize| -> Result<()> {
        if rest.len() < min || rest.len() > max {
            bail!("Wrong number of arguments for '{}' (see --help)", name);
        }
        Ok(())
    };

    let command = match name.as_str() {
        "help" => CliCommand::Help,
        "customers" => {
            arity(0, 0)?;
            CliCommand::Customers
        }
        "new-customer" => {
            arity(1, 1)?;
            CliCommand::NewCustomer {
                name: rest[0].clone(),
            }
        }
        "types" => {
            arity(0, 0)?;
            CliCommand::Types
        }
        "new-deployment" => {
            arity(2, 3)?;
            let Some(type_title) = type_title.clone() else {
                bail!("new-deployment requires --type <title>");
            };
            CliCommand::NewDeployment {
                customer: rest[0].clone(),
                start: rest[1].clone(),
                end: rest.get(2).cloned(),
                type_title,
            }
        }
        "remote-days" => {
            arity(0, 0)?;
            CliCommand::RemoteDays
        }
        "new-remote-day" => {
            arity(1, 1)?;
            CliCommand::NewRemoteDay {
                date: rest[0].clone(),
            }
        }
        "new-task" => {
            arity(2, 2)?;
            CliCommand::NewTask {
                date: rest[0].clone(),
                name: rest[1].clone(),
            }
        }
        "archive" => {
            arity(0, 0)?;
            CliCommand::Archive
        }
        "check" => {
            arity(0, 0)?;
            CliCommand::Check
        }
        "calendar" => {
            arity(0, 1)?;
            CliCommand::Calendar {
                from: rest.first().cloned(),
                months: months.unwrap_or(view::DEFAULT_MONTHS),
                json,
            }
        }
        "day" => {
            arity(1, 1)?;
            CliCommand::Day {
                date: rest[0].clone(),
            }
        }
        "open" => {
            arity(1, 1)?;
            CliCommand::Open {
                file: PathBuf::from(&rest[0]),
            }
        }
        "config" => {
            arity(0, 0)?;
            CliCommand::Config
        }
        other => bail!("Unknown command '{}' (see --help)", other),
    };

    Ok(CliArgs {
        root,
        verbose,
        command,
    })
}

/// Parses a date argument; `today` maps to `today`.
pub fn parse_date_arg(arg: &str, today: NaiveDate) -> PlannerResult<NaiveDate> {
    if arg.trim().eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    parse_iso_date(arg)
        .ok_or_else(|| PlannerError::invalid(format!("'{}' is not a YYYY-MM-DD date", arg)))
}

/// Parses `YYYY-MM` (or `today`) into the first day of that month.
pub fn parse_month_arg(arg: &str, today: NaiveDate) -> PlannerResult<NaiveDate> {
    if arg.trim().eq_ignore_ascii_case("today") {
        return Ok(view::month_start(today));
    }
    parse_iso_date(&format!("{}-01", arg.trim()))
        .ok_or_else(|| PlannerError::invalid(format!("'{}' is not a YYYY-MM month", arg)))
}

fn span_arg(start: &str, end: Option<&str>, today: NaiveDate) -> PlannerResult<DateSpan> {
    let start = parse_date_arg(start, today)?;
    let end = end.map(|e| parse_date_arg(e, today)).transpose()?;
    DateSpan::new(start, end)
}

fn lines_or(items: Vec<String>, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join("\n")
    }
}

/// Runs `command` through the planner's action boundary.
pub fn execute(planner: &Planner, command: &CliCommand, today: NaiveDate) -> Notice {
    match command {
        CliCommand::Help => Notice::success(""),
        CliCommand::Customers => planner.run("List customers", |p| {
            Ok(lines_or(p.customers()?, "No customers yet."))
        }),
        CliCommand::NewCustomer { name } => planner.run("Create customer", |p| {
            let dest = p.create_customer(name)?;
            Ok(format!("Created customer {}", dest.display()))
        }),
        CliCommand::Types => planner.run("List deployment types", |p| {
            let titles = p.deployment_types()?.into_iter().map(|t| t.title).collect();
            Ok(lines_or(titles, ""))
        }),
        CliCommand::NewDeployment {
            customer,
            start,
            end,
            type_title,
        } => planner.run("Create deployment", |p| {
            let span = span_arg(start, end.as_deref(), today)?;
            let dest = p.create_deployment(customer, span, type_title)?;
            Ok(format!("Created deployment {}", dest.display()))
        }),
        CliCommand::RemoteDays => planner.run("List remote days", |p| {
            Ok(lines_or(p.remote_days()?, "No remote days."))
        }),
        CliCommand::NewRemoteDay { date } => planner.run("Create remote day", |p| {
            let schedule = p.create_remote_day(parse_date_arg(date, today)?)?;
            Ok(format!("Created remote day, schedule at {}", schedule.display()))
        }),
        CliCommand::NewTask { date, name } => planner.run("Create task", |p| {
            let task = p.create_task(parse_date_arg(date, today)?, name)?;
            Ok(format!("Created task {}", task.display()))
        }),
        CliCommand::Archive => planner.run("Archive remote days", |p| {
            let summary = p.archive(today)?;
            let mut lines = vec![format!("Archived {} remote days.", summary.moved.len())];
            for (name, reason) in &summary.skipped {
                lines.push(format!("Skipped {}: {}", name, reason));
            }
            Ok(lines.join("\n"))
        }),
        CliCommand::Check => planner.run("Check tasks", |p| {
            let (path, count) = p.write_report()?;
            Ok(format!("{} open tasks listed in {}", count, path.display()))
        }),
        CliCommand::Calendar { from, months, json } => planner.run("Show calendar", |p| {
            let index = p.calendar()?;
            if *json {
                return serde_json::to_string_pretty(&index)
                    .map_err(|e| PlannerError::invalid(e.to_string()));
            }
            let first = match from {
                Some(month) => parse_month_arg(month, today)?,
                None => view::month_start(today),
            };
            Ok(view::render_months(&index, first, *months))
        }),
        CliCommand::Day { date } => planner.run("Show day", |p| {
            let info = p.day_info(parse_date_arg(date, today)?)?;
            Ok(view::render_day(info.date, info.day.as_ref(), info.schedule.as_deref())
                .trim_end()
                .to_string())
        }),
        CliCommand::Open { file } => planner.run("Open viewer", |p| {
            p.open_in_viewer(file)?;
            Ok(format!("Opened {}", file.display()))
        }),
        CliCommand::Config => planner.run("Show configuration", |p| {
            let path = Config::get_path_string(p.ctx.as_ref())
                .map_err(|e| PlannerError::Config(e.to_string()))?;
            let settings = toml::to_string_pretty(&p.config)
                .map_err(|e| PlannerError::Config(e.to_string()))?;
            Ok(format!(
                "# {}\n# today is {}\n{}",
                path,
                format_iso_date(today),
                settings.trim_end()
            ))
        }),
    }
}
