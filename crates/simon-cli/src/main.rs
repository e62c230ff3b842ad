use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use simon_cli::{
    Args,
    error_adapter::{Reportable, error_reportables, problem_reportables},
};

fn render(reportables: &[Reportable<'_>]) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    for reportable in reportables {
        reporter
            .render_report(&mut writer, reportable)
            .expect("Writing to String buffer is infallible");
    }
    writer
}

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Simon");
    debug!(args:?; "Parsed arguments");

    if !args.list_types.is_empty() {
        match simon_cli::list_types(&args) {
            Ok(types) => {
                for ty in types {
                    println!("{ty}");
                }
            }
            Err(err) => {
                error!("Failed\n{}", render(&error_reportables(&err)));
                process::exit(1);
            }
        }
        return;
    }

    let report = match simon_cli::run(&args) {
        Ok(report) => report,
        Err(err) => {
            error!("Failed\n{}", render(&error_reportables(&err)));
            process::exit(1);
        }
    };

    print!("{}", report.render_trees());

    let problems = report
        .compilation()
        .results()
        .iter()
        .flat_map(|result| result.problems());
    let (warnings, errors): (Vec<_>, Vec<_>) = problem_reportables(problems, |name| {
        report.source_text(name)
    })
    .into_iter()
    .partition(|r| matches!(r, Reportable::Problem(p) if p.is_warning()));

    if !warnings.is_empty() {
        warn!("Warnings\n{}", render(&warnings));
    }
    if !errors.is_empty() {
        error!("Failed\n{}", render(&errors));
    }

    if report.has_errors() {
        process::exit(1);
    }

    info!("Completed successfully");
}
