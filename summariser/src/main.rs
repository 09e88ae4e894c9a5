use anyhow::Context as _;
use clap::Parser as _;
use clap::error::ErrorKind;
use env_logger::{Builder, Env};
use log::{debug, info};
use wafl_summary_model::{Mode, Report, write_report};

use wafl_summariser::{summarize_correctness, summarize_performance, table};

use crate::cli::{CliArgs, CliMode};

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status for an invalid invocation.
const INVALID_INVOCATION: i32 = -1;

fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("warn")).try_init()?;

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(INVALID_INVOCATION);
        }
    };
    info!("{CRATE_NAME} {CRATE_VERSION}");
    info!(
        "Summarising {} results under {}",
        Mode::from(args.mode),
        args.root.display()
    );

    let report = match args.mode {
        CliMode::Correctness => {
            let report = summarize_correctness(&args.root)?;
            debug!("Compiled {} scenario rows", report.rows.len());
            println!("{}", table::correctness_table(&report));
            Report::Correctness(report)
        }
        CliMode::Performance => {
            let report = summarize_performance(&args.root, args.missing_trials())?;
            debug!(
                "Compiled {} suites, {} without data",
                report.suites.len(),
                report.empty_suites.len()
            );
            print!("{}", table::performance_tables(&report));
            Report::Performance(report)
        }
    };

    if let Some(path) = &args.json_report {
        debug!("Writing JSON report to {}", path.display());
        write_report(&report, path)
            .with_context(|| format!("Writing JSON report to {}", path.display()))?;
    }

    Ok(())
}
