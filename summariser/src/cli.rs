use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use wafl_summary_model::Mode;

use wafl_summariser::aggregator::MissingTrials;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    /// Bug triggering statistics per scenario.
    Correctness,
    /// Running times and injected delays per benchmark suite.
    Performance,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Correctness => Mode::Correctness,
            CliMode::Performance => Mode::Performance,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Which experiment results to summarise.
    #[arg(value_enum)]
    pub mode: CliMode,

    /// Directory containing `Results/`.
    #[arg(long, env = "WAFL_RESULTS_ROOT", default_value = "..")]
    pub root: PathBuf,

    /// Also write the computed report as JSON to this file.
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Average performance trials over those that produced a value only.
    #[arg(long)]
    pub exclude_missing_trials: bool,
}

impl CliArgs {
    pub fn missing_trials(&self) -> MissingTrials {
        if self.exclude_missing_trials {
            MissingTrials::Exclude
        } else {
            MissingTrials::CountAsZero
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parse_mode_and_defaults() {
        let args = CliArgs::try_parse_from(["wafl-summariser", "correctness"]).unwrap();
        assert_eq!(args.mode, CliMode::Correctness);
        assert_eq!(Mode::from(args.mode), Mode::Correctness);
        assert!(args.json_report.is_none());
        assert_eq!(args.missing_trials(), MissingTrials::CountAsZero);
    }

    #[test]
    fn parse_performance_options() {
        let args = CliArgs::try_parse_from([
            "wafl-summariser",
            "performance",
            "--root",
            "/data/experiments",
            "--json-report",
            "report.json",
            "--exclude-missing-trials",
        ])
        .unwrap();
        assert_eq!(args.mode, CliMode::Performance);
        assert_eq!(args.root, PathBuf::from("/data/experiments"));
        assert_eq!(args.json_report, Some(PathBuf::from("report.json")));
        assert_eq!(args.missing_trials(), MissingTrials::Exclude);
    }

    #[test]
    fn reject_invalid_invocations() {
        let err = CliArgs::try_parse_from(["wafl-summariser"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = CliArgs::try_parse_from(["wafl-summariser", "stress"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let err =
            CliArgs::try_parse_from(["wafl-summariser", "correctness", "performance"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn help_is_not_an_invalid_invocation() {
        let err = CliArgs::try_parse_from(["wafl-summariser", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
