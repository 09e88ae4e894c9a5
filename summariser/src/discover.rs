use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;
use wafl_summary_model::{Mode, Policy, ScenarioId};

/// File name of the per-trial run log.
pub const RUN_LOG_FILE: &str = "Wafl.log";
/// Marker in the file name of delay stats logs, `Stats-<timestamp>.log`.
pub const STATS_LOG_MARKER: &str = "Stats-";

/// `<root>/Results/<mode>`, the top of a results tree.
///
/// The tree below is fixed: `<benchmark>/<scenario>/<policy>/<trial>/`.
#[derive(Debug, Clone)]
pub struct ResultsTree {
    pub path: PathBuf,
}

impl ResultsTree {
    pub fn open(root: &Path, mode: Mode) -> anyhow::Result<Self> {
        let path = root.join("Results").join(mode.dir_name());
        if !path.is_dir() {
            anyhow::bail!("Results directory not found: {}", path.display());
        }
        log::debug!("Reading {mode} results from {}", path.display());
        Ok(Self { path })
    }

    pub fn benchmarks(&self) -> anyhow::Result<Vec<BenchmarkDir>> {
        Ok(subdirectories(&self.path)?
            .into_iter()
            .map(|(name, path)| BenchmarkDir { name, path })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkDir {
    pub name: String,
    pub path: PathBuf,
}

impl BenchmarkDir {
    pub fn scenarios(&self) -> anyhow::Result<Vec<ScenarioDir>> {
        Ok(subdirectories(&self.path)?
            .into_iter()
            .map(|(test, path)| ScenarioDir {
                id: ScenarioId::new(self.name.clone(), test),
                path,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioDir {
    pub id: ScenarioId,
    pub path: PathBuf,
}

impl ScenarioDir {
    /// The policy's directory, if it was run for this scenario.
    pub fn policy(&self, policy: Policy) -> Option<PolicyDir> {
        let path = self.path.join(policy.dir_name());
        path.is_dir().then_some(PolicyDir { policy, path })
    }

    /// Policies without a directory.
    pub fn missing_policies(&self) -> Vec<Policy> {
        Policy::ALL
            .into_iter()
            .filter(|policy| self.policy(*policy).is_none())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PolicyDir {
    pub policy: Policy,
    pub path: PathBuf,
}

impl PolicyDir {
    pub fn trials(&self) -> anyhow::Result<Vec<TrialDir>> {
        Ok(subdirectories(&self.path)?
            .into_iter()
            .map(|(name, path)| TrialDir { name, path })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct TrialDir {
    pub name: String,
    pub path: PathBuf,
}

impl TrialDir {
    /// Path of the run log, if the trial produced one.
    pub fn run_log(&self) -> Option<PathBuf> {
        let path = self.path.join(RUN_LOG_FILE);
        path.is_file().then_some(path)
    }

    /// Every delay stats log in the trial.
    pub fn stats_logs(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(entries(&self.path)?
            .into_iter()
            .filter(|(name, path)| name.contains(STATS_LOG_MARKER) && path.is_file())
            .map(|(_, path)| path)
            .collect())
    }
}

/// Immediate subdirectories of `path`, sorted by name.
fn subdirectories(path: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    Ok(entries(path)?
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .collect())
}

fn entries(path: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.with_context(|| format!("Failed to list {}", path.display()))?;
            Ok((
                entry.file_name().to_string_lossy().into_owned(),
                entry.into_path(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("Results/performance/netmq/Issue814");
        for policy in ["original", "wafl"] {
            for trial in ["TRIAL-2", "TRIAL-1"] {
                fs::create_dir_all(scenario.join(policy).join(trial)).unwrap();
            }
        }
        fs::create_dir_all(scenario.join("notes")).unwrap();
        let trial = scenario.join("wafl/TRIAL-1");
        fs::write(trial.join(RUN_LOG_FILE), b"").unwrap();
        fs::write(trial.join("Stats-20240101.log"), b"").unwrap();
        fs::write(trial.join("Other.log"), b"").unwrap();
        fs::write(dir.path().join("Results/performance/README.md"), b"").unwrap();
        dir
    }

    #[test]
    fn missing_results_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ResultsTree::open(dir.path(), Mode::Correctness).is_err());
    }

    #[test]
    fn walks_fixed_layout() -> anyhow::Result<()> {
        let dir = make_tree();
        let tree = ResultsTree::open(dir.path(), Mode::Performance)?;

        let benchmarks = tree.benchmarks()?;
        assert_eq!(benchmarks.len(), 1);
        assert_eq!(benchmarks[0].name, "netmq");

        let scenarios = benchmarks[0].scenarios()?;
        assert_eq!(scenarios.len(), 1);
        let scenario = &scenarios[0];
        assert_eq!(scenario.id, ScenarioId::new("netmq", "Issue814"));
        assert_eq!(scenario.missing_policies(), vec![Policy::WaflBasic]);

        let wafl = scenario.policy(Policy::Wafl).unwrap();
        let trials = wafl.trials()?;
        let names = trials.iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["TRIAL-1", "TRIAL-2"]);

        assert!(trials[0].run_log().is_some());
        assert!(trials[1].run_log().is_none());
        let stats = trials[0].stats_logs()?;
        assert_eq!(stats.len(), 1);
        assert!(stats[0].ends_with("Stats-20240101.log"));
        Ok(())
    }
}
