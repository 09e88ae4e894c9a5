use wafl_summary_model::ScenarioId;

/// Label used for scenarios missing from [KNOWN_BUGS].
pub const UNLABELED: &str = "unlabeled";

/// Known scenarios: `(benchmark, test, bug label, issue tracker id)`.
///
/// An issue id of `None` means the bug was never filed upstream.
const KNOWN_BUGS: &[(&str, &str, &str, Option<u32>)] = &[
    ("sshnet", "SessionTest_Connected_ServerAndClientDisconnectRace", "Bug-1", Some(80)),
    ("sshnet", "Expect_Regex_RacesWithDispose", "Bug-2", Some(453)),
    ("nsubstitute", "Issue205", "Bug-3", Some(205)),
    ("nsubstitute", "Issue573", "Bug-4", Some(573)),
    ("fluentassertions", "Issue664", "Bug-6", Some(664)),
    ("fluentassertions", "Issue862", "Bug-7", Some(862)),
    ("kubernetes", "TestWatchWithHandlers", "Bug-9", Some(360)),
    ("applicationinsights", "Issue1106", "Bug-10", Some(1106)),
    ("netmq", "Issue814", "Bug-11", Some(814)),
    ("applicationinsights", "SendingLogicMarkedAsInternalSdkOperation", "Bug-14", Some(2261)),
    ("netmq", "EnqueueShouldNotBlockWhenCapacityIsZero", "Bug-15", Some(975)),
    ("mqttnet", "Will_Message_Send_Race", "Bug-16", Some(1187)),
    ("mqttnet", "Manage_Session_MaxParallel_Subscribe", "Bug-17", Some(1188)),
    ("kubernetes", "SendDataRemoteCommand", "Bug-18", None),
];

/// Human readable identity of a scenario's bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BugLabel {
    pub label: &'static str,
    pub issue: Option<u32>,
}

impl BugLabel {
    pub fn unlabeled() -> Self {
        Self {
            label: UNLABELED,
            issue: None,
        }
    }

    pub fn is_unlabeled(&self) -> bool {
        self.label == UNLABELED
    }
}

/// Look a scenario up in the catalogue.
pub fn lookup(scenario: &ScenarioId) -> Option<BugLabel> {
    KNOWN_BUGS
        .iter()
        .find(|(benchmark, test, _, _)| *benchmark == scenario.benchmark && *test == scenario.test)
        .map(|(_, _, label, issue)| BugLabel {
            label: *label,
            issue: *issue,
        })
}

/// Like [lookup], but unknown scenarios are reported as [UNLABELED] instead of failing.
pub fn label_for(scenario: &ScenarioId) -> BugLabel {
    lookup(scenario).unwrap_or_else(|| {
        log::warn!("Scenario {scenario} is not in the bug catalogue, reporting it as {UNLABELED}");
        BugLabel::unlabeled()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_scenario() {
        let label = lookup(&ScenarioId::new("netmq", "Issue814")).unwrap();
        assert_eq!(label.label, "Bug-11");
        assert_eq!(label.issue, Some(814));
    }

    #[test]
    fn scenario_without_issue() {
        let label = lookup(&ScenarioId::new("kubernetes", "SendDataRemoteCommand")).unwrap();
        assert_eq!(label.issue, None);
    }

    #[test]
    fn unknown_scenario_is_unlabeled() {
        let scenario = ScenarioId::new("netmq", "BrandNewRace");
        assert_eq!(lookup(&scenario), None);
        assert!(label_for(&scenario).is_unlabeled());
    }

    #[test]
    fn benchmark_must_match_too() {
        assert_eq!(lookup(&ScenarioId::new("sshnet", "Issue814")), None);
    }

    #[test]
    fn labels_are_unique() {
        let mut labels = KNOWN_BUGS.iter().map(|(_, _, l, _)| *l).collect::<Vec<_>>();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), KNOWN_BUGS.len());
    }
}
