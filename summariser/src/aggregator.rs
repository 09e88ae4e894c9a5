mod benchmark;
mod scenario;
mod trial;

pub use benchmark::{BenchmarkAggregator, SuiteOutcome};
pub use scenario::{slowdown, ScenarioAggregator, ScenarioSample};
pub use trial::{MissingTrials, TrialAggregator};
