use crate::persistence::StoredScenarios;
use workbench_protocol::{PartialScenario, Scenario, ScenarioMap};

/// Back-fills a possibly incomplete stored scenario from the canonical default.
///
/// Fields present in `stored` win, absent ones come from `canonical_default`.
/// `parameters` is merged key by key, so parameters introduced after a scenario
/// was saved show up with their default value while tuned ones are kept.
pub fn normalize(stored: &PartialScenario, canonical_default: &Scenario) -> Scenario {
    let mut parameters = canonical_default.parameters.clone();
    if let Some(stored_parameters) = &stored.parameters {
        parameters.extend(
            stored_parameters
                .iter()
                .map(|(name, value)| (name.clone(), *value)),
        );
    }
    Scenario {
        parameters,
        narrative: stored
            .narrative
            .clone()
            .unwrap_or_else(|| canonical_default.narrative.clone()),
        pinned: stored
            .pinned
            .clone()
            .unwrap_or_else(|| canonical_default.pinned.clone()),
        pcp_selections: stored
            .pcp_selections
            .clone()
            .unwrap_or_else(|| canonical_default.pcp_selections.clone()),
    }
}

pub fn normalize_all(stored: &StoredScenarios, canonical_default: &Scenario) -> ScenarioMap {
    stored
        .iter()
        .map(|(name, scenario)| (name.clone(), normalize(scenario, canonical_default)))
        .collect()
}
