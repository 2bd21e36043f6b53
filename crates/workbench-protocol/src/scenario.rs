use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter name to value.
pub type Parameters = BTreeMap<String, f64>;

/// Inclusive `[min, max]` brush range on one parallel-coordinates axis.
pub type SelectionRange = [f64; 2];

/// Axis name to selected range.
pub type PcpSelections = BTreeMap<String, SelectionRange>;

/// Scenario name to scenario. This whole map is the unit of persistence.
pub type ScenarioMap = BTreeMap<String, Scenario>;

/// Reference from a scenario's report to a module descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedRef {
    pub id: String,
    pub title: String,
}

impl PinnedRef {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub parameters: Parameters,
    pub narrative: String,
    pub pinned: Vec<PinnedRef>,
    pub pcp_selections: PcpSelections,
}

impl Scenario {
    /// Shallow merge: every field present in `patch` replaces the whole field.
    pub fn apply_patch(&mut self, patch: PartialScenario) {
        if let Some(parameters) = patch.parameters {
            self.parameters = parameters;
        }
        if let Some(narrative) = patch.narrative {
            self.narrative = narrative;
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
        if let Some(pcp_selections) = patch.pcp_selections {
            self.pcp_selections = pcp_selections;
        }
    }
}

/// A scenario with any subset of its fields. Used both for stored entries that
/// predate newer fields and for working-state patches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialScenario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<Vec<PinnedRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcp_selections: Option<PcpSelections>,
}

impl PartialScenario {
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_narrative(mut self, narrative: &str) -> Self {
        self.narrative = Some(narrative.to_string());
        self
    }

    pub fn with_pinned(mut self, pinned: Vec<PinnedRef>) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn with_pcp_selections(mut self, selections: PcpSelections) -> Self {
        self.pcp_selections = Some(selections);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_none()
            && self.narrative.is_none()
            && self.pinned.is_none()
            && self.pcp_selections.is_none()
    }
}

impl From<Scenario> for PartialScenario {
    fn from(scenario: Scenario) -> Self {
        Self {
            parameters: Some(scenario.parameters),
            narrative: Some(scenario.narrative),
            pinned: Some(scenario.pinned),
            pcp_selections: Some(scenario.pcp_selections),
        }
    }
}
