//! Reads and writes the whole scenario collection as one JSON blob under a
//! single storage key. Stored entries are parsed leniently so a scenario saved
//! by an older build, or hand-edited into a bad shape, still loads.

use crate::{
    error::{ErrorCode, WorkbenchError},
    storage::KeyValueStorage,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};
use workbench_protocol::{Parameters, PartialScenario, PcpSelections, PinnedRef, ScenarioMap};

pub const DEFAULT_STORAGE_KEY: &str = "workbenchScenarios";

/// Stored scenarios before normalization; any field may be missing.
pub type StoredScenarios = BTreeMap<String, PartialScenario>;

pub struct ScenarioPersistence {
    storage: Box<dyn KeyValueStorage>,
    key: String,
}

impl ScenarioPersistence {
    pub fn new<S: KeyValueStorage + 'static>(storage: S, key: &str) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn try_load(&self) -> Result<StoredScenarios, WorkbenchError> {
        match self.storage.get_item(&self.key)? {
            Some(text) => parse_stored_scenarios(&text),
            None => Ok(StoredScenarios::new()),
        }
    }

    /// Never fails: a missing or corrupt blob yields an empty collection and an
    /// error event, so a damaged store cannot block startup.
    pub fn load(&self) -> StoredScenarios {
        match self.try_load() {
            Ok(scenarios) => {
                debug!(key = %self.key, count = scenarios.len(), "loaded stored scenarios");
                scenarios
            }
            Err(e) => {
                error!(key = %self.key, "could not load saved scenarios, starting empty: {e}");
                StoredScenarios::new()
            }
        }
    }

    /// Writes the entire map with one `set_item`. Failures are logged and
    /// returned; nothing in memory is touched here.
    pub fn save(&self, scenarios: &ScenarioMap) -> Result<(), WorkbenchError> {
        let result = serde_json::to_string(scenarios)
            .map_err(|e| {
                WorkbenchError::new(
                    ErrorCode::Internal,
                    format!("Could not serialize scenarios: {e}"),
                )
            })
            .and_then(|text| self.storage.set_item(&self.key, &text));
        if let Err(e) = &result {
            error!(key = %self.key, "could not save scenarios, changes may not be persisted: {e}");
        }
        result
    }
}

pub fn parse_stored_scenarios(text: &str) -> Result<StoredScenarios, WorkbenchError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        WorkbenchError::new(
            ErrorCode::InvalidInput,
            format!("Saved scenarios are not valid JSON: {e}"),
        )
    })?;
    let Value::Object(entries) = value else {
        return Err(WorkbenchError::new(
            ErrorCode::InvalidInput,
            "Saved scenarios must be a JSON object keyed by scenario name",
        ));
    };
    Ok(entries
        .iter()
        .map(|(name, entry)| (name.clone(), partial_from_value(name, entry)))
        .collect())
}

fn partial_from_value(name: &str, value: &Value) -> PartialScenario {
    let Value::Object(fields) = value else {
        warn!(scenario = name, "stored scenario is not an object, using defaults");
        return PartialScenario::default();
    };
    PartialScenario {
        parameters: field(name, fields, "parameters", parse_parameters),
        narrative: field(name, fields, "narrative", |v| v.as_str().map(str::to_string)),
        pinned: field(name, fields, "pinned", parse_pinned),
        pcp_selections: field(name, fields, "pcpSelections", parse_selections),
    }
}

fn field<T>(
    scenario: &str,
    fields: &Map<String, Value>,
    key: &str,
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = parse(value);
            if parsed.is_none() {
                warn!(scenario, field = key, "malformed stored field, using default");
            }
            parsed
        }
    }
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn parse_parameters(value: &Value) -> Option<Parameters> {
    let entries = value.as_object()?;
    Some(
        entries
            .iter()
            .filter_map(|(name, v)| finite(v).map(|v| (name.clone(), v)))
            .collect(),
    )
}

fn parse_pinned(value: &Value) -> Option<Vec<PinnedRef>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value::<PinnedRef>(item.clone()).ok())
            .collect(),
    )
}

fn parse_selections(value: &Value) -> Option<PcpSelections> {
    let entries = value.as_object()?;
    Some(
        entries
            .iter()
            .filter_map(|(axis, range)| match range.as_array()?.as_slice() {
                [min, max] => Some((axis.clone(), [finite(min)?, finite(max)?])),
                _ => None,
            })
            .collect(),
    )
}
