use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Metadata and performance of the surrogate model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCard {
    pub model_type: String,
    pub normalized_test_rmse: f64,
    pub r2_score: f64,
    pub raw_test_rmse: f64,
    /// Absent when the model was loaded from disk instead of trained.
    pub training_time_seconds: Option<f64>,
    pub evaluation_speed_evals_per_sec: f64,
    pub test_samples: u64,
    pub training_samples: Option<u64>,
    pub n_estimators: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualPoint {
    pub fitted: f64,
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Residuals {
    pub data: Vec<ResidualPoint>,
    pub rmse: f64,
}

/// First-order and total-order Sobol indices of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SobolIndex {
    pub param: String,
    #[serde(rename = "S1")]
    pub s1: f64,
    #[serde(rename = "S1_conf", default)]
    pub s1_conf: f64,
    #[serde(rename = "ST")]
    pub st: f64,
    #[serde(rename = "ST_conf", default)]
    pub st_conf: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sobol {
    pub indices: Vec<SobolIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
    #[serde(default)]
    pub importance_conf: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureImportanceData {
    pub data: Vec<FeatureImportance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcpAxis {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

/// One model run: axis name to value.
pub type PcpDataPoint = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PcpData {
    pub axes: Vec<PcpAxis>,
    pub data: Vec<PcpDataPoint>,
}

/// The precomputed analysis payload. Every section is optional; mappers fall
/// back to empty values when one is missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataStore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_card: Option<ModelCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residuals: Option<Residuals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sobol: Option<Sobol>,
    #[serde(rename = "feature-importance", skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<FeatureImportanceData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcp: Option<PcpData>,
}

/// A payload section that was present but could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionError {
    pub section: &'static str,
    pub message: String,
}

impl DataStore {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        Self::from_json_sections(text).map(|(store, _)| store)
    }

    /// Reads each section on its own: a malformed section is left out and
    /// reported, the others still load. Fails only when `text` is not a JSON
    /// object.
    pub fn from_json_sections(text: &str) -> serde_json::Result<(Self, Vec<SectionError>)> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(sections) = value else {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "analysis payload must be a JSON object",
            ));
        };
        let mut errors = Vec::new();
        let store = Self {
            model_card: section(&sections, "model_card", &mut errors),
            residuals: section(&sections, "residuals", &mut errors),
            sobol: section(&sections, "sobol", &mut errors),
            feature_importance: section(&sections, "feature-importance", &mut errors),
            pcp: section(&sections, "pcp", &mut errors),
        };
        Ok((store, errors))
    }
}

fn section<T: DeserializeOwned>(
    sections: &Map<String, Value>,
    key: &'static str,
    errors: &mut Vec<SectionError>,
) -> Option<T> {
    match sections.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                errors.push(SectionError {
                    section: key,
                    message: e.to_string(),
                });
                None
            }
        },
    }
}
