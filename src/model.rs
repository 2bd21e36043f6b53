//! The techno-economic model the workbench explores: a levelized cost of heat
//! (LCOH) estimate from four plant parameters.

use thiserror::Error;
use workbench_protocol::{Parameters, Scenario};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid or missing parameter: '{0}'.")]
    MissingParameter(String),
    #[error("Parameter '{name}' must be finite, got {value}.")]
    NonFinite { name: String, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

pub const REQUIRED_PARAMETERS: [&str; 4] =
    ["capital_cost", "efficiency", "interest_rate", "fuel_cost"];

/// Slider ranges in display order.
pub fn parameter_ranges() -> Vec<(&'static str, ParameterRange)> {
    vec![
        (
            "capital_cost",
            ParameterRange {
                min: 1_000_000.0,
                max: 10_000_000.0,
                step: 100_000.0,
                default: 5_000_000.0,
            },
        ),
        (
            "efficiency",
            ParameterRange {
                min: 0.50,
                max: 0.95,
                step: 0.01,
                default: 0.75,
            },
        ),
        (
            "interest_rate",
            ParameterRange {
                min: 0.02,
                max: 0.12,
                step: 0.005,
                default: 0.05,
            },
        ),
        (
            "fuel_cost",
            ParameterRange {
                min: 5.0,
                max: 50.0,
                step: 1.0,
                default: 20.0,
            },
        ),
    ]
}

/// Every parameter at its default, no narrative, nothing pinned or selected.
pub fn default_scenario() -> Scenario {
    Scenario {
        parameters: parameter_ranges()
            .into_iter()
            .map(|(name, range)| (name.to_string(), range.default))
            .collect(),
        ..Scenario::default()
    }
}

fn required(params: &Parameters, name: &str) -> Result<f64, ModelError> {
    let value = *params
        .get(name)
        .ok_or_else(|| ModelError::MissingParameter(name.to_string()))?;
    if !value.is_finite() {
        return Err(ModelError::NonFinite {
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}

pub fn techno_economic_model(params: &Parameters) -> Result<f64, ModelError> {
    let capital_cost = required(params, "capital_cost")?;
    let efficiency = required(params, "efficiency")?;
    let interest_rate = required(params, "interest_rate")?;
    let fuel_cost = required(params, "fuel_cost")?;

    let base_lcoh = 100.0 + (capital_cost / 1e6) * 30.0 - (efficiency - 0.5) * 150.0
        + (efficiency - 0.5).powi(3) * 400.0;
    let finance_component = (interest_rate * 15.0).exp() * (1.0 + capital_cost / 7.5e6);
    let op_cost = fuel_cost * 25.0 * (1.0 / (0.1 + efficiency));
    let interaction = (fuel_cost * 0.2 + interest_rate * 50.0).cos() * 5.0;
    Ok(base_lcoh + finance_component + op_cost + interaction)
}
