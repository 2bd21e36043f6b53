use super::{ComponentKind, ModuleDescriptor, Props};
use crate::views::ViewGroup;
use serde_json::json;
use workbench_protocol::{DataStore, Scenario};

pub const ID: &str = "residuals";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(
        ID,
        "Residuals vs. Fitted (Surrogate)",
        ComponentKind::ScatterPlot,
        ViewGroup::SurrogateModel,
    )
    .with_explanation(
        "Residuals are the errors between the surrogate model's predictions and the true \
         model's outputs. A random, patternless scatter indicates a well-fitted model.",
    )
    .with_props(json!({
        "xKey": "fitted",
        "yKey": "residual",
        "xLabel": "Fitted LCOH Values",
        "yLabel": "LCOH Residuals"
    }))
    .with_mapper(map_props)
}

fn map_props(data: &DataStore, _state: &Scenario) -> Props {
    let points = data
        .residuals
        .as_ref()
        .map(|r| r.data.clone())
        .unwrap_or_default();
    let mut props = Props::new();
    props.insert("data".to_string(), json!(points));
    props
}
