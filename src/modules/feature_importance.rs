use super::{ComponentKind, ModuleDescriptor, Props};
use crate::views::ViewGroup;
use serde_json::json;
use workbench_protocol::{DataStore, Scenario};

pub const ID: &str = "feature-importance";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(
        ID,
        "Feature Importance (Surrogate)",
        ComponentKind::BarChart,
        ViewGroup::SurrogateModel,
    )
    .with_explanation(
        "This chart ranks input parameters by their contribution to the surrogate model's \
         predictions, indicating which factors the model relies on most.",
    )
    .with_props(json!({
        "xKeys": ["importance"],
        "yKey": "feature",
        "xLabel": "Normalized Permutation Importance",
        "showLegend": false,
        "errorBarKeys": {"importance": "importance_conf"}
    }))
    .with_mapper(map_props)
}

fn map_props(data: &DataStore, _state: &Scenario) -> Props {
    let rows = data
        .feature_importance
        .as_ref()
        .map(|f| f.data.clone())
        .unwrap_or_default();
    let mut props = Props::new();
    props.insert("data".to_string(), json!(rows));
    props
}
