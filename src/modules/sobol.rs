use super::{ComponentKind, ModuleDescriptor, Props};
use crate::views::ViewGroup;
use serde_json::json;
use workbench_protocol::{DataStore, Scenario, SobolIndex};

pub const ID: &str = "sobol";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(
        ID,
        "Sobol Indices (True Model)",
        ComponentKind::BarChart,
        ViewGroup::KeyDrivers,
    )
    .with_explanation(
        "Sobol indices measure sensitivity, i.e. how much the output variance depends on each \
         input parameter, separating direct effects (S1) from total effects including \
         interactions (ST).",
    )
    .with_props(json!({
        "yKey": "param",
        "xKeys": ["S1", "ST"],
        "xLabel": "Sobol Index Value",
        "showLegend": true,
        "legendLabels": {"S1": "S1 (First-order)", "ST": "ST (Total-order)"},
        "errorBarKeys": {"S1": "S1_conf", "ST": "ST_conf"}
    }))
    .with_mapper(map_props)
}

/// Indices ordered by total effect, largest first. Ties keep payload order.
pub fn sorted_indices(data: &DataStore) -> Vec<SobolIndex> {
    let mut indices = data
        .sobol
        .as_ref()
        .map(|s| s.indices.clone())
        .unwrap_or_default();
    indices.sort_by(|a, b| b.st.total_cmp(&a.st));
    indices
}

fn map_props(data: &DataStore, _state: &Scenario) -> Props {
    let mut props = Props::new();
    props.insert("data".to_string(), json!(sorted_indices(data)));
    props
}
