use super::{ComponentKind, Layout, ModuleDescriptor, ModuleEvent, Props};
use crate::views::ViewGroup;
use serde_json::json;
use workbench_protocol::{DataStore, PartialScenario, PcpSelections, Scenario};

pub const ID: &str = "pcp";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(
        ID,
        "Parallel Coordinates Plot",
        ComponentKind::ParallelCoordinates,
        ViewGroup::KeyDrivers,
    )
    .with_layout(Layout::FullWidth)
    .with_explanation(
        "This plot shows relationships between model inputs and LCOH. Each line represents one \
         model run, allowing for visual filtering and correlation analysis. Note: This plot is \
         interactive. Try selecting a range of values on one axis.",
    )
    .with_props(json!({"colorKey": "LCOH"}))
    .with_mapper(map_props)
    .with_updater(update)
}

fn map_props(data: &DataStore, state: &Scenario) -> Props {
    let (runs, keys) = match &data.pcp {
        Some(pcp) => (
            pcp.data.clone(),
            pcp.axes.iter().map(|a| a.name.clone()).collect::<Vec<_>>(),
        ),
        None => (Vec::new(), Vec::new()),
    };
    let mut props = Props::new();
    props.insert("data".to_string(), json!(runs));
    props.insert("keys".to_string(), json!(keys));
    props.insert("selections".to_string(), json!(state.pcp_selections));
    props
}

fn update(event: &ModuleEvent) -> Option<PartialScenario> {
    let selections = match event {
        ModuleEvent::SelectionChanged(selections) => selections.clone(),
        ModuleEvent::SelectionCleared => PcpSelections::new(),
    };
    Some(PartialScenario::default().with_pcp_selections(selections))
}
