use super::{ComponentKind, ModuleDescriptor, Props};
use crate::views::ViewGroup;
use serde_json::{Value, json};
use workbench_protocol::{DataStore, Scenario};

pub const ID: &str = "model-card";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(
        ID,
        "Model Card (Surrogate)",
        ComponentKind::ModelCard,
        ViewGroup::SurrogateModel,
    )
    .with_explanation(
        "We train a surrogate when the original model is slow or otherwise costly to evaluate. \
         Below: key metadata and performance metrics.",
    )
    .with_mapper(map_props)
}

fn map_props(data: &DataStore, _state: &Scenario) -> Props {
    let card = data
        .model_card
        .as_ref()
        .map(|card| json!(card))
        .unwrap_or_else(|| Value::Object(Props::new()));
    let mut props = Props::new();
    props.insert("data".to_string(), card);
    props
}
