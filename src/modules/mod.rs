//! Analysis module descriptors and the registry that aggregates them.
//!
//! Each module is described once, independently of the others. A descriptor
//! source contributes either one primary descriptor, named collections of
//! descriptors, or both; the registry flattens every source into one table
//! keyed by id, later registrations replacing earlier ones.

pub mod feature_importance;
pub mod model_card;
pub mod pcp;
pub mod residuals;
pub mod sobol;
pub mod static_data;

use crate::views::ViewGroup;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;
use workbench_protocol::{DataStore, PartialScenario, PcpSelections, Scenario};

/// Render input record handed to a display component.
pub type Props = Map<String, Value>;

/// Derives props from the analysis payload and the working scenario. Must not
/// panic on missing payload sections.
pub type Mapper = fn(&DataStore, &Scenario) -> Props;

/// Turns a UI event into a working-state patch, or `None` to ignore it.
pub type Updater = fn(&ModuleEvent) -> Option<PartialScenario>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Default,
    FullWidth,
}

/// Display components live outside the core; descriptors only name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    BarChart,
    ScatterPlot,
    ParallelCoordinates,
    ModelCard,
    StaticDataItem,
    BenchmarkTable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleEvent {
    /// Brush ranges on the parallel-coordinates axes changed.
    SelectionChanged(PcpSelections),
    SelectionCleared,
}

#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub id: String,
    pub title: String,
    pub component: ComponentKind,
    pub layout: Layout,
    pub view: ViewGroup,
    pub explanation: String,
    pub props: Props,
    pub mapper: Option<Mapper>,
    pub updater: Option<Updater>,
}

impl ModuleDescriptor {
    pub fn new(id: &str, title: &str, component: ComponentKind, view: ViewGroup) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            component,
            layout: Layout::Default,
            view,
            explanation: String::new(),
            props: Props::new(),
            mapper: None,
            updater: None,
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = explanation.to_string();
        self
    }

    /// Non-object values are ignored.
    pub fn with_props(mut self, props: Value) -> Self {
        if let Value::Object(props) = props {
            self.props = props;
        }
        self
    }

    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub fn with_updater(mut self, updater: Updater) -> Self {
        self.updater = Some(updater);
        self
    }

    pub fn derives_props(&self) -> bool {
        self.mapper.is_some()
    }

    pub fn handles_events(&self) -> bool {
        self.updater.is_some()
    }

    /// Static props overlaid with whatever the mapper derives.
    pub fn render_props(&self, data: &DataStore, state: &Scenario) -> Props {
        let mut props = self.props.clone();
        if let Some(mapper) = self.mapper {
            props.extend(mapper(data, state));
        }
        props
    }

    pub fn handle_event(&self, event: &ModuleEvent) -> Option<PartialScenario> {
        self.updater.and_then(|updater| updater(event))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderInput {
    pub component: ComponentKind,
    pub props: Props,
}

#[derive(Debug, Clone)]
pub struct DescriptorCollection {
    pub name: String,
    pub entries: Vec<ModuleDescriptor>,
}

/// What one module definition unit contributes to the registry.
#[derive(Debug, Clone)]
pub struct DescriptorSource {
    pub origin: String,
    pub primary: Option<ModuleDescriptor>,
    pub collections: Vec<DescriptorCollection>,
}

impl DescriptorSource {
    pub fn primary(origin: &str, descriptor: ModuleDescriptor) -> Self {
        Self {
            origin: origin.to_string(),
            primary: Some(descriptor),
            collections: Vec::new(),
        }
    }

    pub fn collection(origin: &str, name: &str, entries: Vec<ModuleDescriptor>) -> Self {
        Self {
            origin: origin.to_string(),
            primary: None,
            collections: Vec::new(),
        }
        .with_collection(name, entries)
    }

    pub fn with_collection(mut self, name: &str, entries: Vec<ModuleDescriptor>) -> Self {
        self.collections.push(DescriptorCollection {
            name: name.to_string(),
            entries,
        });
        self
    }
}

/// Flat id-to-descriptor table in registration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    table: IndexMap<String, Arc<ModuleDescriptor>>,
}

impl ModuleRegistry {
    /// Pure in its inputs: building twice from the same sources yields the same
    /// table. Descriptors without an id are reported and skipped.
    pub fn build<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = DescriptorSource>,
    {
        let mut table: IndexMap<String, Arc<ModuleDescriptor>> = IndexMap::new();
        for source in sources {
            let DescriptorSource {
                origin,
                primary,
                collections,
            } = source;
            let named = collections.into_iter().flat_map(|DescriptorCollection { name, entries }| {
                entries.into_iter().map(move |d| (name.clone(), d))
            });
            let entries = primary
                .map(|d| ("primary".to_string(), d))
                .into_iter()
                .chain(named);
            for (slot, mut descriptor) in entries {
                let id = descriptor.id.trim().to_string();
                if id.is_empty() {
                    warn!(
                        origin = %origin,
                        slot = %slot,
                        title = %descriptor.title,
                        "module descriptor has no id, skipping"
                    );
                    continue;
                }
                descriptor.id = id.clone();
                table.insert(id, Arc::new(descriptor));
            }
        }
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.table.get(id).map(Arc::as_ref)
    }

    pub fn get_shared(&self, id: &str) -> Option<Arc<ModuleDescriptor>> {
        self.table.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<ModuleDescriptor>> {
        self.table.values()
    }

    pub fn render_input(&self, id: &str, data: &DataStore, state: &Scenario) -> Option<RenderInput> {
        self.get(id).map(|d| RenderInput {
            component: d.component,
            props: d.render_props(data, state),
        })
    }

    /// `None` when the module is unknown, has no updater, or ignores the event.
    pub fn dispatch(&self, id: &str, event: &ModuleEvent) -> Option<PartialScenario> {
        self.get(id)?.handle_event(event)
    }
}

/// Every module shipped with the workbench, in registration order.
pub fn builtin_sources() -> Vec<DescriptorSource> {
    vec![
        DescriptorSource::primary("feature-importance", feature_importance::descriptor()),
        DescriptorSource::primary("model-card", model_card::descriptor()),
        DescriptorSource::primary("pcp", pcp::descriptor()),
        DescriptorSource::primary("residuals", residuals::descriptor()),
        DescriptorSource::primary("sobol", sobol::descriptor()),
        DescriptorSource::collection("static-data", "staticData", static_data::collection()),
    ]
}
