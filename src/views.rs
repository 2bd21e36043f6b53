use crate::modules::{Layout, ModuleDescriptor, ModuleRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::debug;
use workbench_protocol::PinnedRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewGroup {
    /// Composed per scenario from pinned references; never holds modules.
    #[default]
    Report,
    #[serde(rename = "Key Drivers")]
    KeyDrivers,
    #[serde(rename = "Surrogate Model")]
    SurrogateModel,
    Data,
}

pub const DEFAULT_VIEW_ORDER: [ViewGroup; 4] = [
    ViewGroup::Report,
    ViewGroup::KeyDrivers,
    ViewGroup::SurrogateModel,
    ViewGroup::Data,
];

impl ViewGroup {
    pub fn label(self) -> &'static str {
        match self {
            Self::Report => "Report",
            Self::KeyDrivers => "Key Drivers",
            Self::SurrogateModel => "Surrogate Model",
            Self::Data => "Data",
        }
    }
}

/// Shared handle to the view group currently shown. Written by navigation and
/// by the scenario store after lifecycle transitions.
#[derive(Debug, Clone, Default)]
pub struct ActiveView {
    current: Arc<RwLock<ViewGroup>>,
}

impl ActiveView {
    pub fn new(initial: ViewGroup) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn get(&self) -> ViewGroup {
        self.current.read().map(|v| *v).unwrap_or_default()
    }

    pub fn set(&self, view: ViewGroup) {
        if let Ok(mut slot) = self.current.write() {
            *slot = view;
        }
    }
}

/// Module descriptors grouped by view, in navigation order. Rebuilt from the
/// module registry, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    navigation: Vec<ViewGroup>,
    buckets: IndexMap<ViewGroup, Vec<Arc<ModuleDescriptor>>>,
}

impl ViewRegistry {
    pub fn build(modules: &ModuleRegistry, view_order: &[ViewGroup]) -> Self {
        let mut navigation = Vec::with_capacity(view_order.len());
        let mut buckets: IndexMap<ViewGroup, Vec<Arc<ModuleDescriptor>>> = IndexMap::new();
        for view in view_order {
            if navigation.contains(view) {
                continue;
            }
            navigation.push(*view);
            if *view != ViewGroup::Report {
                buckets.insert(*view, Vec::new());
            }
        }

        for descriptor in modules.descriptors() {
            match buckets.get_mut(&descriptor.view) {
                Some(bucket) => bucket.push(descriptor.clone()),
                None => debug!(
                    module = %descriptor.id,
                    view = descriptor.view.label(),
                    "module view has no bucket, dropping"
                ),
            }
        }

        // Stable: default-layout entries first, registration order kept within each class.
        for bucket in buckets.values_mut() {
            bucket.sort_by_key(|d| d.layout == Layout::FullWidth);
        }

        Self {
            navigation,
            buckets,
        }
    }

    /// Every navigable view, including the report.
    pub fn navigation(&self) -> &[ViewGroup] {
        &self.navigation
    }

    /// Empty for the report and for views without a bucket.
    pub fn modules(&self, view: ViewGroup) -> &[Arc<ModuleDescriptor>] {
        self.buckets.get(&view).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> impl Iterator<Item = (ViewGroup, &[Arc<ModuleDescriptor>])> {
        self.buckets.iter().map(|(view, bucket)| (*view, bucket.as_slice()))
    }
}

/// Resolves a scenario's pinned references to descriptors in pin order.
/// References to modules that no longer exist are skipped.
pub fn report_modules(modules: &ModuleRegistry, pinned: &[PinnedRef]) -> Vec<Arc<ModuleDescriptor>> {
    pinned
        .iter()
        .filter_map(|pin| {
            let found = modules.get_shared(&pin.id);
            if found.is_none() {
                debug!(module = %pin.id, "pinned module is not registered");
            }
            found
        })
        .collect()
}
