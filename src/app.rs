use std::{path::Path, sync::Arc};

use crate::{
    config::WorkbenchConfig,
    error::{ErrorCode, WorkbenchError},
    format,
    model,
    modules::{Layout, ModuleDescriptor, ModuleEvent, ModuleRegistry, builtin_sources},
    persistence::ScenarioPersistence,
    prompt::NativePrompt,
    storage::FileStorage,
    store::{ScenarioStore, Transition},
    views::{ActiveView, ViewGroup, ViewRegistry, report_modules},
};
use eframe::egui::{self, Ui};
use tracing::{debug, error, info, warn};
use workbench_protocol::DataStore;

/// Reads the analysis payload the modules are mapped from. Unreadable
/// sections are logged and left empty.
pub fn load_data_store(path: &Path) -> Result<DataStore, WorkbenchError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        WorkbenchError::new(
            ErrorCode::Io,
            format!("Could not read payload '{}': {e}", path.display()),
        )
    })?;
    let (data, skipped) = DataStore::from_json_sections(&text).map_err(|e| {
        WorkbenchError::new(
            ErrorCode::InvalidInput,
            format!("Could not parse payload '{}': {e}", path.display()),
        )
    })?;
    for section in skipped {
        warn!(
            payload = %path.display(),
            section = section.section,
            "payload section is malformed, leaving it empty: {}",
            section.message
        );
    }
    Ok(data)
}

pub struct WorkbenchApp {
    store: ScenarioStore,
    modules: ModuleRegistry,
    views: ViewRegistry,
    data: DataStore,
    active_view: ActiveView,
    scenario_name: String,
    selected: Option<String>,
}

impl WorkbenchApp {
    pub fn new(config: &WorkbenchConfig) -> Self {
        let data = match load_data_store(&config.payload_path) {
            Ok(data) => data,
            Err(e) => {
                error!("{e}");
                DataStore::default()
            }
        };
        let active_view = ActiveView::default();
        let persistence = ScenarioPersistence::new(
            FileStorage::new(&config.storage_dir),
            &config.storage_key,
        );
        let store = ScenarioStore::new(persistence, NativePrompt, active_view.clone());
        Self::from_parts(store, data, &config.view_order)
    }

    /// Initializes `store` with the model's default scenario. The store must
    /// have been created with the same `ActiveView` handle the app navigates.
    pub fn from_parts(mut store: ScenarioStore, data: DataStore, view_order: &[ViewGroup]) -> Self {
        store.initialize(&model::default_scenario());
        let modules = ModuleRegistry::build(builtin_sources());
        let views = ViewRegistry::build(&modules, view_order);
        info!(
            modules = modules.len(),
            views = views.navigation().len(),
            "workbench ready"
        );
        Self {
            active_view: store.active_view().clone(),
            store,
            modules,
            views,
            data,
            scenario_name: String::new(),
            selected: None,
        }
    }

    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    fn title(&self) -> String {
        let name = self
            .store
            .active_scenario_name()
            .unwrap_or("Unsaved scenario");
        if self.store.is_dirty() {
            format!("{name}*")
        } else {
            name.to_string()
        }
    }

    fn render_navigation(&mut self, ui: &mut Ui) {
        let current = self.active_view.get();
        for view in self.views.navigation().to_vec() {
            if ui.selectable_label(current == view, view.label()).clicked() {
                self.active_view.set(view);
            }
        }
    }

    fn render_scenario_controls(&mut self, ui: &mut Ui) {
        ui.strong(self.title());
        ui.separator();

        ui.add(
            egui::TextEdit::singleline(&mut self.scenario_name)
                .hint_text("Scenario name")
                .desired_width(140.0),
        );
        let can_save = !self.scenario_name.trim().is_empty();
        if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
            self.save_named();
        }
        if ui.button("New").clicked() && self.store.new_scenario().applied() {
            self.scenario_name.clear();
        }

        let names: Vec<String> = self
            .store
            .scenario_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        egui::ComboBox::from_id_salt("saved_scenarios")
            .selected_text(self.selected.as_deref().unwrap_or("Saved scenarios"))
            .show_ui(ui, |ui| {
                for name in &names {
                    ui.selectable_value(&mut self.selected, Some(name.clone()), name);
                }
            });
        let has_selection = self.selected.is_some();
        if ui.add_enabled(has_selection, egui::Button::new("Load")).clicked() {
            self.load_selected();
        }
        if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
            self.delete_selected();
        }
    }

    fn save_named(&mut self) -> Transition {
        let outcome = self.store.save_current_scenario(&self.scenario_name);
        if outcome.applied() {
            self.selected = self.store.active_scenario_name().map(str::to_string);
        }
        outcome
    }

    fn load_selected(&mut self) -> Transition {
        let Some(choice) = self.selected.clone() else {
            return Transition::Ignored;
        };
        let outcome = self.store.load_scenario(&choice);
        if outcome.applied() {
            self.scenario_name = choice;
        } else {
            debug!(scenario = %choice, ?outcome, "load not applied");
        }
        outcome
    }

    /// Deletes the selected entry, active or not.
    fn delete_selected(&mut self) -> Transition {
        let Some(choice) = self.selected.clone() else {
            return Transition::Ignored;
        };
        let outcome = self.store.delete_scenario(&choice);
        if outcome.applied() {
            self.selected = None;
            if self.store.active_scenario_name().is_none() {
                self.scenario_name.clear();
            }
        }
        outcome
    }

    fn render_parameters(&mut self, ui: &mut Ui) {
        ui.heading("Parameters");
        let Some(state) = self.store.working_state() else {
            ui.label("Loading scenario...");
            return;
        };
        let parameters = state.parameters.clone();
        for (name, range) in model::parameter_ranges() {
            let mut value = parameters.get(name).copied().unwrap_or(range.default);
            ui.label(name);
            let slider = egui::Slider::new(&mut value, range.min..=range.max).step_by(range.step);
            if ui.add(slider).changed() {
                self.store.set_parameter(name, value);
            }
        }

        ui.separator();
        ui.heading("Modeled LCOH");
        match self.store.modeled_output() {
            Some(Ok(lcoh)) => {
                ui.label(format!("{} per MWh", format::com(Some(lcoh))));
            }
            Some(Err(e)) => {
                ui.colored_label(egui::Color32::RED, e.to_string());
            }
            None => {
                ui.label(format::sig(None, 3));
            }
        }
    }

    fn render_report(&mut self, ui: &mut Ui) {
        let Some(state) = self.store.working_state() else {
            return;
        };
        let mut narrative = state.narrative.clone();
        let pinned = state.pinned.clone();

        ui.heading("Narrative");
        let response = ui.add(
            egui::TextEdit::multiline(&mut narrative)
                .hint_text("Describe this scenario")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.store.set_narrative(&narrative);
        }

        ui.separator();
        let report = report_modules(&self.modules, &pinned);
        if report.is_empty() {
            ui.weak("Pin modules from the other views to build a report.");
        }
        for descriptor in report {
            self.render_module(ui, &descriptor);
        }
    }

    fn render_view(&mut self, ui: &mut Ui, view: ViewGroup) {
        let modules: Vec<Arc<ModuleDescriptor>> = self.views.modules(view).to_vec();
        if modules.is_empty() {
            ui.weak("No modules in this view.");
        }
        for descriptor in modules {
            self.render_module(ui, &descriptor);
        }
    }

    fn render_module(&mut self, ui: &mut Ui, descriptor: &ModuleDescriptor) {
        let Some(state) = self.store.working_state() else {
            return;
        };
        let props = descriptor.render_props(&self.data, state);
        let width = match descriptor.layout {
            Layout::Default => ui.available_width() / 2.0,
            Layout::FullWidth => ui.available_width(),
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_max_width(width);
            ui.horizontal(|ui| {
                ui.strong(&descriptor.title);
                let mut pinned = self.store.is_pinned(&descriptor.id);
                if ui.checkbox(&mut pinned, "Pin to report").changed() {
                    if pinned {
                        self.store.pin(&descriptor.id, &descriptor.title);
                    } else {
                        self.store.unpin(&descriptor.id);
                    }
                }
                if descriptor.handles_events() && ui.button("Clear selection").clicked() {
                    self.store
                        .apply_event(&self.modules, &descriptor.id, &ModuleEvent::SelectionCleared);
                }
            });
            if !descriptor.explanation.is_empty() {
                ui.label(&descriptor.explanation);
            }
            ui.collapsing(format!("{:?} props", descriptor.component), |ui| {
                let text = serde_json::to_string_pretty(&props).unwrap_or_default();
                egui::ScrollArea::vertical()
                    .id_salt(&descriptor.id)
                    .max_height(240.0)
                    .show(ui, |ui| ui.monospace(text));
            });
        });
        ui.add_space(8.0);
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                self.render_navigation(ui);
                ui.separator();
                self.render_scenario_controls(ui);
            });
        });

        egui::SidePanel::left("parameters")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.render_parameters(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let view = self.active_view.get();
            ui.heading(view.label());
            egui::ScrollArea::vertical().show(ui, |ui| match view {
                ViewGroup::Report => self.render_report(ui),
                other => self.render_view(ui, other),
            });
        });
    }
}
