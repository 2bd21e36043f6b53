//! The scenario state engine.
//!
//! `ScenarioStore` is the single owner of the working scenario the whole UI
//! derives from, of the saved scenario collection, of the active scenario name
//! and of the dirty flag. Every lifecycle transition either commits completely
//! or leaves the store exactly as it was.
//!
//! Dirty flag: cleared by initialize, new, load, save and delete; set by every
//! working-state update.

use crate::{
    model::{self, ModelError},
    modules::{ModuleEvent, ModuleRegistry},
    normalize::normalize_all,
    persistence::ScenarioPersistence,
    prompt::Prompt,
    views::{ActiveView, ViewGroup},
};
use tracing::{debug, info};
use workbench_protocol::{PartialScenario, PinnedRef, Scenario, ScenarioMap};

/// What a lifecycle call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// Invalid request: store not initialized, blank name, unknown scenario.
    Ignored,
}

impl Transition {
    pub fn applied(self) -> bool {
        self == Self::Applied
    }
}

/// Read-only view of the store state.
#[derive(Debug, Clone, Copy)]
pub struct StoreSnapshot<'a> {
    pub scenarios: &'a ScenarioMap,
    pub working_state: Option<&'a Scenario>,
    pub active_scenario_name: Option<&'a str>,
    pub is_dirty: bool,
}

pub struct ScenarioStore {
    persistence: ScenarioPersistence,
    prompt: Box<dyn Prompt>,
    active_view: ActiveView,
    canonical_default: Option<Scenario>,
    scenarios: ScenarioMap,
    working_state: Option<Scenario>,
    active_scenario_name: Option<String>,
    is_dirty: bool,
}

impl ScenarioStore {
    /// The store starts uninitialized; call [`ScenarioStore::initialize`].
    pub fn new<P: Prompt + 'static>(
        persistence: ScenarioPersistence,
        prompt: P,
        active_view: ActiveView,
    ) -> Self {
        Self {
            persistence,
            prompt: Box::new(prompt),
            active_view,
            canonical_default: None,
            scenarios: ScenarioMap::new(),
            working_state: None,
            active_scenario_name: None,
            is_dirty: false,
        }
    }

    /// Loads and normalizes the saved scenarios and resets the working state to
    /// `default_scenario`. Safe to call again; the same persisted input always
    /// gives the same state.
    pub fn initialize(&mut self, default_scenario: &Scenario) {
        let canonical_default = default_scenario.clone();
        let stored = self.persistence.load();
        self.scenarios = normalize_all(&stored, &canonical_default);
        self.working_state = Some(canonical_default.clone());
        self.canonical_default = Some(canonical_default);
        self.active_scenario_name = None;
        self.is_dirty = false;
        info!(
            key = self.persistence.key(),
            scenarios = self.scenarios.len(),
            "scenario store initialized"
        );
    }

    pub fn is_ready(&self) -> bool {
        self.working_state.is_some()
    }

    pub fn scenarios(&self) -> &ScenarioMap {
        &self.scenarios
    }

    /// Sorted, since the map is ordered by name.
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.keys().map(String::as_str).collect()
    }

    pub fn working_state(&self) -> Option<&Scenario> {
        self.working_state.as_ref()
    }

    pub fn active_scenario_name(&self) -> Option<&str> {
        self.active_scenario_name.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn active_view(&self) -> &ActiveView {
        &self.active_view
    }

    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        StoreSnapshot {
            scenarios: &self.scenarios,
            working_state: self.working_state.as_ref(),
            active_scenario_name: self.active_scenario_name.as_deref(),
            is_dirty: self.is_dirty,
        }
    }

    /// Shallow merge: each field present in `partial` replaces the whole field.
    pub fn update_working_state(&mut self, partial: PartialScenario) -> Transition {
        let Some(working_state) = self.working_state.as_mut() else {
            return Transition::Ignored;
        };
        working_state.apply_patch(partial);
        self.is_dirty = true;
        Transition::Applied
    }

    pub fn new_scenario(&mut self) -> Transition {
        let Some(canonical_default) = self.canonical_default.clone() else {
            return Transition::Ignored;
        };
        if self.is_dirty
            && !self
                .prompt
                .confirm("You have unsaved changes. Discard them and start a new scenario?")
        {
            return Transition::Cancelled;
        }
        self.working_state = Some(canonical_default);
        self.active_scenario_name = None;
        self.is_dirty = false;
        self.active_view.set(ViewGroup::Report);
        debug!("started new scenario");
        Transition::Applied
    }

    pub fn load_scenario(&mut self, name: &str) -> Transition {
        let Some(scenario) = self.scenarios.get(name) else {
            return Transition::Ignored;
        };
        if self.is_dirty
            && !self.prompt.confirm(&format!(
                "You have unsaved changes. Discard them and load '{name}'?"
            ))
        {
            return Transition::Cancelled;
        }
        self.working_state = Some(scenario.clone());
        self.active_scenario_name = Some(name.to_string());
        self.is_dirty = false;
        self.active_view.set(ViewGroup::Report);
        debug!(scenario = name, "loaded scenario");
        Transition::Applied
    }

    /// Creates or overwrites `name` (trimmed) with the working state and
    /// persists the whole collection. A failed write is reported to the user
    /// but the in-memory save still stands.
    pub fn save_current_scenario(&mut self, name: &str) -> Transition {
        let name = name.trim();
        if name.is_empty() {
            return Transition::Ignored;
        }
        let Some(working_state) = self.working_state.as_ref() else {
            return Transition::Ignored;
        };
        self.scenarios
            .insert(name.to_string(), working_state.clone());
        self.persist();
        self.active_scenario_name = Some(name.to_string());
        self.is_dirty = false;
        self.active_view.set(ViewGroup::Report);
        debug!(scenario = name, "saved scenario");
        Transition::Applied
    }

    /// Always asks first. Deleting the active scenario also resets the working
    /// state to the canonical default.
    pub fn delete_scenario(&mut self, name: &str) -> Transition {
        if !self.scenarios.contains_key(name) {
            return Transition::Ignored;
        }
        if !self.prompt.confirm(&format!(
            "Delete scenario '{name}'? This cannot be undone."
        )) {
            return Transition::Cancelled;
        }
        self.scenarios.remove(name);
        self.persist();
        if self.active_scenario_name.as_deref() == Some(name) {
            self.working_state = self.canonical_default.clone();
            self.active_scenario_name = None;
            self.is_dirty = false;
        }
        self.active_view.set(ViewGroup::Report);
        debug!(scenario = name, "deleted scenario");
        Transition::Applied
    }

    fn persist(&self) {
        if self.persistence.save(&self.scenarios).is_err() {
            self.prompt.alert(
                "Could not save scenarios. Your changes may not be persisted. \
                 The storage location might be full or read-only.",
            );
        }
    }

    /// Replaces one parameter, keeping the others.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Transition {
        let Some(working_state) = self.working_state.as_ref() else {
            return Transition::Ignored;
        };
        let mut parameters = working_state.parameters.clone();
        parameters.insert(name.to_string(), value);
        self.update_working_state(PartialScenario::default().with_parameters(parameters))
    }

    pub fn set_narrative(&mut self, narrative: &str) -> Transition {
        self.update_working_state(PartialScenario::default().with_narrative(narrative))
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.working_state
            .as_ref()
            .is_some_and(|s| s.pinned.iter().any(|p| p.id == id))
    }

    /// Appends a report reference; already pinned ids are left alone.
    pub fn pin(&mut self, id: &str, title: &str) -> Transition {
        let Some(working_state) = self.working_state.as_ref() else {
            return Transition::Ignored;
        };
        if working_state.pinned.iter().any(|p| p.id == id) {
            return Transition::Ignored;
        }
        let mut pinned = working_state.pinned.clone();
        pinned.push(PinnedRef::new(id, title));
        self.update_working_state(PartialScenario::default().with_pinned(pinned))
    }

    pub fn unpin(&mut self, id: &str) -> Transition {
        let Some(working_state) = self.working_state.as_ref() else {
            return Transition::Ignored;
        };
        if !working_state.pinned.iter().any(|p| p.id == id) {
            return Transition::Ignored;
        }
        let pinned = working_state
            .pinned
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        self.update_working_state(PartialScenario::default().with_pinned(pinned))
    }

    /// Routes a module-originated event through that module's updater.
    pub fn apply_event(
        &mut self,
        registry: &ModuleRegistry,
        module_id: &str,
        event: &ModuleEvent,
    ) -> Transition {
        match registry.dispatch(module_id, event) {
            Some(patch) => self.update_working_state(patch),
            None => Transition::Ignored,
        }
    }

    /// LCOH for the working parameters; `None` before initialization.
    pub fn modeled_output(&self) -> Option<Result<f64, ModelError>> {
        self.working_state
            .as_ref()
            .map(|s| model::techno_economic_model(&s.parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ErrorCode, WorkbenchError},
        modules::builtin_sources,
        persistence::DEFAULT_STORAGE_KEY,
        prompt::ScriptedPrompt,
        storage::{KeyValueStorage, MemoryStorage},
    };
    use serde_json::{Value, json};
    use workbench_protocol::{Parameters, PcpSelections};

    fn default_scenario() -> Scenario {
        Scenario {
            parameters: Parameters::from([
                ("paramA".to_string(), 1.0),
                ("paramB".to_string(), 10.0),
            ]),
            ..Scenario::default()
        }
    }

    fn store_on(storage: MemoryStorage, prompt: ScriptedPrompt) -> ScenarioStore {
        let persistence = ScenarioPersistence::new(storage, DEFAULT_STORAGE_KEY);
        let mut store = ScenarioStore::new(persistence, prompt, ActiveView::default());
        store.initialize(&default_scenario());
        store
    }

    fn fresh() -> (ScenarioStore, MemoryStorage, ScriptedPrompt) {
        let storage = MemoryStorage::new();
        let prompt = ScriptedPrompt::new();
        (store_on(storage.clone(), prompt.clone()), storage, prompt)
    }

    fn stored_blob(storage: &MemoryStorage) -> Value {
        let text = storage
            .get_item(DEFAULT_STORAGE_KEY)
            .unwrap()
            .expect("blob written");
        serde_json::from_str(&text).unwrap()
    }

    fn params(pairs: &[(&str, f64)]) -> Parameters {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[derive(Clone, Copy)]
    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, WorkbenchError> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), WorkbenchError> {
            Err(WorkbenchError::new(ErrorCode::Io, "read-only"))
        }
    }

    #[test]
    fn initializes_with_defaults_when_storage_is_empty() {
        let (store, _, _) = fresh();
        assert!(store.is_ready());
        assert!(store.scenarios().is_empty());
        assert_eq!(store.working_state(), Some(&default_scenario()));
        assert_eq!(store.active_scenario_name(), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn initialize_normalizes_stored_scenarios() {
        let storage = MemoryStorage::with_item(
            DEFAULT_STORAGE_KEY,
            &json!({"My Scenario": {"parameters": {"paramA": 5}}}).to_string(),
        );
        let store = store_on(storage, ScriptedPrompt::new());
        let expected = Scenario {
            parameters: params(&[("paramA", 5.0), ("paramB", 10.0)]),
            ..default_scenario()
        };
        assert_eq!(store.scenarios()["My Scenario"], expected);
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "not json at all");
        let store = store_on(storage, ScriptedPrompt::new());
        assert!(store.scenarios().is_empty());
        assert!(store.is_ready());
    }

    #[test]
    fn initialize_is_repeatable() {
        let (mut store, _, _) = fresh();
        store.set_narrative("draft");
        store.save_current_scenario("S1");
        store.set_narrative("more");

        store.initialize(&default_scenario());
        let first = (
            store.scenarios().clone(),
            store.working_state().cloned(),
            store.is_dirty(),
        );
        store.initialize(&default_scenario());
        let second = (
            store.scenarios().clone(),
            store.working_state().cloned(),
            store.is_dirty(),
        );
        assert_eq!(first, second);
        assert_eq!(store.active_scenario_name(), None);
        assert_eq!(first.0["S1"].narrative, "draft");
        assert_eq!(first.1, Some(default_scenario()));
        assert!(!first.2);
    }

    #[test]
    fn operations_before_initialize_are_ignored() {
        let persistence = ScenarioPersistence::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
        let mut store = ScenarioStore::new(persistence, ScriptedPrompt::new(), ActiveView::default());
        assert!(!store.is_ready());
        assert_eq!(
            store.update_working_state(PartialScenario::default().with_narrative("x")),
            Transition::Ignored
        );
        assert_eq!(store.new_scenario(), Transition::Ignored);
        assert_eq!(store.save_current_scenario("S"), Transition::Ignored);
        assert_eq!(store.set_parameter("a", 1.0), Transition::Ignored);
        assert!(store.working_state().is_none());
        assert!(!store.is_dirty());
        assert!(store.modeled_output().is_none());
    }

    #[test]
    fn update_merges_shallowly_and_marks_dirty() {
        let (mut store, _, _) = fresh();
        store.update_working_state(PartialScenario::default().with_narrative("Test narrative"));
        assert_eq!(store.working_state().unwrap().narrative, "Test narrative");
        assert!(store.is_dirty());

        store.update_working_state(PartialScenario::default().with_parameters(params(&[("paramA", 99.0)])));
        assert_eq!(store.working_state().unwrap().parameters, params(&[("paramA", 99.0)]));
        assert_eq!(store.working_state().unwrap().narrative, "Test narrative");
    }

    #[test]
    fn empty_update_still_marks_dirty() {
        let (mut store, _, _) = fresh();
        assert_eq!(store.update_working_state(PartialScenario::default()), Transition::Applied);
        assert!(store.is_dirty());
    }

    #[test]
    fn save_persists_whole_map_and_clears_dirty() {
        let (mut store, storage, _) = fresh();
        store.update_working_state(PartialScenario::default().with_parameters(params(&[("paramA", 99.0)])));
        assert_eq!(store.save_current_scenario("Test Save"), Transition::Applied);

        assert_eq!(store.active_scenario_name(), Some("Test Save"));
        assert!(!store.is_dirty());
        assert_eq!(Some(&store.scenarios()["Test Save"]), store.working_state());
        assert_eq!(
            stored_blob(&storage),
            json!({
                "Test Save": {
                    "parameters": {"paramA": 99.0},
                    "narrative": "",
                    "pinned": [],
                    "pcpSelections": {}
                }
            })
        );
    }

    #[test]
    fn save_trims_name_and_ignores_blank() {
        let (mut store, storage, _) = fresh();
        store.set_narrative("x");
        assert_eq!(store.save_current_scenario("   "), Transition::Ignored);
        assert!(store.is_dirty());
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());

        assert_eq!(store.save_current_scenario("  Padded  "), Transition::Applied);
        assert_eq!(store.scenario_names(), vec!["Padded"]);
        assert_eq!(store.active_scenario_name(), Some("Padded"));
    }

    #[test]
    fn saved_copy_is_independent_of_later_edits() {
        let (mut store, _, _) = fresh();
        store.set_narrative("v1");
        store.save_current_scenario("S");
        store.set_narrative("v2");
        assert_eq!(store.scenarios()["S"].narrative, "v1");
    }

    #[test]
    fn overwriting_a_name_leaves_other_entries_alone() {
        let (mut store, _, prompt) = fresh();
        store.set_narrative("a");
        store.save_current_scenario("A");
        store.set_narrative("b");
        store.save_current_scenario("B");
        let b_before = store.scenarios()["B"].clone();

        store.set_narrative("a2");
        assert_eq!(store.save_current_scenario("A"), Transition::Applied);
        assert_eq!(store.scenarios().len(), 2);
        assert_eq!(store.scenarios()["A"].narrative, "a2");
        assert_eq!(store.scenarios()["B"], b_before);
        assert!(prompt.confirmations().is_empty());
    }

    #[test]
    fn load_replaces_working_state_and_clears_dirty() {
        let (mut store, _, _) = fresh();
        let to_load = Scenario {
            parameters: params(&[("paramA", 123.0), ("paramB", 10.0)]),
            narrative: "loaded".to_string(),
            ..default_scenario()
        };
        store.update_working_state(to_load.clone().into());
        store.save_current_scenario("Scenario to Load");
        store.set_narrative("dirty state");

        assert_eq!(store.load_scenario("Scenario to Load"), Transition::Applied);
        assert_eq!(store.working_state(), Some(&to_load));
        assert_eq!(store.active_scenario_name(), Some("Scenario to Load"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn loaded_copy_is_independent_of_the_saved_entry() {
        let (mut store, _, _) = fresh();
        store.set_narrative("saved");
        store.save_current_scenario("S");
        store.load_scenario("S");
        store.set_narrative("edited");
        assert_eq!(store.scenarios()["S"].narrative, "saved");
    }

    #[test]
    fn load_of_unknown_name_is_ignored_without_prompting() {
        let (mut store, _, prompt) = fresh();
        store.set_narrative("dirty");
        assert_eq!(store.load_scenario("nope"), Transition::Ignored);
        assert!(prompt.confirmations().is_empty());
        assert!(store.is_dirty());
    }

    #[test]
    fn declined_load_leaves_state_untouched() {
        let (mut store, _, prompt) = fresh();
        store.save_current_scenario("S");
        store.set_narrative("unsaved");
        prompt.answer_next(false);

        assert_eq!(store.load_scenario("S"), Transition::Cancelled);
        assert_eq!(store.working_state().unwrap().narrative, "unsaved");
        assert_eq!(store.active_scenario_name(), Some("S"));
        assert!(store.is_dirty());
        assert_eq!(prompt.confirmations().len(), 1);
    }

    #[test]
    fn clean_load_does_not_prompt() {
        let (mut store, _, prompt) = fresh();
        store.save_current_scenario("S");
        assert_eq!(store.load_scenario("S"), Transition::Applied);
        assert!(prompt.confirmations().is_empty());
    }

    #[test]
    fn new_scenario_resets_to_default() {
        let (mut store, _, _) = fresh();
        store.set_narrative("Some changes");
        store.save_current_scenario("Old Scenario");
        assert_eq!(store.new_scenario(), Transition::Applied);

        assert_eq!(store.working_state(), Some(&default_scenario()));
        assert_eq!(store.active_scenario_name(), None);
        assert!(!store.is_dirty());
        assert!(store.scenarios().contains_key("Old Scenario"));
    }

    #[test]
    fn new_scenario_asks_only_when_dirty() {
        let (mut store, _, prompt) = fresh();
        assert_eq!(store.new_scenario(), Transition::Applied);
        assert!(prompt.confirmations().is_empty());

        store.set_narrative("unsaved");
        prompt.answer_next(false);
        assert_eq!(store.new_scenario(), Transition::Cancelled);
        assert_eq!(store.working_state().unwrap().narrative, "unsaved");
        assert!(store.is_dirty());

        assert_eq!(store.new_scenario(), Transition::Applied);
        assert!(!store.is_dirty());
        assert_eq!(prompt.confirmations().len(), 2);
    }

    #[test]
    fn delete_removes_entry_and_persists() {
        let (mut store, storage, _) = fresh();
        store.save_current_scenario("Scenario A");
        store.save_current_scenario("Scenario B");
        assert_eq!(store.delete_scenario("Scenario A"), Transition::Applied);

        assert!(!store.scenarios().contains_key("Scenario A"));
        assert!(store.scenarios().contains_key("Scenario B"));
        let blob = stored_blob(&storage);
        assert!(blob.get("Scenario A").is_none());
        assert!(blob.get("Scenario B").is_some());
    }

    #[test]
    fn deleting_the_active_scenario_resets_working_state() {
        let (mut store, _, _) = fresh();
        store.set_narrative("active");
        store.save_current_scenario("Active Scenario");
        assert_eq!(store.delete_scenario("Active Scenario"), Transition::Applied);

        assert!(store.scenarios().is_empty());
        assert_eq!(store.working_state(), Some(&default_scenario()));
        assert_eq!(store.active_scenario_name(), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn deleting_another_scenario_keeps_working_state() {
        let (mut store, _, _) = fresh();
        store.save_current_scenario("Other");
        store.set_narrative("mine");
        store.save_current_scenario("Mine");
        store.set_narrative("mine, edited");

        assert_eq!(store.delete_scenario("Other"), Transition::Applied);
        assert_eq!(store.working_state().unwrap().narrative, "mine, edited");
        assert_eq!(store.active_scenario_name(), Some("Mine"));
        assert!(store.is_dirty());
    }

    #[test]
    fn delete_always_asks_and_can_be_declined() {
        let (mut store, storage, prompt) = fresh();
        store.save_current_scenario("Keep");
        let blob_before = stored_blob(&storage);
        prompt.answer_next(false);

        assert_eq!(store.delete_scenario("Keep"), Transition::Cancelled);
        assert!(store.scenarios().contains_key("Keep"));
        assert_eq!(store.active_scenario_name(), Some("Keep"));
        assert_eq!(stored_blob(&storage), blob_before);
        assert_eq!(prompt.confirmations().len(), 1);

        assert_eq!(store.delete_scenario("missing"), Transition::Ignored);
        assert_eq!(prompt.confirmations().len(), 1);
    }

    #[test]
    fn failed_persist_alerts_but_keeps_the_save() {
        let persistence = ScenarioPersistence::new(ReadOnlyStorage, DEFAULT_STORAGE_KEY);
        let prompt = ScriptedPrompt::new();
        let mut store = ScenarioStore::new(persistence, prompt.clone(), ActiveView::default());
        store.initialize(&default_scenario());
        store.set_narrative("x");

        assert_eq!(store.save_current_scenario("S"), Transition::Applied);
        assert!(store.scenarios().contains_key("S"));
        assert!(!store.is_dirty());
        assert_eq!(prompt.alerts().len(), 1);
        assert!(prompt.alerts()[0].contains("Could not save"));
    }

    #[test]
    fn lifecycle_transitions_switch_to_the_report_view() {
        let (mut store, _, prompt) = fresh();
        let view = store.active_view().clone();

        view.set(ViewGroup::Data);
        store.save_current_scenario("S");
        assert_eq!(view.get(), ViewGroup::Report);

        view.set(ViewGroup::KeyDrivers);
        store.load_scenario("S");
        assert_eq!(view.get(), ViewGroup::Report);

        view.set(ViewGroup::Data);
        store.new_scenario();
        assert_eq!(view.get(), ViewGroup::Report);

        view.set(ViewGroup::SurrogateModel);
        store.delete_scenario("S");
        assert_eq!(view.get(), ViewGroup::Report);

        // Aborted transitions leave navigation alone.
        store.save_current_scenario("T");
        view.set(ViewGroup::Data);
        prompt.answer_next(false);
        store.delete_scenario("T");
        assert_eq!(view.get(), ViewGroup::Data);
        store.load_scenario("missing");
        assert_eq!(view.get(), ViewGroup::Data);
    }

    #[test]
    fn end_to_end_save_new_load() {
        let storage = MemoryStorage::new();
        let persistence = ScenarioPersistence::new(storage, DEFAULT_STORAGE_KEY);
        let mut store = ScenarioStore::new(persistence, ScriptedPrompt::new(), ActiveView::default());
        let default = Scenario {
            parameters: params(&[("a", 1.0)]),
            ..Scenario::default()
        };
        store.initialize(&default);
        store.update_working_state(PartialScenario::default().with_narrative("draft"));
        store.save_current_scenario("S1");
        store.new_scenario();
        store.load_scenario("S1");

        assert_eq!(
            store.working_state(),
            Some(&Scenario {
                parameters: params(&[("a", 1.0)]),
                narrative: "draft".to_string(),
                pinned: Vec::new(),
                pcp_selections: PcpSelections::new(),
            })
        );
        assert_eq!(store.active_scenario_name(), Some("S1"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn saved_scenarios_survive_a_restart() {
        let storage = MemoryStorage::new();
        {
            let mut store = store_on(storage.clone(), ScriptedPrompt::new());
            store.set_parameter("paramA", 7.0);
            store.pin("sobol", "Sobol Indices (True Model)");
            store.save_current_scenario("Kept");
        }
        let store = store_on(storage, ScriptedPrompt::new());
        let kept = &store.scenarios()["Kept"];
        assert_eq!(kept.parameters, params(&[("paramA", 7.0), ("paramB", 10.0)]));
        assert_eq!(kept.pinned, vec![PinnedRef::new("sobol", "Sobol Indices (True Model)")]);
    }

    #[test]
    fn set_parameter_keeps_other_parameters() {
        let (mut store, _, _) = fresh();
        assert_eq!(store.set_parameter("paramB", 20.0), Transition::Applied);
        assert_eq!(
            store.working_state().unwrap().parameters,
            params(&[("paramA", 1.0), ("paramB", 20.0)])
        );
        assert!(store.is_dirty());
    }

    #[test]
    fn pins_are_unique_and_ordered() {
        let (mut store, _, _) = fresh();
        assert_eq!(store.pin("pcp", "Parallel Coordinates Plot"), Transition::Applied);
        assert_eq!(store.pin("sobol", "Sobol"), Transition::Applied);
        assert_eq!(store.pin("pcp", "again"), Transition::Ignored);
        assert!(store.is_pinned("pcp"));
        let ids = store
            .working_state()
            .unwrap()
            .pinned
            .iter()
            .map(|p| p.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["pcp", "sobol"]);

        assert_eq!(store.unpin("pcp"), Transition::Applied);
        assert_eq!(store.unpin("pcp"), Transition::Ignored);
        assert!(!store.is_pinned("pcp"));
        assert!(store.is_pinned("sobol"));
    }

    #[test]
    fn module_events_flow_through_updaters() {
        let (mut store, _, _) = fresh();
        let registry = ModuleRegistry::build(builtin_sources());
        let selections = PcpSelections::from([("LCOH".to_string(), [100.0, 200.0])]);

        let result = store.apply_event(
            &registry,
            "pcp",
            &ModuleEvent::SelectionChanged(selections.clone()),
        );
        assert_eq!(result, Transition::Applied);
        assert_eq!(store.working_state().unwrap().pcp_selections, selections);
        assert!(store.is_dirty());

        store.save_current_scenario("S");
        assert_eq!(
            store.apply_event(&registry, "sobol", &ModuleEvent::SelectionCleared),
            Transition::Ignored
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn modeled_output_propagates_formula_errors() {
        let (mut store, _, _) = fresh();
        assert!(matches!(
            store.modeled_output(),
            Some(Err(ModelError::MissingParameter(_)))
        ));

        store.update_working_state(model::default_scenario().into());
        let lcoh = store.modeled_output().unwrap().unwrap();
        assert!(lcoh > 0.0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut store, _, _) = fresh();
        store.set_narrative("x");
        let snapshot = store.snapshot();
        assert!(snapshot.is_dirty);
        assert_eq!(snapshot.active_scenario_name, None);
        assert_eq!(snapshot.working_state.unwrap().narrative, "x");
        assert!(snapshot.scenarios.is_empty());
    }
}
