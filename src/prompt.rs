//! User prompts the scenario store needs: a blocking yes/no confirmation for
//! destructive transitions and an alert for persistence failures.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use tracing::warn;

pub trait Prompt {
    /// Blocks until the user answers. `false` aborts the transition.
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Answers every confirmation the same way; alerts only go to the log.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Prompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }

    fn alert(&self, message: &str) {
        warn!("{message}");
    }
}

/// Native message boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePrompt;

impl Prompt for NativePrompt {
    fn confirm(&self, message: &str) -> bool {
        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Workbench")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::OkCancel)
            .show();
        matches!(
            answer,
            rfd::MessageDialogResult::Ok | rfd::MessageDialogResult::Yes
        )
    }

    fn alert(&self, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Workbench")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[derive(Debug, Default)]
struct ScriptedState {
    answers: VecDeque<bool>,
    confirmations: Vec<String>,
    alerts: Vec<String>,
}

/// Replays queued answers (yes once the queue is empty) and records every
/// message. Clones share the script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_next(&self, answer: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.answers.push_back(answer);
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.confirmations.clone())
            .unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.alerts.clone())
            .unwrap_or_default()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        match self.state.lock() {
            Ok(mut state) => {
                state.confirmations.push(message.to_string());
                state.answers.pop_front().unwrap_or(true)
            }
            Err(_) => false,
        }
    }

    fn alert(&self, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.alerts.push(message.to_string());
        }
    }
}
