//! In-memory stand-in for a juju controller
//!
//! Every handle cloned from one `FakeJuju` shares the same controller state,
//! the way real handles share one `JUJU_DATA`. Knobs reproduce the juju
//! misbehaviours the checks are meant to catch.

use crate::client::{ModelClient, ModelEnv};
use crate::error::JujuError;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct FakeJujuState {
    pub controller: String,
    pub models: Vec<String>,
    pub current_model: Option<String>,
    /// Every command issued, as `command args...`
    pub calls: Vec<String>,
    keep_selection_on_destroy: bool,
    stay_on_add: bool,
    switch_redirect: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FakeJuju {
    env: ModelEnv,
    state: Rc<RefCell<FakeJujuState>>,
}

impl FakeJuju {
    /// Controller with a single model, currently selected
    pub fn new(controller: &str, model: &str) -> Self {
        let state = FakeJujuState {
            controller: controller.to_string(),
            models: vec![model.to_string()],
            current_model: Some(model.to_string()),
            ..FakeJujuState::default()
        };
        Self {
            env: ModelEnv::new(controller, model),
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Leave the selection pointing at a model after destroying it
    #[must_use]
    pub fn keep_selection_on_destroy(self) -> Self {
        self.state.borrow_mut().keep_selection_on_destroy = true;
        self
    }

    /// Do not select a newly added model
    #[must_use]
    pub fn stay_on_add(self) -> Self {
        self.state.borrow_mut().stay_on_add = true;
        self
    }

    /// Land every switch on `model` regardless of the requested target
    #[must_use]
    pub fn redirect_switch_to(self, model: &str) -> Self {
        self.state.borrow_mut().switch_redirect = Some(model.to_string());
        self
    }

    /// Drop the current selection
    pub fn clear_selection(&self) {
        self.state.borrow_mut().current_model = None;
    }

    pub fn current_model(&self) -> Option<String> {
        self.state.borrow().current_model.clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.state.borrow().models.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, command: &str, args: &[&str]) {
        let mut call = command.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.state.borrow_mut().calls.push(call);
    }
}

impl ModelClient for FakeJuju {
    fn env(&self) -> &ModelEnv {
        &self.env
    }

    fn get_juju_output(
        &self,
        command: &str,
        args: &[&str],
        _include_e: bool,
    ) -> Result<Vec<u8>, JujuError> {
        self.record(command, args);
        let state = self.state.borrow();
        match command {
            "switch" => {
                let text = match &state.current_model {
                    Some(model) => format!("{}:admin/{}\n", state.controller, model),
                    None => format!("{}\n", state.controller),
                };
                Ok(text.into_bytes())
            }
            "list-models" => {
                let models: Vec<serde_json::Value> = state
                    .models
                    .iter()
                    .map(|name| serde_json::json!({ "name": name }))
                    .collect();
                let mut listing = serde_json::json!({ "models": models });
                if let Some(current) = &state.current_model {
                    listing["current-model"] = serde_json::Value::String(current.clone());
                }
                Ok(listing.to_string().into_bytes())
            }
            other => Err(JujuError::CalledProcess {
                command: format!("juju {other}"),
                code: 2,
                stderr: format!("ERROR unrecognized command: juju {other}"),
            }),
        }
    }

    fn switch(&mut self, model: &str, controller: &str) -> Result<(), JujuError> {
        let target = ModelEnv::new(controller, model);
        self.record("switch", &[target.qualified_name().as_str()]);
        let mut state = self.state.borrow_mut();
        if !state.models.iter().any(|m| m == model) {
            return Err(JujuError::CalledProcess {
                command: format!("juju switch {}", target.qualified_name()),
                code: 1,
                stderr: format!("ERROR \"{model}\" is not the name of a model or controller"),
            });
        }
        let landed = state
            .switch_redirect
            .clone()
            .unwrap_or_else(|| model.to_string());
        state.current_model = Some(landed);
        drop(state);
        self.env = target;
        Ok(())
    }

    fn destroy_model(&self) -> Result<(), JujuError> {
        let target = self.env.qualified_name();
        self.record("destroy-model", &[target.as_str(), "-y"]);
        let mut state = self.state.borrow_mut();
        let model = self.env.model.clone();
        state.models.retain(|m| *m != model);
        if !state.keep_selection_on_destroy
            && state.current_model.as_deref() == Some(model.as_str())
        {
            state.current_model = None;
        }
        Ok(())
    }

    fn add_model(&self, model: &str) -> Result<Self, JujuError> {
        self.record("add-model", &[model, "-c", self.env.controller.as_str()]);
        {
            let mut state = self.state.borrow_mut();
            state.models.push(model.to_string());
            if !state.stay_on_add {
                state.current_model = Some(model.to_string());
            }
        }
        Ok(Self {
            env: self.env.with_model(model),
            state: Rc::clone(&self.state),
        })
    }
}
