//! Scenario definition and runner.

use std::collections::HashMap;
use std::fmt;

use strata_core::{InstanceId, Scope, SessionId, Value, Values};
use strata_schema::{load_str, testmode};
use strata_session::{ConfigApi, SessionError, SessionResult};
use strata_store::{ConfigStore, Origin, StoreConfig, StoreError};
use tracing::debug;

use crate::assertion::Assertion;
use crate::error::ScenarioResult;
use crate::fixture::init_tracing;

/// Outcome of one step: an optional value to assert on.
pub type StepResult = SessionResult<Option<Value>>;

type Action = Box<dyn Fn(&mut Context) -> StepResult>;

/// A named step with its expected outcome.
pub struct Step {
    pub name: String,
    action: Action,
    pub assertion: Assertion,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("assertion", &self.assertion)
            .finish()
    }
}

/// A sequence of steps run against one store.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    schema: Option<String>,
    config: StoreConfig,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a scenario over the test-mode schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            config: StoreConfig::default(),
            steps: Vec::new(),
        }
    }

    /// Use a TOML schema document instead of the test-mode schema.
    pub fn schema(mut self, source: &str) -> Self {
        self.schema = Some(source.to_string());
        self
    }

    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.config.test_mode = enabled;
        self
    }

    pub fn root_type(mut self, name: &str) -> Self {
        self.config.root_type = name.to_string();
        self
    }

    /// Add a step; `expect` builds its assertion.
    pub fn step(
        mut self,
        name: &str,
        action: impl Fn(&mut Context) -> StepResult + 'static,
        expect: impl FnOnce(Assertion) -> Assertion,
    ) -> Self {
        self.steps.push(Step {
            name: name.to_string(),
            action: Box::new(action),
            assertion: expect(Assertion::new()),
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order. Returns the final context for further checks.
    pub fn run(&self) -> ScenarioResult<Context> {
        init_tracing();

        let graph = match &self.schema {
            Some(source) => load_str(source).map_err(SessionError::from)?,
            None => testmode::schema().map_err(SessionError::from)?,
        };
        let api = ConfigApi::bootstrap(graph, self.config.clone())?;
        let mut context = Context::new(api);

        for step in &self.steps {
            debug!(scenario = %self.name, step = %step.name, "running step");
            let result = (step.action)(&mut context);
            step.assertion.verify(&step.name, &result)?;
        }

        Ok(context)
    }
}

/// State shared by the steps of one run.
pub struct Context {
    api: ConfigApi,
    bindings: HashMap<String, InstanceId>,
    session: SessionId,
}

impl Context {
    fn new(api: ConfigApi) -> Self {
        Self {
            api,
            bindings: HashMap::new(),
            session: SessionId::new(1),
        }
    }

    pub fn api(&self) -> &ConfigApi {
        &self.api
    }

    pub fn store(&self) -> &ConfigStore {
        self.api.store()
    }

    /// Session the next steps act in.
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn use_session(&mut self, session: SessionId) {
        self.session = session;
    }

    /// Instance bound to `name`; unbound names map to an id the store never
    /// allocates, so they surface as `UnknownInstance`.
    pub fn id(&self, name: &str) -> InstanceId {
        match name {
            "root" => self.store().root(),
            _ => self
                .bindings
                .get(name)
                .copied()
                .unwrap_or(InstanceId::new(0)),
        }
    }

    /// Create an instance and bind it to `name`.
    pub fn create(&mut self, name: &str, type_name: &str, scope: Scope, values: Values) -> StepResult {
        let store = self.api.store();
        let type_id = store
            .graph()
            .type_id(type_name)
            .ok_or_else(|| StoreError::unknown_type(type_name))?;
        let id = store.create_instance(type_id, scope.key(self.session), values)?;
        self.bindings.insert(name.to_string(), id);
        Ok(None)
    }

    /// Link `target` into `owner`'s link set at `scope`.
    pub fn link(&mut self, owner: &str, link: &str, scope: Scope, target: &str) -> StepResult {
        self.store().link_instances(
            self.id(owner),
            scope.key(self.session),
            link,
            self.id(target),
        )?;
        Ok(None)
    }

    /// Set a property of a bound instance.
    pub fn update(&mut self, name: &str, property: &str, value: impl Into<Value>) -> StepResult {
        self.store()
            .set_instance_property(self.id(name), property, value.into())?;
        Ok(None)
    }

    /// Remove a bound instance; returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> StepResult {
        let removed = self.store().remove_instance(self.id(name))?;
        Ok(Some(Value::Bool(removed)))
    }

    /// Set a setting through the client API.
    pub fn set(&mut self, property: &str, value: impl Into<Value>, scope: Scope) -> StepResult {
        self.api
            .set(property, Some(value.into()), scope, self.session)?;
        Ok(None)
    }

    /// Set a setting as the server itself.
    pub fn set_as_server(&mut self, property: &str, value: impl Into<Value>, scope: Scope) -> StepResult {
        let store = self.api.store();
        store.set_scalar_property(
            store.root(),
            property,
            Some(value.into()),
            scope.key(self.session),
            Origin::Server,
        )?;
        Ok(None)
    }

    /// Reset a setting at `scope`.
    pub fn reset(&mut self, property: &str, scope: Scope) -> StepResult {
        self.api.set(property, None, scope, self.session)?;
        Ok(None)
    }

    /// Effective value of a setting in the current session.
    pub fn get(&mut self, property: &str) -> StepResult {
        Ok(Some(self.api.get(property, self.session)?))
    }

    /// Tear down the current session.
    pub fn teardown(&mut self) -> StepResult {
        Ok(Some(Value::Bool(self.api.teardown_session(self.session))))
    }

    /// Targets of a link, by id.
    pub fn linked(&self, owner: &str, link: &str) -> Vec<InstanceId> {
        self.store().linked(self.id(owner), link, self.session)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("session", &self.session)
            .field("bindings", &self.bindings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::values;

    #[test]
    fn test_scenario_collects_steps() {
        let scenario = Scenario::new("collect")
            .step("get", |ctx| ctx.get("query_timeout_ms"), |a| a.value(0i64))
            .step("bad", |ctx| ctx.get("nope"), |a| a.error("UnknownProperty"));

        assert_eq!(scenario.steps().len(), 2);
        assert_eq!(scenario.steps()[1].assertion.error, Some("UnknownProperty"));
    }

    #[test]
    fn test_scenario_runs() {
        let context = Scenario::new("run")
            .step(
                "create",
                |ctx| {
                    ctx.create(
                        "obj",
                        "cfg::SystemConfig",
                        Scope::System,
                        values! { "name" => "x" },
                    )
                },
                |a| a.ok(),
            )
            .step("link", |ctx| ctx.link("root", "sysobj", Scope::System, "obj"), |a| a.ok())
            .run()
            .unwrap();

        assert_eq!(context.linked("root", "sysobj"), vec![context.id("obj")]);
    }

    #[test]
    fn test_failed_assertion_reported() {
        let result = Scenario::new("fail")
            .step("get", |ctx| ctx.get("query_timeout_ms"), |a| a.value(1i64))
            .run();

        assert!(result.is_err());
    }
}
