//! Form sessions.
//!
//! A [`FormSession`] owns the values and errors of one resource being
//! created or edited. Every change recomputes the whole error map, because
//! one field can change the relevance (and so the error) of another.
//!
//! ```text
//! Viewing ─set_form_value─▶ Editing ─submit─▶ Submitting ─saved─▶ Viewing
//!                              ▲                  │
//!                              └──rejected/error──┘
//!            submit with errors ─▶ EditingWithErrors
//! ```

use std::collections::HashSet;
use std::future::Future;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::types::{Parameter, ParameterDefinition, ResourceKind};
use crate::validation::{FormErrors, NameFieldRules, Validator};
use crate::value::{FormValue, FormValues, DISPLAY_NAME_KEY, NAME_KEY, PROCESSORS_KEY};

/// A run of consecutive definitions sharing the same `advancedConfig` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    pub advanced: bool,
    pub parameters: Vec<ParameterDefinition>,
}

/// Split definitions into groups, starting a new group whenever the
/// `advancedConfig` flag changes. Order is preserved.
pub fn group_parameters(definitions: &[ParameterDefinition]) -> Vec<ParameterGroup> {
    let mut groups: Vec<ParameterGroup> = Vec::new();
    for def in definitions {
        match groups.last_mut() {
            Some(group) if group.advanced == def.advanced_config => {
                group.parameters.push(def.clone());
            }
            _ => groups.push(ParameterGroup {
                advanced: def.advanced_config,
                parameters: vec![def.clone()],
            }),
        }
    }
    debug!(
        definitions = definitions.len(),
        groups = groups.len(),
        "grouped parameters"
    );
    groups
}

/// Build the starting values of a form.
///
/// Each definition's default is applied first, then any matching existing
/// parameter overrides it. Fields with neither hold the empty value for
/// their type.
pub fn init_form_values(
    definitions: &[ParameterDefinition],
    existing: Option<&[Parameter]>,
    include_name_field: bool,
    display_name: Option<&str>,
) -> FormValues {
    let mut values = FormValues::new();

    if include_name_field {
        values.set(NAME_KEY, FormValue::Text(String::new()));
    }
    if let Some(display_name) = display_name {
        values.set(DISPLAY_NAME_KEY, display_name);
    }

    for def in definitions {
        let initial = match &def.default {
            Some(default) => FormValue::from_json(default.clone()),
            None => FormValue::empty_for(&def.type_),
        };
        values.set(def.name.clone(), initial);
    }

    for param in existing.into_iter().flatten() {
        values.set(param.name.clone(), FormValue::from_json(param.value.clone()));
    }

    values
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Viewing,
    Editing,
    Submitting,
    EditingWithErrors,
}

/// What the save callback reports back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend accepted the resource.
    Saved,
    /// The backend rejected the resource; the form stays open.
    Rejected { reason: String },
}

/// The result of [`FormSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the save callback was not called.
    Blocked,
    Saved,
    Rejected { reason: String },
}

/// Builder for [`FormSession`]. Created by [`FormSession::builder`].
pub struct FormSessionBuilder {
    definitions: Vec<ParameterDefinition>,
    kind: ResourceKind,
    existing: Option<Vec<Parameter>>,
    name_rules: Option<NameFieldRules>,
    display_name: Option<String>,
    processors: Option<Value>,
    validator: Validator,
}

impl FormSessionBuilder {
    /// Values of the resource being edited. Without them the session is
    /// creating a new resource.
    pub fn existing_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.existing = Some(parameters);
        self
    }

    /// Include and validate the reserved `name` field.
    pub fn include_name_field(mut self, rules: NameFieldRules) -> Self {
        self.name_rules = Some(rules);
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Processors of the resource being edited, carried under the reserved
    /// `processors` key.
    pub fn processors(mut self, processors: Value) -> Self {
        self.processors = Some(processors);
        self
    }

    /// Use a validator with custom type validators registered.
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn build(self) -> FormSession {
        let mut values = init_form_values(
            &self.definitions,
            self.existing.as_deref(),
            self.name_rules.is_some(),
            self.display_name.as_deref(),
        );
        if let Some(processors) = self.processors {
            values.set(PROCESSORS_KEY, FormValue::from_json(processors));
        }
        let errors = self.validator.form_errors(
            &self.definitions,
            &values,
            self.kind,
            self.name_rules.as_ref(),
        );
        debug!(
            kind = %self.kind,
            fields = values.len(),
            editing = self.existing.is_some(),
            "form session initialized"
        );
        FormSession {
            initial: values.clone(),
            is_new: self.existing.is_none(),
            definitions: self.definitions,
            kind: self.kind,
            name_rules: self.name_rules,
            validator: self.validator,
            values,
            errors,
            touched: HashSet::new(),
            state: FormState::Viewing,
            rejection: None,
        }
    }
}

/// The state of one create/edit form.
pub struct FormSession {
    definitions: Vec<ParameterDefinition>,
    kind: ResourceKind,
    name_rules: Option<NameFieldRules>,
    validator: Validator,
    values: FormValues,
    initial: FormValues,
    is_new: bool,
    errors: FormErrors,
    touched: HashSet<String>,
    state: FormState,
    rejection: Option<String>,
}

impl FormSession {
    /// Start building a session for a resource of `kind` described by
    /// `definitions`.
    pub fn builder(kind: ResourceKind, definitions: Vec<ParameterDefinition>) -> FormSessionBuilder {
        FormSessionBuilder {
            definitions,
            kind,
            existing: None,
            name_rules: None,
            display_name: None,
            processors: None,
            validator: Validator::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// The reason the backend gave for the last rejected save, if any.
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }

    /// Replace one value and recompute every error.
    pub fn set_form_value(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        let name = name.into();
        self.values.set(name.clone(), value);
        self.recompute();
        if self.state != FormState::EditingWithErrors {
            self.state = FormState::Editing;
        }
        debug!(field = %name, valid = self.errors.is_valid(), "form value set");
    }

    /// Convenience for setting a value from its wire shape.
    pub fn set_json_value(&mut self, name: impl Into<String>, value: Value) {
        self.set_form_value(name, FormValue::from_json(value));
    }

    /// Mark a field as interacted with, so its error becomes visible.
    pub fn touch(&mut self, name: impl Into<String>) {
        self.touched.insert(name.into());
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// The error a presentation layer should show for `name`: only once the
    /// field has been touched.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.errors.error(name)
        } else {
            None
        }
    }

    /// Presentation groups of this session's definitions.
    pub fn groups(&self) -> Vec<ParameterGroup> {
        group_parameters(&self.definitions)
    }

    /// True for a new resource, or when values differ from the starting point.
    pub fn is_dirty(&self) -> bool {
        self.is_new || self.values != self.initial
    }

    /// Restore the starting values.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.rejection = None;
        self.recompute();
        self.state = FormState::Viewing;
    }

    /// Validate and, when valid, hand the values to `on_save`.
    ///
    /// An invalid form marks every field touched and returns
    /// [`SubmitOutcome::Blocked`] without calling `on_save`. A rejection keeps
    /// the form open with the backend's reason available from
    /// [`rejection`](Self::rejection). Errors from `on_save` are returned
    /// unchanged and also leave the form open.
    pub async fn submit<F, Fut, E>(&mut self, on_save: F) -> Result<SubmitOutcome, E>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<SaveOutcome, E>>,
    {
        self.recompute();
        if !self.errors.is_valid() {
            self.touch_all();
            self.state = FormState::EditingWithErrors;
            debug!(
                failing = self.errors.failing().count(),
                "submit blocked by validation errors"
            );
            return Ok(SubmitOutcome::Blocked);
        }

        self.state = FormState::Submitting;
        self.rejection = None;

        match on_save(self.values.clone()).await {
            Ok(SaveOutcome::Saved) => {
                info!(kind = %self.kind, name = ?self.values.name(), "form saved");
                self.initial = self.values.clone();
                self.is_new = false;
                self.state = FormState::Viewing;
                Ok(SubmitOutcome::Saved)
            }
            Ok(SaveOutcome::Rejected { reason }) => {
                warn!(kind = %self.kind, %reason, "backend rejected form");
                self.rejection = Some(reason.clone());
                self.state = FormState::Editing;
                Ok(SubmitOutcome::Rejected { reason })
            }
            Err(e) => {
                self.state = FormState::Editing;
                Err(e)
            }
        }
    }

    fn touch_all(&mut self) {
        let names: Vec<String> = self.errors.iter().map(|(name, _)| name.clone()).collect();
        self.touched.extend(names);
    }

    fn recompute(&mut self) {
        self.errors = self.validator.form_errors(
            &self.definitions,
            &self.values,
            self.kind,
            self.name_rules.as_ref(),
        );
    }
}
