//! Parameter forms for BindPlane resources
//!
//! `bpconsole-parameters` turns a resource type's parameter definitions into an
//! editable form: typed values, conditional relevance, per-type validation and
//! a session that decides when a submit may reach the backend. It knows
//! nothing about transport; saving is a caller-supplied callback.
//!
//! # Architecture
//!
//! - **Definitions**: `ParameterDefinition` lists as served by the backend
//! - **Values**: a tagged `FormValue` per field, never free-form JSON
//! - **Relevance**: `relevantIf` conditions decide which fields apply
//! - **Validation**: full recomputation on every change; irrelevant fields never fail
//! - **Sessions**: `FormSession` tracks touched fields, dirtiness and submit state

pub mod error;
pub mod form;
pub mod relevance;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{ParameterError, Result};
pub use form::{
    group_parameters, init_form_values, FormSession, FormSessionBuilder, FormState,
    ParameterGroup, SaveOutcome, SubmitOutcome,
};
pub use relevance::{condition_holds, is_relevant};
pub use types::{
    load_definitions, validate_definitions, DanglingCondition, Parameter, ParameterDefinition,
    ParameterOptions, ParameterType, RelevantIfCondition, RelevantIfOperator, ResourceKind,
};
pub use validation::{
    init_form_errors, validate_field, validate_name, FieldValidator, FormErrors, NameFieldRules,
    Validator, ValidatorRegistry,
};
pub use value::{FormValue, FormValues, DISPLAY_NAME_KEY, NAME_KEY, PROCESSORS_KEY};
