//! `bpconsole validate`: check a values file against definitions.

use std::path::Path;

use bpconsole_parameters::{FormSession, NameFieldRules, ResourceKind};
use serde_json::json;

use crate::error::CommandError;
use crate::input::{fill_session, read_definitions, read_values};
use crate::report::{errors_json, print_errors};
use crate::{EXIT_BLOCKED, EXIT_SUCCESS};

/// Run the validate command and return the exit code.
pub fn run_validate(
    definitions: &Path,
    values: Option<&Path>,
    kind: ResourceKind,
    name_field: bool,
    existing_names: &[String],
    json: bool,
) -> Result<i32, CommandError> {
    let definitions = read_definitions(definitions)?;
    let values = match values {
        Some(path) => read_values(path)?,
        None => Default::default(),
    };

    let mut builder = FormSession::builder(kind, definitions);
    if name_field {
        builder = builder.include_name_field(NameFieldRules::new(existing_names.iter().cloned()));
    }
    let mut session = builder.build();
    fill_session(&mut session, values);

    let valid = session.is_valid();
    if json {
        let output = json!({
            "valid": valid,
            "errors": errors_json(&session),
            "values": session.values(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if valid {
        println!("All {} fields are valid.", session.errors().len());
    } else {
        print_errors(&session);
        println!(
            "\n{} field(s) failed validation.",
            session.errors().failing().count()
        );
    }

    Ok(if valid { EXIT_SUCCESS } else { EXIT_BLOCKED })
}
