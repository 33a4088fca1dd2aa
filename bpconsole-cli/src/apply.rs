//! `bpconsole apply`: validate a values file and apply the resource.

use std::path::Path;

use bpconsole_client::{apply_resource, BindPlaneClient, ClientConfig, Resource, UpdateStatus};
use bpconsole_parameters::{FormSession, NameFieldRules, ResourceKind, SubmitOutcome, NAME_KEY};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::CommandError;
use crate::input::{fill_session, read_definitions, read_values};
use crate::report::{errors_json, print_errors};
use crate::{EXIT_BLOCKED, EXIT_SUCCESS};

/// Run the apply command and return the exit code.
///
/// When the named resource already exists its current parameters,
/// display name and processors seed the form before the values file is
/// applied, and the fetched document is updated rather than rebuilt.
pub async fn run_apply(
    config_path: Option<&Path>,
    kind: ResourceKind,
    type_name: &str,
    values_path: &Path,
    definitions_path: Option<&Path>,
    json: bool,
) -> Result<i32, CommandError> {
    let config = ClientConfig::load(config_path)?;
    let client = BindPlaneClient::new(&config)?;

    let definitions = match definitions_path {
        Some(path) => read_definitions(path)?,
        None => client.parameter_definitions(kind, type_name).await?,
    };
    let values = read_values(values_path)?;
    let name = values
        .get(NAME_KEY)
        .and_then(Value::as_str)
        .map(str::to_string);

    let taken = client.existing_names(kind).await?;
    let editing = name.as_ref().is_some_and(|name| taken.contains(name));
    debug!(%kind, ?name, editing, "preparing form");

    let mut builder = FormSession::builder(kind, definitions.clone()).include_name_field(
        NameFieldRules::new(taken.into_iter().filter(|taken| Some(taken) != name.as_ref())),
    );
    let existing = match (editing, &name) {
        (true, Some(name)) => Some(client.get_resource(kind, name).await?),
        _ => None,
    };
    if let Some(existing) = &existing {
        builder = builder.existing_parameters(existing.parameters().to_vec());
        if let Some(display_name) = &existing.metadata.display_name {
            builder = builder.display_name(display_name.clone());
        }
        if let Some(processors) = existing.processors_json() {
            builder = builder.processors(processors);
        }
    }
    let mut session = builder.build();
    fill_session(&mut session, values);

    let mut applied: Option<UpdateStatus> = None;
    let outcome = session
        .submit(|values| {
            let client = &client;
            let definitions = &definitions;
            let existing = existing.clone();
            let applied = &mut applied;
            async move {
                let resource = match existing {
                    Some(mut resource) => {
                        resource.update_from_form(&values, definitions)?;
                        resource
                    }
                    None => Resource::from_form(kind, type_name, &values, definitions)?,
                };
                let status = apply_resource(client, resource).await?;
                *applied = Some(status.status);
                Ok::<_, CommandError>(status.into_save_outcome())
            }
        })
        .await?;

    let exit_code = match &outcome {
        SubmitOutcome::Saved => EXIT_SUCCESS,
        SubmitOutcome::Rejected { .. } | SubmitOutcome::Blocked => EXIT_BLOCKED,
    };

    if json {
        let output = match &outcome {
            SubmitOutcome::Saved => json!({"outcome": "saved", "status": applied}),
            SubmitOutcome::Rejected { reason } => json!({"outcome": "rejected", "reason": reason}),
            SubmitOutcome::Blocked => json!({"outcome": "blocked", "errors": errors_json(&session)}),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(exit_code);
    }

    let display = name.as_deref().unwrap_or_default();
    match outcome {
        SubmitOutcome::Saved => match applied {
            Some(status) => println!("{kind} {display} {status}"),
            None => println!("{kind} {display} applied"),
        },
        SubmitOutcome::Rejected { reason } => {
            eprintln!("BindPlane rejected {kind} {display}: {reason}");
        }
        SubmitOutcome::Blocked => {
            print_errors(&session);
            eprintln!("Not applied: fix the errors above.");
        }
    }

    Ok(exit_code)
}
