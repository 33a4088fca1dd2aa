//! `bpconsole groups`: show basic/advanced grouping of definitions.

use std::path::Path;

use bpconsole_parameters::group_parameters;
use serde_json::json;

use crate::error::CommandError;
use crate::input::read_definitions;
use crate::table::{new_table, terminal_width};
use crate::EXIT_SUCCESS;

/// Run the groups command and return the exit code.
pub fn run_groups(definitions: &Path, json: bool) -> Result<i32, CommandError> {
    let definitions = read_definitions(definitions)?;
    let groups = group_parameters(&definitions);

    if json {
        let entries: Vec<serde_json::Value> = groups
            .iter()
            .map(|group| {
                json!({
                    "advanced": group.advanced,
                    "parameters": group.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(EXIT_SUCCESS);
    }

    let mut table = new_table(&["#", "Section", "Parameters"], terminal_width());
    for (index, group) in groups.iter().enumerate() {
        let section = if group.advanced { "Advanced" } else { "Basic" };
        let names: Vec<&str> = group.parameters.iter().map(|p| p.name.as_str()).collect();
        table.add_row(vec![
            (index + 1).to_string(),
            section.to_string(),
            names.join(", "),
        ]);
    }
    println!("{table}");

    Ok(EXIT_SUCCESS)
}
