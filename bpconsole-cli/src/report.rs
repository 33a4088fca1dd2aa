//! Printing form errors.

use bpconsole_parameters::FormSession;

use crate::table::{message_width, new_table, shorten_message, terminal_width};

/// Print every failing field of `session` as a table.
///
/// Labels fall back to the field name. Long messages (YAML parse errors,
/// mostly) are shortened to the space the other two columns leave.
pub fn print_errors(session: &FormSession) {
    let rows: Vec<(String, String, &str)> = session
        .errors()
        .failing()
        .map(|(name, error)| {
            let label = session
                .definitions()
                .iter()
                .find(|def| def.name == name && !def.label.is_empty())
                .map(|def| def.label.clone())
                .unwrap_or_else(|| name.to_string());
            (name.to_string(), label, error)
        })
        .collect();

    let field_width = rows.iter().map(|row| row.0.chars().count()).max().unwrap_or(0);
    let label_width = rows.iter().map(|row| row.1.chars().count()).max().unwrap_or(0);
    let width = terminal_width();
    let message_max = message_width(width, &[field_width, label_width]);

    let mut table = new_table(&["Field", "Label", "Error"], width);
    for (name, label, error) in rows {
        table.add_row(vec![name, label, shorten_message(error, message_max)]);
    }

    println!("{table}");
}

/// The failing fields as a JSON object.
pub fn errors_json(session: &FormSession) -> serde_json::Value {
    serde_json::Value::Object(
        session
            .errors()
            .failing()
            .map(|(name, error)| (name.to_string(), serde_json::Value::from(error)))
            .collect(),
    )
}
