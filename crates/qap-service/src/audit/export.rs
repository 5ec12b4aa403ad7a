//! Delimited-text rendering of audit events.

use qap_entity::audit::AuditEvent;

/// Header row of the audit export.
pub const CSV_HEADER: [&str; 6] = ["ID", "Type", "Actor", "Role", "Detail", "Timestamp"];

/// Quote one field, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields.into_iter().map(quote).collect::<Vec<_>>().join(",")
}

/// Render events as CSV, one fully quoted line per event.
pub fn render_csv(events: &[AuditEvent]) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(row(CSV_HEADER));

    for event in events {
        let id = event.id.to_string();
        let role = event.actor_role.map(|role| role.as_str()).unwrap_or_default();
        let timestamp = event.timestamp.to_rfc3339();
        lines.push(row([
            id.as_str(),
            event.kind.as_str(),
            event.actor_name.as_str(),
            role,
            event.detail.as_str(),
            timestamp.as_str(),
        ]));
    }

    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}
