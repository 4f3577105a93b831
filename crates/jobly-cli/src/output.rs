use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use heck::ToTitleCase;
use serde_json::Value;

pub const COMPANY_COLUMNS: &[&str] = &["handle", "name", "numEmployees", "logoUrl", "description"];
pub const JOB_COLUMNS: &[&str] = &["id", "title", "salary", "equity", "companyHandle"];

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render serialized records as a table with the given camelCase columns.
pub fn table<T: serde::Serialize>(rows: &[T], columns: &[&str]) -> anyhow::Result<Table> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|c| {
            Cell::new(c.to_title_case())
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan)
        }));

    for row in rows {
        let value = serde_json::to_value(row)?;
        table.add_row(columns.iter().map(|c| cell(value.get(*c))));
    }

    Ok(table)
}

fn cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::new("(null)").fg(Color::DarkGrey),
        Some(Value::String(s)) => Cell::new(s),
        Some(Value::Number(n)) => Cell::new(n.to_string()).fg(Color::Yellow),
        Some(other) => Cell::new(other.to_string()),
    }
}

pub fn print_rows<T: serde::Serialize>(rows: &[T], columns: &[&str], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("(no rows)");
        return Ok(());
    }
    println!("{}", table(rows, columns)?);
    Ok(())
}
