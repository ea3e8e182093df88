//! Plain-text tables over opaque JSON records.

use serde_json::Value;

use crate::types::Record;

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    /// Dotted path into the record, e.g. `school.name`.
    pub field: &'static str,
}

impl Column {
    pub const fn new(header: &'static str, field: &'static str) -> Self {
        Self { header, field }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub columns: &'static [Column],
}

impl Table {
    pub const fn new(columns: &'static [Column]) -> Self {
        Self { columns }
    }

    pub fn render(&self, rows: &[Record]) -> String {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| self.columns.iter().map(|c| cell(row, c.field)).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        push_line(&mut out, &headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &cells {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Text for one cell. Missing or null values show as `-`.
pub fn cell(record: &Record, field: &str) -> String {
    let mut current = record;
    for part in field.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return "-".to_string(),
        }
    }
    display(current)
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        Value::Object(map) => match map.get("name") {
            Some(name) => display(name),
            None => value.to_string(),
        },
    }
}
