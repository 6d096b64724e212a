//! Text rendering of `Results` at a given verbosity and float precision.
//!
//! - verbosity 0: one condensed line of values, no labels
//! - verbosity 1..=3: one `label: value` line per entry, groups indented
//! - verbosity >= 4: as above plus entries marked `debug`
//!
//! Every float anywhere in the tree is printed with `precision` digits after
//! the decimal point; integers are printed as integers. Control characters in
//! text values are escaped so every entry stays on its own line.

use std::collections::HashSet;

use crate::results::{Results, Value};
use crate::{MungeError, MungeResult};

/// Digits after the decimal point when no precision is requested.
pub const DEFAULT_PRECISION: usize = 3;

/// Lowest verbosity at which debug entries are shown.
pub const DEBUG_VERBOSITY: u8 = 4;

const INDENT: &str = "  ";

/// Render `results` as text.
///
/// Fails with `UnrenderableResult` for trees with empty or duplicate labels.
pub fn format_results(
    results: &Results,
    verbosity: u8,
    precision: Option<usize>,
) -> MungeResult<String> {
    validate(results, "")?;

    let style = Style {
        precision: precision.unwrap_or(DEFAULT_PRECISION),
        show_debug: verbosity >= DEBUG_VERBOSITY,
    };
    let mut out = String::new();
    if verbosity == 0 {
        out.push_str(&style.condensed_group(results));
    } else {
        style.expanded(results, 0, &mut out);
    }
    Ok(out)
}

/// Format one float the way `format_results` does.
pub fn format_float(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Text with control characters replaced by their `\n`-style escapes.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

fn validate(results: &Results, path: &str) -> MungeResult<()> {
    let mut seen = HashSet::new();
    for (i, entry) in results.entries().iter().enumerate() {
        if entry.label.trim().is_empty() {
            return Err(MungeError::UnrenderableResult {
                path: join_path(path, &format!("#{i}")),
                reason: "empty label".to_string(),
            });
        }
        let entry_path = join_path(path, &entry.label);
        if entry.label.chars().any(char::is_control) {
            return Err(MungeError::UnrenderableResult {
                path: escape_text(&entry_path),
                reason: "control character in label".to_string(),
            });
        }
        if !seen.insert(entry.label.as_str()) {
            return Err(MungeError::UnrenderableResult {
                path: entry_path,
                reason: "duplicate label".to_string(),
            });
        }
        validate_value(&entry.value, &entry_path)?;
    }
    Ok(())
}

fn validate_value(value: &Value, path: &str) -> MungeResult<()> {
    match value {
        Value::Group(group) => validate(group, path),
        Value::List(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| validate_value(item, &format!("{path}[{i}]"))),
        _ => Ok(()),
    }
}

struct Style {
    precision: usize,
    show_debug: bool,
}

impl Style {
    fn scalar(&self, value: &Value) -> String {
        match value {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f, self.precision),
            Value::Text(s) => escape_text(s),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| self.scalar(v)).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Group(group) => format!("({})", self.condensed_group(group)),
        }
    }

    fn condensed_group(&self, results: &Results) -> String {
        results
            .entries()
            .iter()
            .filter(|e| self.show_debug || !e.debug)
            .map(|e| self.scalar(&e.value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn expanded(&self, results: &Results, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        for entry in results.entries() {
            if entry.debug && !self.show_debug {
                continue;
            }
            let marker = if entry.debug { " [debug]" } else { "" };
            match &entry.value {
                Value::Group(group) => {
                    out.push_str(&format!("{indent}{}{marker}:\n", entry.label));
                    self.expanded(group, depth + 1, out);
                }
                value => {
                    out.push_str(&format!(
                        "{indent}{}{marker}: {}\n",
                        entry.label,
                        self.scalar(value)
                    ));
                }
            }
        }
    }
}
