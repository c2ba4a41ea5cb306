//! Best-effort source formatting applied before a paste is sealed.

use crate::language::Language;

const INDENT_SIZE: usize = 2;

/// Format `content` for display.
///
/// JSON is re-serialized with two-space indentation (key order preserved).
/// Everything else is re-indented by bracket depth. Blank input and JSON that
/// fails to parse come back untouched.
///
/// Numbers keep their `serde_json` rendering, so `1.0` stays `1.0` rather
/// than collapsing to `1`.
pub fn format_code(content: &str, language: Language) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }

    if language == Language::Json {
        return match serde_json::from_str::<serde_json::Value>(content) {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "JSON re-serialization failed");
                content.to_string()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "JSON formatting skipped");
                content.to_string()
            }
        };
    }

    reindent(content)
}

fn reindent(content: &str) -> String {
    let mut depth: usize = 0;
    content
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.starts_with(['}', ']', ')']) {
                depth = depth.saturating_sub(1);
            }
            let out = format!("{}{}", " ".repeat(depth * INDENT_SIZE), trimmed);
            if trimmed.ends_with(['{', '[', '(']) {
                depth += 1;
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}
