use super::formatters::{display_path, exit_code_for, ErrorFormatter};
use super::Output;
use crate::errors::Result;
use crate::result::AnalysisResult;
use serde_json::{json, Map, Value};

/// Machine-readable report: totals, file errors grouped by path, and global
/// messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

pub fn build_report(result: &AnalysisResult) -> Value {
    let base = result.current_directory();
    let mut files = Map::new();
    for (file, errors) in result.errors_by_file() {
        let messages: Vec<Value> = errors
            .iter()
            .map(|error| {
                json!({
                    "message": error.message,
                    "line": error.line,
                    "semantic": error.semantic,
                })
            })
            .collect();
        files.insert(
            display_path(file, base),
            json!({ "errors": messages.len(), "messages": messages }),
        );
    }

    json!({
        "totals": {
            "errors": result.global_messages().len(),
            "file_errors": result.file_errors().len(),
        },
        "files": files,
        "errors": result.global_messages(),
    })
}

impl ErrorFormatter for JsonFormatter {
    fn format_errors(&self, result: &AnalysisResult, output: &mut Output) -> Result<i32> {
        let report = serde_json::to_string_pretty(&build_report(result))?;
        output.write_line(report)?;
        Ok(exit_code_for(result))
    }
}
