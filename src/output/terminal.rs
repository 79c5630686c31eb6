use super::formatters::{display_path, exit_code_for, ErrorFormatter};
use super::Output;
use crate::errors::Result;
use crate::result::AnalysisResult;
use colored::Colorize;
use comfy_table::{presets, ContentArrangement, Table};

/// Human-readable report: one table per file, then global messages, then a
/// one-line summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableFormatter;

fn new_table(decorated: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if decorated {
            presets::UTF8_FULL
        } else {
            presets::ASCII_FULL
        })
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn summary_line(result: &AnalysisResult, decorated: bool) -> String {
    if !result.has_errors() {
        let text = "[OK] No errors";
        return if decorated {
            text.green().bold().to_string()
        } else {
            text.to_string()
        };
    }

    let text = format!("[ERROR] Found {} errors", result.total_errors_count());
    if decorated {
        text.red().bold().to_string()
    } else {
        text
    }
}

impl ErrorFormatter for TableFormatter {
    fn format_errors(&self, result: &AnalysisResult, output: &mut Output) -> Result<i32> {
        let decorated = output.is_decorated();
        let base = result.current_directory();

        for (file, errors) in result.errors_by_file() {
            let mut table = new_table(decorated);
            table.set_header(vec!["Line".to_string(), display_path(file, base)]);
            for error in errors {
                let line = error.line.map(|l| l.to_string()).unwrap_or_default();
                table.add_row(vec![line, error.message.clone()]);
            }
            output.write_line(table.to_string())?;
            output.write_line("")?;
        }

        if !result.global_messages().is_empty() {
            let mut table = new_table(decorated);
            table.set_header(vec!["Error"]);
            for message in result.global_messages() {
                table.add_row(vec![message.as_str()]);
            }
            output.write_line(table.to_string())?;
            output.write_line("")?;
        }

        output.write_line(summary_line(result, decorated))?;

        if result.default_level_used() && result.has_errors() {
            let note = "Note: no analysis level was chosen, so the default level was used. \
                        Pass --level to choose one explicitly.";
            output.write_line(if decorated {
                note.yellow().to_string()
            } else {
                note.to_string()
            })?;
        }

        Ok(exit_code_for(result))
    }
}
