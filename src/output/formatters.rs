use super::{JsonFormatter, Output, TableFormatter};
use crate::errors::Result;
use crate::result::AnalysisResult;

/// Exit code when the result holds no errors
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when at least one error was reported
pub const EXIT_ERRORS: i32 = 1;

/// Renders an [`AnalysisResult`] and decides the process exit code.
pub trait ErrorFormatter {
    fn format_errors(&self, result: &AnalysisResult, output: &mut Output) -> Result<i32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ErrorFormat {
    #[default]
    Table,
    Json,
}

pub fn create_formatter(format: ErrorFormat) -> Box<dyn ErrorFormatter> {
    match format {
        ErrorFormat::Table => Box::new(TableFormatter),
        ErrorFormat::Json => Box::new(JsonFormatter),
    }
}

pub(crate) fn exit_code_for(result: &AnalysisResult) -> i32 {
    if result.has_errors() {
        EXIT_ERRORS
    } else {
        EXIT_SUCCESS
    }
}

/// `path` relative to `base` when it lies below it, otherwise as given.
pub(crate) fn display_path(path: &std::path::Path, base: &std::path::Path) -> String {
    match pathdiff::diff_paths(path, base) {
        Some(relative) if !relative.starts_with("..") && !relative.as_os_str().is_empty() => {
            relative.display().to_string()
        }
        _ => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_display_path_relative_below_base() {
        assert_eq!(
            display_path(Path::new("/project/src/a.php"), Path::new("/project")),
            "src/a.php"
        );
    }

    #[test]
    fn test_display_path_outside_base_stays_absolute() {
        assert_eq!(
            display_path(Path::new("/elsewhere/a.php"), Path::new("/project")),
            "/elsewhere/a.php"
        );
    }

    #[test]
    fn test_create_formatter_for_each_format() {
        use crate::diagnostics::ClassifiedDiagnostics;
        use crate::output::{Output, SharedBuffer};

        let result = AnalysisResult::new(ClassifiedDiagnostics::default(), false, "/p".into());
        for format in [ErrorFormat::Table, ErrorFormat::Json] {
            let mut output = Output::new(SharedBuffer::new(), false, false);
            let code = create_formatter(format)
                .format_errors(&result, &mut output)
                .unwrap();
            assert_eq!(code, EXIT_SUCCESS);
        }
    }
}
