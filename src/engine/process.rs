use super::{AnalysisEngine, FileHooks};
use crate::diagnostics::{EngineDiagnostic, FileError};
use crate::errors::{Result, RunnerError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs an external analyser once per file.
///
/// The command is invoked as `command args... <file>`. Every non-empty line
/// it prints on stdout is one JSON diagnostic: a string is a global message,
/// an object with `message` and `file` is a file error.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: String,
    args: Vec<String>,
    level: Option<String>,
}

impl ProcessEngine {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            level: None,
        }
    }

    /// Strictness level exported as `ANALYSE_RUNNER_LEVEL`
    pub fn with_level(mut self, level: Option<String>) -> Self {
        self.level = level;
        self
    }

    fn analyse_file(&self, file: &Path, only_files: bool, debug: bool) -> Result<Vec<EngineDiagnostic>> {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(file)
            .env("ANALYSE_RUNNER_ONLY_FILES", bool_env(only_files))
            .env("ANALYSE_RUNNER_DEBUG", bool_env(debug));
        if let Some(level) = &self.level {
            command.env("ANALYSE_RUNNER_LEVEL", level);
        }

        let output = command
            .output()
            .map_err(|e| RunnerError::engine_io(format!("failed to run `{}`", self.command), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let diagnostics: Vec<EngineDiagnostic> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(EngineDiagnostic::from_json_line)
            .collect();

        if !output.status.success() && diagnostics.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut message = format!("`{}` failed ({})", self.command, output.status);
            if !stderr.trim().is_empty() {
                message.push_str(": ");
                message.push_str(stderr.trim());
            }
            log::debug!("{} on {}", message, file.display());
            return Ok(vec![FileError::new(message, file, None).into()]);
        }

        Ok(diagnostics)
    }
}

fn bool_env(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl AnalysisEngine for ProcessEngine {
    fn analyse(
        &mut self,
        files: &[PathBuf],
        only_files: bool,
        hooks: &mut FileHooks<'_>,
        debug: bool,
    ) -> Result<Vec<EngineDiagnostic>> {
        let mut diagnostics = Vec::new();
        for file in files {
            hooks.before_file(file)?;
            diagnostics.extend(self.analyse_file(file, only_files, debug)?);
            hooks.after_file();
        }
        Ok(diagnostics)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> ProcessEngine {
        ProcessEngine::new("sh", vec!["-c".into(), script.into(), "sh".into()])
    }

    fn run(engine: &mut ProcessEngine, files: &[PathBuf]) -> Result<Vec<EngineDiagnostic>> {
        let mut hooks = FileHooks::batch(|| {});
        engine.analyse(files, true, &mut hooks, false)
    }

    #[test]
    fn test_decodes_messages_and_file_errors() {
        let mut engine = shell(
            r#"echo '"oops"'; printf '{"message":"bad","file":"%s","line":3}\n' "$1"; echo plain text"#,
        );

        let diagnostics = run(&mut engine, &[PathBuf::from("/p/a.php")]).unwrap();

        assert_eq!(
            diagnostics,
            vec![
                EngineDiagnostic::from("oops"),
                FileError::new("bad", "/p/a.php", Some(3)).into(),
                EngineDiagnostic::from("plain text"),
            ]
        );
    }

    #[test]
    fn test_passes_flags_through_environment() {
        let mut engine = shell(
            r#"printf '"%s %s %s"\n' "$ANALYSE_RUNNER_ONLY_FILES" "$ANALYSE_RUNNER_DEBUG" "$ANALYSE_RUNNER_LEVEL""#,
        )
        .with_level(Some("5".into()));

        let diagnostics = run(&mut engine, &[PathBuf::from("/p/a.php")]).unwrap();

        assert_eq!(diagnostics, vec![EngineDiagnostic::from("1 0 5")]);
    }

    #[test]
    fn test_silent_failure_becomes_file_error() {
        let mut engine = shell("echo boom >&2; exit 3");

        let diagnostics = run(&mut engine, &[PathBuf::from("/p/a.php")]).unwrap();

        match diagnostics.as_slice() {
            [EngineDiagnostic::File(error)] => {
                assert_eq!(error.file, PathBuf::from("/p/a.php"));
                assert!(error.message.contains("boom"));
            }
            other => panic!("unexpected diagnostics: {:?}", other),
        }
    }

    #[test]
    fn test_other_json_is_unrecognized() {
        let mut engine = shell("echo 42");
        let diagnostics = run(&mut engine, &[PathBuf::from("/p/a.php")]).unwrap();
        assert!(matches!(diagnostics[0], EngineDiagnostic::Unrecognized(_)));
    }

    #[test]
    fn test_missing_command_is_fatal() {
        let mut engine = ProcessEngine::new("/definitely/not/an/analyser", Vec::new());
        let err = run(&mut engine, &[PathBuf::from("/p/a.php")]).unwrap_err();
        assert!(matches!(err, RunnerError::Engine { .. }));
    }

    #[test]
    fn test_hooks_run_per_file() {
        let mut engine = shell("true");
        let mut count = 0;
        {
            let mut hooks = FileHooks::batch(|| count += 1);
            engine
                .analyse(
                    &[PathBuf::from("/a.php"), PathBuf::from("/b.php")],
                    false,
                    &mut hooks,
                    false,
                )
                .unwrap();
        }
        assert_eq!(count, 2);
    }
}
