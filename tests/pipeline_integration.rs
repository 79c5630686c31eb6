mod common;

use analyse_runner::cache::{cache_key, CacheStore, MemoryCacheStore};
use analyse_runner::output::SharedBuffer;
use analyse_runner::progress::{ProgressEvent, RecordingProgressSink};
use analyse_runner::{
    Analyser, DirectoryScanner, EngineDiagnostic, FileError, MemoryWatchdog, Output,
    PathResolver, RunOptions, RunnerError,
};
use common::{sorted, touch, CapturingFormatter, ScriptedEngine};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn fixed_sample() -> Option<u64> {
    Some(3 * 1024 * 1024)
}

struct Fixture {
    dir: TempDir,
    store: Arc<MemoryCacheStore>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/Controller.php");
        touch(dir.path(), "src/Model/User.php");
        touch(dir.path(), "src/Model/UserTest.php");
        touch(dir.path(), "src/notes.txt");
        touch(dir.path(), "bin/console.php");
        Self {
            dir,
            store: Arc::new(MemoryCacheStore::new()),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn memory_file(&self) -> PathBuf {
        self.root().join("memory.txt")
    }

    fn analyser(&self, engine: ScriptedEngine) -> Analyser {
        let scanner = DirectoryScanner::new(Arc::clone(&self.store), vec!["php".to_string()]);
        Analyser::new(PathResolver::new(self.root()), scanner, engine).with_watchdog(
            MemoryWatchdog::new(self.memory_file()).with_sampler(fixed_sample),
        )
    }
}

fn quiet_output() -> Output {
    Output::new(SharedBuffer::new(), false, false)
}

fn batch() -> RunOptions {
    RunOptions {
        default_level_used: true,
        debug: false,
        enable_cache: true,
        clear_cache: false,
    }
}

#[test]
fn test_files_and_directories_are_merged_minus_exclusions() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture
        .analyser(engine.clone())
        .with_exclusion(|path: &Path| path.to_string_lossy().ends_with("Test.php"));
    let formatter = CapturingFormatter::new(0);

    let code = analyser
        .run(
            &["bin/console.php", "src"],
            &mut quiet_output(),
            &formatter,
            batch(),
        )
        .unwrap();

    assert_eq!(code, 0);
    let root = fixture.root();
    let call = engine.last_call();
    assert_eq!(call.files[0], root.join("bin/console.php"));
    assert_eq!(
        sorted(call.files),
        vec![
            root.join("bin/console.php"),
            root.join("src/Controller.php"),
            root.join("src/Model/User.php"),
        ]
    );
    assert!(!call.only_files);
    assert!(!call.debug);
}

#[test]
fn test_overlapping_inputs_are_deduplicated() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone());

    analyser
        .run(
            &["src/Controller.php", "src", "./src/../src/Controller.php"],
            &mut quiet_output(),
            &CapturingFormatter::new(0),
            batch(),
        )
        .unwrap();

    let files = engine.last_call().files;
    assert_eq!(files.len(), 3);
    assert_eq!(files[0], fixture.root().join("src/Controller.php"));
}

#[test]
fn test_only_files_stays_set_for_explicit_files() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone());

    analyser
        .run(
            &["src/Controller.php"],
            &mut quiet_output(),
            &CapturingFormatter::new(0),
            batch(),
        )
        .unwrap();

    assert!(engine.last_call().only_files);
}

#[test]
fn test_missing_path_adds_one_diagnostic_and_run_continues() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone());
    let formatter = CapturingFormatter::new(1);

    let code = analyser
        .run(
            &["does/not/exist.php", "bin"],
            &mut quiet_output(),
            &formatter,
            batch(),
        )
        .unwrap();

    assert_eq!(code, 1);
    assert_eq!(
        engine.last_call().files,
        vec![fixture.root().join("bin/console.php")]
    );

    let result = formatter.result();
    let missing = fixture.root().join("does/not/exist.php");
    assert_eq!(result.file_errors(), &[FileError::missing_path(&missing)]);
    assert!(!result.file_errors()[0].semantic);
    assert!(result.global_messages().is_empty());
}

#[test]
fn test_empty_path_list_fails_before_any_work() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone());
    let formatter = CapturingFormatter::new(0);
    let no_paths: [&str; 0] = [];

    let err = analyser
        .run(&no_paths, &mut quiet_output(), &formatter, batch())
        .unwrap_err();

    assert!(matches!(err, RunnerError::NoPaths));
    assert_eq!(formatter.calls(), 0);
    assert!(engine.calls().is_empty());
    assert!(fixture.store.is_empty());
    assert!(!fixture.memory_file().exists());
}

#[test]
fn test_engine_diagnostics_are_classified() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(vec![
        EngineDiagnostic::from("oops"),
        FileError::new("Call to undefined method", "a.ext", Some(3)).into(),
    ]);
    let mut analyser = fixture.analyser(engine);
    let formatter = CapturingFormatter::new(42);

    let code = analyser
        .run(&["bin"], &mut quiet_output(), &formatter, batch())
        .unwrap();

    assert_eq!(code, 42);
    let result = formatter.result();
    assert_eq!(result.global_messages(), &["oops".to_string()]);
    assert_eq!(result.file_errors().len(), 1);
    assert_eq!(result.file_errors()[0].file, PathBuf::from("a.ext"));
    assert_eq!(result.file_errors()[0].line, Some(3));
    assert!(result.default_level_used());
}

#[test]
fn test_missing_paths_come_before_engine_diagnostics() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(vec![FileError::new("bad", "x.php", None).into()]);
    let mut analyser = fixture.analyser(engine);
    let formatter = CapturingFormatter::new(1);

    analyser
        .run(&["bin", "gone"], &mut quiet_output(), &formatter, batch())
        .unwrap();

    let files: Vec<PathBuf> = formatter
        .result()
        .file_errors()
        .iter()
        .map(|e| e.file.clone())
        .collect();
    assert_eq!(files, vec![fixture.root().join("gone"), PathBuf::from("x.php")]);
}

#[test]
fn test_unrecognized_diagnostic_aborts_without_formatting() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(vec![
        EngineDiagnostic::from("fine"),
        EngineDiagnostic::Unrecognized(json!({ "severity": 3 })),
    ]);
    let mut analyser = fixture.analyser(engine);
    let formatter = CapturingFormatter::new(0);

    let err = analyser
        .run(&["bin"], &mut quiet_output(), &formatter, batch())
        .unwrap_err();

    assert!(err.is_contract_violation());
    assert_eq!(formatter.calls(), 0);
}

#[test]
fn test_base_directory_comes_from_first_input() {
    let fixture = Fixture::new();
    let mut analyser = fixture.analyser(ScriptedEngine::new(Vec::new()));
    let formatter = CapturingFormatter::new(0);

    analyser
        .run(&["src/Model", "bin"], &mut quiet_output(), &formatter, batch())
        .unwrap();

    assert_eq!(
        formatter.result().current_directory(),
        fixture.root().join("src")
    );
}

#[test]
fn test_second_run_uses_cache_without_walking() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone());

    analyser
        .run(&["src"], &mut quiet_output(), &CapturingFormatter::new(0), batch())
        .unwrap();
    let first = engine.last_call();
    assert_eq!(
        fixture
            .store
            .load(&cache_key(&fixture.root().join("src")))
            .unwrap()
            .map(sorted),
        Some(sorted(first.files.clone()))
    );

    // Files removed behind the cache's back stay listed
    std::fs::remove_file(fixture.root().join("src/Controller.php")).unwrap();

    analyser
        .run(&["src"], &mut quiet_output(), &CapturingFormatter::new(0), batch())
        .unwrap();
    let second = engine.last_call();

    assert_eq!(second.files, first.files);
    // A cache hit does not clear the flag the way a fresh walk does
    assert!(!first.only_files);
    assert!(second.only_files);
}

#[test]
fn test_clear_cache_forces_fresh_walk() {
    let fixture = Fixture::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone());

    analyser
        .run(&["src"], &mut quiet_output(), &CapturingFormatter::new(0), batch())
        .unwrap();
    std::fs::remove_file(fixture.root().join("src/Controller.php")).unwrap();

    let options = RunOptions {
        clear_cache: true,
        ..batch()
    };
    analyser
        .run(&["src"], &mut quiet_output(), &CapturingFormatter::new(0), options)
        .unwrap();

    let call = engine.last_call();
    assert_eq!(call.files.len(), 2);
    assert!(!call.only_files);
    assert!(!call.files.contains(&fixture.root().join("src/Controller.php")));
}

#[test]
fn test_disabled_cache_is_never_written() {
    let fixture = Fixture::new();
    let mut analyser = fixture.analyser(ScriptedEngine::new(Vec::new()));
    let options = RunOptions {
        enable_cache: false,
        ..batch()
    };

    analyser
        .run(&["src"], &mut quiet_output(), &CapturingFormatter::new(0), options)
        .unwrap();

    assert!(fixture.store.is_empty());
}

#[test]
fn test_batch_progress_starts_and_finishes_once() {
    let fixture = Fixture::new();
    let recorder = RecordingProgressSink::new();
    let mut analyser = fixture
        .analyser(ScriptedEngine::new(Vec::new()))
        .with_progress(recorder.clone());

    analyser
        .run(&["src"], &mut quiet_output(), &CapturingFormatter::new(0), batch())
        .unwrap();

    assert_eq!(recorder.events()[0], ProgressEvent::Start { total: 3 });
    assert_eq!(recorder.starts(), 1);
    assert_eq!(recorder.advanced(), 3);
    assert_eq!(recorder.finishes(), 1);
}

#[test]
fn test_progress_never_starts_without_files() {
    let fixture = Fixture::new();
    touch(fixture.root(), "docs/readme.txt");
    let recorder = RecordingProgressSink::new();
    let mut analyser = fixture
        .analyser(ScriptedEngine::new(Vec::new()))
        .with_progress(recorder.clone());

    analyser
        .run(&["docs"], &mut quiet_output(), &CapturingFormatter::new(0), batch())
        .unwrap();

    assert!(recorder.events().is_empty());
}

#[test]
fn test_debug_mode_echoes_files_and_skips_progress() {
    let fixture = Fixture::new();
    let recorder = RecordingProgressSink::new();
    let engine = ScriptedEngine::new(Vec::new());
    let mut analyser = fixture.analyser(engine.clone()).with_progress(recorder.clone());
    let buffer = SharedBuffer::new();
    let mut output = Output::new(buffer.clone(), true, false);
    let options = RunOptions {
        debug: true,
        ..batch()
    };

    analyser
        .run(&["bin"], &mut output, &CapturingFormatter::new(0), options)
        .unwrap();

    let text = buffer.contents();
    assert!(text.contains("1 files found in"));
    assert!(text.contains(&fixture.root().join("bin/console.php").display().to_string()));
    assert!(recorder.events().is_empty());
    assert!(engine.last_call().debug);
}

#[test]
fn test_watchdog_records_memory_during_run() {
    let fixture = Fixture::new();
    let mut analyser = fixture.analyser(ScriptedEngine::new(Vec::new()));

    analyser
        .run(&["gone"], &mut quiet_output(), &CapturingFormatter::new(1), batch())
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(fixture.memory_file()).unwrap(),
        "3 MB"
    );
}
