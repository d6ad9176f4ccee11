#![allow(dead_code)]

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parcel_sourcemap::{OriginalLocation, SourceMap};
use tokio::sync::{mpsc, watch};

use labrun::engine::RuntimeEvent;
use labrun::errors::{LabrunError, Result};
use labrun::exec::ReactionBackend;
use labrun::generator::{BuildCompletion, GeneratorFuture, PatternGenerator, PendingBuild};
use labrun::graph::{ActionSet, Task, task_fn};
use labrun::styles::compiler::CompileFuture;
use labrun::styles::{StyleCompileError, StyleCompiler};
use labrun::types::{TaskName, TaskOutcome};

/// Shared, ordered log of things that happened during a test.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Pattern generator double.
///
/// Builds either complete inside the call or hand back a pending build that
/// finishes only after [`FakeGenerator::release`].
#[derive(Debug, Clone)]
pub struct FakeGenerator {
    log: EventLog,
    deferred: bool,
    fail: bool,
    release: Arc<watch::Sender<bool>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        let (release, _) = watch::channel(false);
        Self {
            log: EventLog::new(),
            deferred: false,
            fail: false,
            release: Arc::new(release),
        }
    }

    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Share a log with other fakes so their relative order can be asserted.
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Let every pending build finish.
    pub fn release(&self) {
        self.release.send_replace(true);
    }

    fn complete(&self, op: String) -> Result<BuildCompletion> {
        if self.fail {
            return Err(LabrunError::GeneratorError(format!("{op} failed")));
        }
        if !self.deferred {
            self.log.push(format!("{op}:done"));
            return Ok(BuildCompletion::Completed);
        }

        let mut rx = self.release.subscribe();
        let log = self.log.clone();
        Ok(BuildCompletion::Pending(PendingBuild::new(async move {
            let released = rx.wait_for(|released| *released).await.is_ok();
            if !released {
                return Err(LabrunError::GeneratorError(format!("{op} abandoned")));
            }
            log.push(format!("{op}:done"));
            Ok(())
        })))
    }

    fn simple(&self, op: String) -> GeneratorFuture<'_, ()> {
        self.log.push(op.clone());
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(LabrunError::GeneratorError(format!("{op} failed")))
            } else {
                Ok(())
            }
        })
    }
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternGenerator for FakeGenerator {
    fn build(&self, clean: bool) -> Result<BuildCompletion> {
        self.log.push(format!("build clean={clean}"));
        self.complete("build".to_string())
    }

    fn patterns_only(&self, clean: bool) -> Result<BuildCompletion> {
        self.log.push(format!("patterns-only clean={clean}"));
        self.complete("patterns-only".to_string())
    }

    fn version(&self) -> GeneratorFuture<'_, ()> {
        self.simple("version".to_string())
    }

    fn help(&self) -> GeneratorFuture<'_, ()> {
        self.simple("help".to_string())
    }

    fn list_starterkits(&self) -> GeneratorFuture<'_, ()> {
        self.simple("liststarterkits".to_string())
    }

    fn load_starterkit<'a>(&'a self, kit: &'a str, clean: bool) -> GeneratorFuture<'a, ()> {
        self.simple(format!("loadstarterkit {kit} clean={clean}"))
    }

    fn install_plugin<'a>(&'a self, plugin: &'a str) -> GeneratorFuture<'a, ()> {
        self.simple(format!("installplugin {plugin}"))
    }
}

// ---------------------------------------------------------------------------
// Style compiler
// ---------------------------------------------------------------------------

/// Source name recorded in the maps the fake compiler emits.
pub const FAKE_MAP_SOURCE: &str = "fake.scss";

/// Inline source map sending every line of `css` to the same line of
/// [`FAKE_MAP_SOURCE`], the way a compiler that passes CSS through would.
pub fn line_for_line_map(css: &str) -> String {
    let mut map = SourceMap::new("/");
    let source = map.add_source(FAKE_MAP_SOURCE);
    for line in 0..css.lines().count() as u32 {
        map.add_mapping(
            line,
            0,
            Some(OriginalLocation {
                original_line: line,
                original_column: 0,
                source,
                name: None,
            }),
        );
    }
    let url = map.to_data_url(None).expect("encode fake source map");
    format!("/*# sourceMappingURL={url} */")
}

#[derive(Debug, Clone)]
struct ScriptedFailure {
    file_name: String,
    line: u32,
    message: String,
    /// `None` fails every time.
    remaining: Option<usize>,
}

/// Treats its input as plain CSS and appends a line-for-line source map.
/// Scripted entries fail with a positioned error, always or a set number
/// of times. Clones share their script and their record of inputs.
#[derive(Debug, Clone, Default)]
pub struct FakeStyleCompiler {
    failures: Arc<Mutex<Vec<ScriptedFailure>>>,
    seen: EventLog,
}

impl FakeStyleCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, file_name: &str, line: u32, message: &str, remaining: Option<usize>) -> Self {
        self.failures.lock().unwrap().push(ScriptedFailure {
            file_name: file_name.to_string(),
            line,
            message: message.to_string(),
            remaining,
        });
        self
    }

    pub fn fail_on(self, file_name: &str, line: u32, message: &str) -> Self {
        self.script(file_name, line, message, None)
    }

    /// Fail the first compile of `file_name` only.
    pub fn fail_once_on(self, file_name: &str, line: u32, message: &str) -> Self {
        self.script(file_name, line, message, Some(1))
    }

    /// Sources handed to the compiler, glob imports already expanded.
    pub fn seen(&self) -> Vec<String> {
        self.seen.entries()
    }

    fn scripted_failure(&self, file_name: &str) -> Option<(u32, String)> {
        let mut failures = self.failures.lock().unwrap();
        let failure = failures
            .iter_mut()
            .find(|f| f.file_name == file_name && f.remaining != Some(0))?;
        if let Some(remaining) = failure.remaining.as_mut() {
            *remaining -= 1;
        }
        Some((failure.line, failure.message.clone()))
    }
}

impl StyleCompiler for FakeStyleCompiler {
    fn compile<'a>(&'a self, source: String, file: &'a Path, _load_path: &'a Path) -> CompileFuture<'a> {
        Box::pin(async move {
            self.seen.push(source.clone());

            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Some((line, message)) = self.scripted_failure(&name) {
                return Err(StyleCompileError {
                    file: file.to_string_lossy().into_owned(),
                    line: Some(line),
                    column: Some(1),
                    status: 65,
                    message,
                });
            }

            Ok(format!("{source}\n{}\n", line_for_line_map(&source)))
        })
    }
}

// ---------------------------------------------------------------------------
// Reaction backend
// ---------------------------------------------------------------------------

/// Records dispatched reactions. With auto-completion on, every reaction
/// immediately reports `outcome` back to the runtime.
pub struct FakeBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    dispatched: Arc<Mutex<Vec<(String, Vec<TaskName>)>>>,
    auto_complete: Option<TaskOutcome>,
}

impl FakeBackend {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        dispatched: Arc<Mutex<Vec<(String, Vec<TaskName>)>>>,
    ) -> Self {
        Self {
            runtime_tx,
            dispatched,
            auto_complete: Some(TaskOutcome::Success),
        }
    }

    /// Leave completion to the test.
    pub fn manual(mut self) -> Self {
        self.auto_complete = None;
        self
    }

    pub fn completing_with(mut self, outcome: TaskOutcome) -> Self {
        self.auto_complete = Some(outcome);
        self
    }
}

impl ReactionBackend for FakeBackend {
    fn run_reaction(
        &mut self,
        subscription: String,
        tasks: Vec<TaskName>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let dispatched = Arc::clone(&self.dispatched);
        let outcome = self.auto_complete.clone();

        Box::pin(async move {
            dispatched
                .lock()
                .unwrap()
                .push((subscription.clone(), tasks));

            if let Some(outcome) = outcome {
                tokio::spawn(async move {
                    let _ = tx
                        .send(RuntimeEvent::ReactionCompleted {
                            subscription,
                            outcome,
                        })
                        .await;
                });
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Task that logs `start:<name>` and `end:<name>` around an optional delay.
pub fn recording_task(log: &EventLog, name: &str, delay: Duration) -> Arc<dyn Task> {
    let log = log.clone();
    let name = name.to_string();
    task_fn(move |_runner| {
        let log = log.clone();
        let name = name.clone();
        async move {
            log.push(format!("start:{name}"));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            log.push(format!("end:{name}"));
            Ok(())
        }
    })
}

/// Task that logs `start:<name>` and then fails.
pub fn failing_task(log: &EventLog, name: &str) -> Arc<dyn Task> {
    let log = log.clone();
    let name = name.to_string();
    task_fn(move |_runner| {
        let log = log.clone();
        let name = name.clone();
        async move {
            log.push(format!("start:{name}"));
            Err(LabrunError::Other(anyhow::anyhow!("{name} failed")))
        }
    })
}

/// Every standard action replaced by a [`recording_task`].
pub fn recording_actions(log: &EventLog) -> ActionSet {
    ActionSet::action_names().fold(ActionSet::builtin(), |set, name| {
        set.with(name, recording_task(log, name, Duration::ZERO))
    })
}
