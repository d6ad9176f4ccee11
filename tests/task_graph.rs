// tests/task_graph.rs

use std::time::Duration;

use labrun::errors::LabrunError;
use labrun::graph::{Runner, TaskGraph, TaskGraphBuilder, standard_graph};
use labrun_test_utils::builders::{ConfigFileBuilder, ProjectFixture};
use labrun_test_utils::fakes::{
    EventLog, FakeGenerator, FakeStyleCompiler, failing_task, recording_actions, recording_task,
};
use labrun_test_utils::{init_tracing, with_timeout};

fn runner_for(graph: TaskGraph, fixture: &ProjectFixture) -> Runner {
    let ctx = fixture.context(
        ConfigFileBuilder::new().build(),
        FakeGenerator::new(),
        FakeStyleCompiler::new(),
    );
    Runner::new(graph, ctx)
}

#[test]
fn build_plan_compiles_copies_then_generates() {
    let log = EventLog::new();
    let graph = standard_graph(recording_actions(&log)).unwrap();

    assert_eq!(
        graph.plan("patternlab:build").unwrap(),
        vec![
            "sass-compile",
            "pl-copy:js",
            "pl-copy:img",
            "pl-copy:favicon",
            "pl-copy:font",
            "pl-copy:css",
            "pl-copy:styleguide",
            "pl-copy:styleguide-css",
            "generate",
        ]
    );
    assert_eq!(graph.plan("default").unwrap(), graph.plan("patternlab:build").unwrap());

    let serve = graph.plan("patternlab:serve").unwrap();
    assert_eq!(&serve[serve.len() - 2..], ["patternlab:connect", "watch-files"]);
}

#[test]
fn every_standard_task_is_listed_with_a_composition() {
    let graph = standard_graph(recording_actions(&EventLog::new())).unwrap();
    for name in graph.names() {
        assert!(graph.composition(name).is_some(), "{name}");
    }
    assert!(graph.contains("serve"));
    assert!(graph.contains("patternlab:installplugin"));
    assert_eq!(
        graph.composition("pl-assets").unwrap(),
        "series(pl-copy:js -> pl-copy:img -> pl-copy:favicon -> pl-copy:font -> pl-copy:css -> \
         pl-copy:styleguide -> pl-copy:styleguide-css)"
    );
}

#[test]
fn unknown_plan_is_task_not_found() {
    let graph = standard_graph(recording_actions(&EventLog::new())).unwrap();
    assert!(matches!(graph.plan("nope"), Err(LabrunError::TaskNotFound(_))));
}

#[test]
fn invalid_graphs_are_rejected() {
    let log = EventLog::new();
    let a = || recording_task(&log, "a", Duration::ZERO);

    let dup = TaskGraphBuilder::new().action("a", a()).action("a", a()).build();
    assert!(matches!(dup, Err(LabrunError::ConfigError(_))));

    let unknown = TaskGraphBuilder::new().series("s", &["missing"]).build();
    assert!(matches!(unknown, Err(LabrunError::ConfigError(_))));

    let selfish = TaskGraphBuilder::new().series("s", &["s"]).build();
    assert!(matches!(selfish, Err(LabrunError::ConfigError(_))));

    let cycle = TaskGraphBuilder::new()
        .action("a", a())
        .series("x", &["a", "y"])
        .parallel("y", &["x"])
        .build();
    assert!(matches!(cycle, Err(LabrunError::GraphCycle(_))));
}

#[tokio::test]
async fn series_runs_in_order_and_stops_at_first_failure() {
    init_tracing();
    let fixture = ProjectFixture::new();
    let log = EventLog::new();

    let graph = TaskGraphBuilder::new()
        .action("one", recording_task(&log, "one", Duration::from_millis(20)))
        .action("two", failing_task(&log, "two"))
        .action("three", recording_task(&log, "three", Duration::ZERO))
        .series("all", &["one", "two", "three"])
        .build()
        .unwrap();

    let runner = runner_for(graph, &fixture);
    let result = with_timeout(runner.run("all")).await;

    assert!(result.is_err());
    assert_eq!(log.entries(), vec!["start:one", "end:one", "start:two"]);
}

#[tokio::test]
async fn parallel_children_overlap_and_all_finish() {
    init_tracing();
    let fixture = ProjectFixture::new();
    let log = EventLog::new();

    let graph = TaskGraphBuilder::new()
        .action("slow", recording_task(&log, "slow", Duration::from_millis(100)))
        .action("fast", recording_task(&log, "fast", Duration::from_millis(10)))
        .parallel("both", &["slow", "fast"])
        .build()
        .unwrap();

    let runner = runner_for(graph, &fixture);
    with_timeout(runner.run("both")).await.unwrap();

    let entries = log.entries();
    assert_eq!(entries.len(), 4);
    // Both started before the slow one finished.
    let slow_end = log.position("end:slow").unwrap();
    assert!(log.position("start:fast").unwrap() < slow_end);
    assert!(log.position("end:fast").unwrap() < slow_end);
}

#[tokio::test]
async fn parallel_failure_still_waits_for_siblings() {
    let fixture = ProjectFixture::new();
    let log = EventLog::new();

    let graph = TaskGraphBuilder::new()
        .action("ok", recording_task(&log, "ok", Duration::from_millis(50)))
        .action("bad", failing_task(&log, "bad"))
        .parallel("both", &["ok", "bad"])
        .build()
        .unwrap();

    let runner = runner_for(graph, &fixture);
    let result = with_timeout(runner.run("both")).await;

    assert!(result.is_err());
    assert!(log.position("end:ok").is_some());
}

#[tokio::test]
async fn running_an_unknown_task_fails() {
    let fixture = ProjectFixture::new();
    let graph = standard_graph(recording_actions(&EventLog::new())).unwrap();
    let runner = runner_for(graph, &fixture);

    let err = runner.run("patternlab:nope").await.unwrap_err();
    assert!(matches!(err, LabrunError::TaskNotFound(_)));
}

#[tokio::test]
async fn standard_build_runs_generate_last() {
    let fixture = ProjectFixture::new();
    let log = EventLog::new();
    let graph = standard_graph(recording_actions(&log)).unwrap();
    let runner = runner_for(graph, &fixture);

    with_timeout(runner.run("patternlab:build")).await.unwrap();

    let entries = log.entries();
    assert_eq!(entries.first().map(String::as_str), Some("start:sass-compile"));
    assert_eq!(entries.last().map(String::as_str), Some("end:generate"));
}
