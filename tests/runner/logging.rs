//! Log routing: injected logger first, then the context's logger

use crate::common::*;

#[test]
fn test_injected_logger_captures_run() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).reading(vulns(2)).shared();
    let enricher = MockEnricher::new(&recorder, |_, findings| {
        tracing::info!(count = findings.len(), "annotating from inside the stage");
        Ok(findings)
    });

    run_enricher(
        &Context::background(),
        &enricher,
        [
            runner_with_logger(buffer.logger()),
            runner_with_component_name("logged-enricher"),
            runner_with_instance_id(id),
            runner_with_storer(store),
        ],
    )
    .unwrap();

    let logs = buffer.contents();
    assert!(logs.contains("starting component"));
    assert!(logs.contains("logged-enricher"));
    assert!(logs.contains(&id.to_string()));
    assert!(logs.contains("annotating from inside the stage"));
    assert!(logs.contains("component completed"));
}

#[test]
fn test_context_logger_used_when_none_injected() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let ctx = Context::background().with_logger(buffer.logger());
    let store = MockStore::new(&recorder).shared();
    let target = MockTarget::new(&recorder, |_| Ok(()));

    run_target(
        &ctx,
        &target,
        [
            runner_with_component_name("ctx-logged-target"),
            runner_with_storer(store),
        ],
    )
    .unwrap();

    let logs = buffer.contents();
    assert!(logs.contains("starting component"));
    assert!(logs.contains("ctx-logged-target"));
}

#[test]
fn test_stage_sees_run_logger_on_context() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let store = MockStore::new(&recorder).shared();
    let target = MockTarget::new(&recorder, |ctx| {
        let logger = logger_from_context(ctx);
        logger.in_scope(|| tracing::warn!("logged through the context"));
        Ok(())
    });

    run_target(
        &Context::background(),
        &target,
        [
            runner_with_logger(buffer.logger()),
            runner_with_storer(store),
        ],
    )
    .unwrap();

    assert!(buffer.contents().contains("logged through the context"));
}

#[test]
fn test_failures_are_logged() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let store = MockStore::new(&recorder).shared();
    let scanner = MockScanner::new(&recorder, |_| Err(sad("scanner exploded")));

    let err = run_scanner(
        &Context::background(),
        &scanner,
        [
            runner_with_logger(buffer.logger()),
            runner_with_storer(store),
        ],
    )
    .unwrap_err();

    let logs = buffer.contents();
    assert!(logs.contains("component failed"));
    assert!(logs.contains(&err.to_string()));
}

#[test]
fn test_noop_logger_writes_nothing() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let ctx = Context::background().with_logger(buffer.logger());
    let store = MockStore::new(&recorder).shared();
    let target = MockTarget::new(&recorder, |_| Ok(()));

    run_target(
        &ctx,
        &target,
        [runner_with_logger(Logger::noop()), runner_with_storer(store)],
    )
    .unwrap();

    assert!(buffer.contents().is_empty());
}

#[test]
fn test_close_failure_after_stage_failure_is_logged() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let store = MockStore::new(&recorder)
        .close_with(|_| Err(sad("close exploded")))
        .shared();
    let scanner = MockScanner::new(&recorder, |_| Err(sad("scanner exploded")));

    let err = run_scanner(
        &Context::background(),
        &scanner,
        [
            runner_with_logger(buffer.logger()),
            runner_with_storer(store),
        ],
    )
    .unwrap_err();

    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("scanner exploded")));
    let logs = buffer.contents();
    assert!(logs.contains("could not close store after failure"));
    assert!(logs.contains("close exploded"));
    assert_eq!(recorder.calls(), vec![Call::Transform, Call::Close]);
}

#[test]
fn test_error_panic_is_logged_with_stack_trace() {
    let recorder = Recorder::default();
    let buffer = LogBuffer::default();
    let store = MockStore::new(&recorder).shared();
    let target = MockTarget::new(&recorder, |_| panic_with_error(Sad("target panicked")));

    let err = run_target(
        &Context::background(),
        &target,
        [
            runner_with_logger(buffer.logger()),
            runner_with_storer(store),
        ],
    )
    .unwrap_err();

    assert!(err.is_panic());
    let logs = buffer.contents();
    assert!(logs.contains("received a panic, check the stack trace for more information"));
    assert!(logs.contains("panic_stack_trace="));
    assert!(logs.contains("target panicked"));
}
