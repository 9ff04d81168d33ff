//! Reporter runs: read, report, close

use crate::common::*;

const NAME: &str = "sample-reporter";

fn accept_all(recorder: &Recorder) -> MockReporter {
    MockReporter::new(recorder, |_, _| Ok(()))
}

#[test]
fn test_reporter_reports_everything_read() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).reading(vulns(3)).shared();

    run_reporter(
        &Context::background(),
        &accept_all(&recorder),
        options(NAME, id, store),
    )
    .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::Read {
                instance_id: id,
                query: None
            },
            Call::Report(vulns(3)),
            Call::Close,
        ]
    );
}

#[test]
fn test_reporter_no_findings_skips_stage() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).shared();

    run_reporter(
        &Context::background(),
        &accept_all(&recorder),
        options(NAME, id, store),
    )
    .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::Read {
                instance_id: id,
                query: None
            },
            Call::Close
        ]
    );
}

#[test]
fn test_reporter_read_error() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder)
        .read_with(|_| Err(sad("read exploded")))
        .shared();

    let err = run_reporter(
        &Context::background(),
        &accept_all(&recorder),
        options(NAME, id, store),
    )
    .unwrap_err();

    match &err {
        Error::Read {
            component,
            instance_id,
            ..
        } => {
            assert_eq!(component, NAME);
            assert_eq!(*instance_id, id);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(recorder.closes(), 1);
}

#[test]
fn test_reporter_stage_error() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).reading(vulns(1)).shared();
    let reporter = MockReporter::new(&recorder, |_, _| Err(sad("webhook down")));

    let err = run_reporter(&Context::background(), &reporter, options(NAME, id, store))
        .unwrap_err();

    assert_eq!(err.kind(), Some(StageKind::Reporter));
    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("webhook down")));
    assert_eq!(recorder.calls().last(), Some(&Call::Close));
}

#[test]
fn test_reporter_persists_nothing() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).reading(vulns(2)).shared();

    run_reporter(
        &Context::background(),
        &accept_all(&recorder),
        options(NAME, id, store),
    )
    .unwrap();

    assert!(!recorder
        .calls()
        .iter()
        .any(|c| matches!(c, Call::Update { .. } | Call::Write { .. })));
}

#[test]
fn test_reporter_panic() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).reading(vulns(1)).shared();
    let reporter = MockReporter::new(&recorder, |_, _| panic_with_error(Sad("reporter panicked")));

    let err = run_reporter(&Context::background(), &reporter, options(NAME, id, store))
        .unwrap_err();

    assert!(err.is_panic());
    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("reporter panicked")));
    assert_eq!(recorder.closes(), 1);
}

#[test]
fn test_reporter_close_error_after_success() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder)
        .reading(vulns(1))
        .close_with(|_| Err(sad("close exploded")))
        .shared();

    let err = run_reporter(
        &Context::background(),
        &accept_all(&recorder),
        options(NAME, id, store),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Close { .. }));
    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("close exploded")));
}
