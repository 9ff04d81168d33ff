//! Scanner runs: transform, write, close

use crate::common::*;

const NAME: &str = "sample-scanner";

#[test]
fn test_scanner_writes_findings() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).shared();
    let scanner = MockScanner::new(&recorder, |_| Ok(raw_findings(3)));

    run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::Transform,
            Call::Write {
                instance_id: id,
                findings: raw_findings(3),
            },
            Call::Close,
        ]
    );
}

#[test]
fn test_scanner_never_reads() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).reading(vulns(5)).shared();
    let scanner = MockScanner::new(&recorder, |_| Ok(raw_findings(1)));

    run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap();

    assert!(!recorder
        .calls()
        .iter()
        .any(|c| matches!(c, Call::Read { .. })));
}

#[test]
fn test_scanner_empty_output_skips_write() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).shared();
    let scanner = MockScanner::new(&recorder, |_| Ok(Vec::new()));

    run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap();

    assert_eq!(recorder.calls(), vec![Call::Transform, Call::Close]);
}

#[test]
fn test_scanner_transform_error() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).shared();
    let scanner = MockScanner::new(&recorder, |_| Err(sad("unparsable report")));

    let err = run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap_err();

    assert!(matches!(
        err,
        Error::Stage {
            kind: StageKind::Scanner,
            ..
        }
    ));
    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("unparsable report")));
    assert_eq!(recorder.calls(), vec![Call::Transform, Call::Close]);
}

#[test]
fn test_scanner_write_error() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder)
        .write_with(|_, _| Err(sad("write exploded")))
        .shared();
    let scanner = MockScanner::new(&recorder, |_| Ok(raw_findings(2)));

    let err = run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap_err();

    assert!(matches!(
        err,
        Error::Persist {
            op: PersistOp::Write,
            kind: StageKind::Scanner,
            ..
        }
    ));
    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("write exploded")));
    assert_eq!(recorder.closes(), 1);
}

#[test]
fn test_scanner_panic() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder).shared();
    let scanner = MockScanner::new(&recorder, |_| panic_with_error(Sad("scanner panicked")));

    let err = run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap_err();

    assert!(err.is_panic());
    assert_eq!(err.kind(), Some(StageKind::Scanner));
    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("scanner panicked")));
    assert_eq!(recorder.calls(), vec![Call::Transform, Call::Close]);
}

#[test]
fn test_scanner_close_error_after_write_error_keeps_write_error() {
    let recorder = Recorder::default();
    let id = InstanceId::new();
    let store = MockStore::new(&recorder)
        .write_with(|_, _| Err(sad("write exploded")))
        .close_with(|_| Err(sad("close exploded")))
        .shared();
    let scanner = MockScanner::new(&recorder, |_| Ok(raw_findings(2)));

    let err = run_scanner(&Context::background(), &scanner, options(NAME, id, store)).unwrap_err();

    assert_eq!(err.find_cause::<Sad>(), Some(&Sad("write exploded")));
}

#[test]
fn test_scanner_default_component_name_in_errors() {
    let recorder = Recorder::default();
    let store = MockStore::new(&recorder).shared();
    let scanner = MockScanner::new(&recorder, |_| Err(sad("nope")));

    let err = run_scanner(
        &Context::background(),
        &scanner,
        [runner_with_storer(store), runner_with_logger(Logger::noop())],
    )
    .unwrap_err();

    match err {
        Error::Stage { component, .. } => assert_eq!(component, "unnamed-component"),
        other => panic!("unexpected error: {:?}", other),
    }
}
