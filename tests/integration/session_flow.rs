//! Integration tests for the materialize → generate pipeline

use evgen::collision::CollisionSpec;
use evgen::error::SessionError;
use evgen::session::LaunchOptions;
use evgen::cards::ParamSet;
use std::fs;
use tempfile::TempDir;

use crate::integration::{recording_session, RecordingRunner};

#[test]
fn test_pp_ttbar_end_to_end() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    let pp = CollisionSpec::builder("p p", "t t~")
        .energies("6500", "6500")
        .build()
        .unwrap();
    assert_eq!(pp.process_expression(), "p p > t t~");

    session
        .materialize_process(&pp.process_expression(), "pp_ttbar", false)
        .unwrap();

    let options = LaunchOptions {
        parameters: pp.beam_parameters(),
        pythia: true,
        delphes: true,
        ..LaunchOptions::default()
    };
    session.generate_events("pp_ttbar", "run01", &options).unwrap();

    assert_eq!(runner.cards(), vec!["pp_ttbar.txt", "pp_ttbar_gen.txt"]);
    for call in runner.calls() {
        assert_eq!(
            call.executable,
            std::path::PathBuf::from("/opt/MG5_aMC/bin/mg5_aMC")
        );
        assert_eq!(call.working_dir, temp.path());
    }

    let archived_process = temp.path().join("pp_ttbar").join("pp_ttbar.txt");
    let archived_launch = temp.path().join("pp_ttbar").join("pp_ttbar_gen.txt");
    assert!(archived_process.exists());
    assert!(archived_launch.exists());
    assert!(temp.path().join("pp_ttbar").join("Events").join("run01").is_dir());

    let launch = fs::read_to_string(archived_launch).unwrap();
    assert_eq!(
        launch,
        "launch pp_ttbar -n run01\n\
         analysis=OFF\n\
         shower=Pythia8\n\
         detector=Delphes\n\
         set ebeam1 6500\n\
         set ebeam2 6500\n\
         set polbeam1 0\n\
         set polbeam2 0\n"
    );
}

#[test]
fn test_ee_isr_scenario() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    let report = session
        .materialize_process("e+ e- > t t~", "eettbar", true)
        .unwrap();
    assert!(report.ee_isr);

    let card = fs::read_to_string(temp.path().join("eettbar.txt")).unwrap();
    let output_line = card.lines().last().unwrap();
    assert_eq!(output_line, "output EE_ISR eettbar");

    let options = LaunchOptions {
        parameters: ParamSet::new().with("nevents", "5000"),
        pythia: true,
        ..LaunchOptions::default()
    };
    session.generate_events("eettbar", "run01", &options).unwrap();

    let launch = fs::read_to_string(temp.path().join("eettbar_gen.txt")).unwrap();
    let lines: Vec<&str> = launch.lines().collect();
    assert_eq!(
        lines,
        vec![
            "launch eettbar -n run01",
            "analysis=OFF",
            "shower=Pythia8",
            "set nevents 5000",
        ]
    );
}

#[test]
fn test_isr_request_ignored_for_muon_collider() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    session
        .materialize_process("mu+ mu- > t t~", "mm_isr", true)
        .unwrap();
    let with_request = fs::read_to_string(temp.path().join("mm_isr.txt")).unwrap();

    session
        .materialize_process("mu+ mu- > t t~", "mm_isr", false)
        .unwrap();
    let without_request = fs::read_to_string(temp.path().join("mm_isr.txt")).unwrap();

    assert_eq!(with_request, without_request);
    assert!(with_request.ends_with("output mm_isr\n"));
}

#[test]
fn test_generate_before_materialize_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    let err = session
        .generate_events("eettbar", "run01", &LaunchOptions::default())
        .unwrap_err();

    assert!(matches!(err, SessionError::MissingProcessDirectory(_)));
    assert!(runner.calls().is_empty());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_rematerialize_overwrites_archived_card() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    session
        .materialize_process("e+ e- > t t~", "ee", false)
        .unwrap();
    session
        .materialize_process("e+ e- > t t~ z", "ee", false)
        .unwrap();

    let archived = fs::read_to_string(temp.path().join("ee").join("ee.txt")).unwrap();
    assert!(archived.contains("generate e+ e- > t t~ z"));
}

#[test]
fn test_failed_launch_surfaces_error() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    runner.fail_on("pp.txt");
    let session = recording_session(temp.path(), &runner);

    match session.materialize_process("p p > t t~", "pp", false) {
        Err(SessionError::ToolFailed { status, stderr, .. }) => {
            assert_eq!(status, Some(1));
            assert!(stderr.contains("fake failure"));
        }
        other => panic!("expected ToolFailed, got {:?}", other.map(|r| r.process_dir)),
    }
}
