//! Integration tests for run plans, the threshold scan and failure policies

use evgen::batch::{BatchExecutor, FailurePolicy, JobStatus, RunPlan, ThresholdScan};
use evgen::error::{EvgenError, SessionError};
use std::fs;
use tempfile::TempDir;

use crate::integration::{recording_session, RecordingRunner};

const DILEPTON_PLAN: &str = r#"
[[process]]
directory = "pp_ttbar"
initial_state = "p p"
final_state = "t t~, (t > b W+, W+ > l+ vl), (t~ > b~ W-, W- > l- vl~)"
ebeam1 = "6500"
ebeam2 = "6500"

[[process.run]]
name = "run02"
pythia = true
delphes = true

[[process]]
directory = "ee_ttbar"
initial_state = "e+ e-"
final_state = "t t~, (t > b W+, W+ > l+ vl), (t~ > b~ W-, W- > l- vl~)"
ebeam1 = "180"
ebeam2 = "180"

[[process.run]]
name = "run02"
pythia = true
delphes = true

[[process]]
directory = "mm_ttbar"
initial_state = "mu+ mu-"
final_state = "t t~, (t > b W+, W+ > l+ vl), (t~ > b~ W-, W- > l- vl~)"
ebeam1 = "180"
ebeam2 = "180"

[[process.run]]
name = "run02"
pythia = true
delphes = true
"#;

#[test]
fn test_plan_runs_all_processes_then_all_runs() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    let plan = RunPlan::from_toml_str(DILEPTON_PLAN).unwrap();
    let jobs = plan.jobs(false).unwrap();
    let report = BatchExecutor::new(FailurePolicy::FailFast)
        .execute(&session, &jobs)
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.succeeded(), 6);
    assert_eq!(
        runner.cards(),
        vec![
            "pp_ttbar.txt",
            "ee_ttbar.txt",
            "mm_ttbar.txt",
            "pp_ttbar_gen.txt",
            "ee_ttbar_gen.txt",
            "mm_ttbar_gen.txt",
        ]
    );

    let process_card = fs::read_to_string(temp.path().join("mm_ttbar").join("mm_ttbar.txt")).unwrap();
    assert!(process_card.contains(
        "generate mu+ mu- > t t~, (t > b W+, W+ > l+ vl), (t~ > b~ W-, W- > l- vl~)"
    ));

    let launch = fs::read_to_string(temp.path().join("ee_ttbar").join("ee_ttbar_gen.txt")).unwrap();
    assert!(launch.contains("set ebeam1 180\n"));
    assert!(launch.contains("detector=Delphes\n"));
}

#[test]
fn test_plan_fail_fast_stops_sequence() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    runner.fail_on("ee_ttbar.txt");
    let session = recording_session(temp.path(), &runner);

    let jobs = RunPlan::from_toml_str(DILEPTON_PLAN).unwrap().jobs(false).unwrap();
    let err = BatchExecutor::new(FailurePolicy::FailFast)
        .execute(&session, &jobs)
        .unwrap_err();

    match err {
        EvgenError::BatchAborted { directory, source } => {
            assert_eq!(directory, "ee_ttbar");
            assert!(matches!(source, SessionError::ToolFailed { .. }));
        }
        other => panic!("expected BatchAborted, got {:?}", other),
    }
    assert_eq!(runner.cards(), vec!["pp_ttbar.txt", "ee_ttbar.txt"]);
}

#[test]
fn test_plan_best_effort_skips_only_failed_directory() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    runner.fail_on("ee_ttbar.txt");
    let session = recording_session(temp.path(), &runner);

    let jobs = RunPlan::from_toml_str(DILEPTON_PLAN).unwrap().jobs(false).unwrap();
    let report = BatchExecutor::new(FailurePolicy::BestEffort)
        .execute(&session, &jobs)
        .unwrap();

    assert_eq!(report.succeeded(), 4);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
    let skipped: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| matches!(o.status, JobStatus::Skipped(_)))
        .map(|o| o.directory.as_str())
        .collect();
    assert_eq!(skipped, vec!["ee_ttbar"]);
    assert!(!runner.cards().contains(&"ee_ttbar_gen.txt".to_string()));
    assert!(temp.path().join("mm_ttbar").join("mm_ttbar_gen.txt").exists());
}

#[test]
fn test_threshold_scan_runs_every_energy_in_every_directory() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let session = recording_session(temp.path(), &runner);

    let mut scan = ThresholdScan::lepton_colliders().unwrap();
    scan.points = 3;
    let report = BatchExecutor::new(FailurePolicy::FailFast)
        .execute(&session, &scan.jobs())
        .unwrap();

    assert_eq!(report.succeeded(), 4 + 3 * 4);

    let isr_card = fs::read_to_string(temp.path().join("ee_xsecISR.txt")).unwrap();
    assert!(isr_card.ends_with("output EE_ISR ee_xsecISR\n"));

    let events = temp.path().join("tt_xsec").join("Events");
    let mut runs: Vec<String> = fs::read_dir(events)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    runs.sort();
    assert_eq!(runs, vec!["run_CME345.1", "run_CME350.1", "run_CME355.0"]);

    let last_launch = fs::read_to_string(temp.path().join("mm_xsec_gen.txt")).unwrap();
    assert_eq!(
        last_launch,
        "launch mm_xsec -n run_CME355.0\nanalysis=OFF\nset ebeam1 177.5\nset ebeam2 177.5\nset mt 172.5\n"
    );
}
