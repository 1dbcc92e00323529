//! Integration tests for the CLI route table

use clap::Parser;
use evgen::cli::{Cli, RunContext};
use evgen::config::EvgenConfig;
use std::fs;
use tempfile::TempDir;

fn execute(workspace: &TempDir, args: &[&str]) -> Result<String, evgen::error::EvgenError> {
    let ws = workspace.path().to_string_lossy().to_string();
    let mut argv = vec!["evgen", "--workspace", ws.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let context = RunContext::from_config(
        EvgenConfig::default(),
        cli.workspace.clone(),
        cli.config.clone(),
    )
    .unwrap()
    .with_install_path(cli.install_path.clone());
    context.execute(&cli.command)
}

#[test]
fn test_describe_text() {
    let temp = TempDir::new().unwrap();
    let out = execute(
        &temp,
        &[
            "describe",
            "p p",
            "t t~",
            "--ebeam1",
            "50000",
            "--ebeam2",
            "50000",
            "--label",
            "FCCTopProd",
            "--pdf-codes",
        ],
    )
    .unwrap();

    assert!(out.starts_with("** FCCTopProd **\n"));
    assert!(out.contains("Beam energies     : 50000 + 50000 GeV"));
    assert!(out.contains("Beam PDFs         : 1 (proton), 1 (proton)"));
}

#[test]
fn test_run_plan_dry_run_does_not_touch_workspace() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("plan.toml"),
        r#"
[[process]]
directory = "test_mm_ttbar"
initial_state = "mu+ mu-"
final_state = "t t~"
ebeam1 = "180"
ebeam2 = "180"

[[process.run]]
name = "run01"
pythia = true
"#,
    )
    .unwrap();

    let out = execute(&temp, &["run", "plan.toml", "--dry-run", "--format", "json"]).unwrap();
    let jobs: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(jobs.as_array().unwrap().len(), 2);
    assert_eq!(jobs[0]["action"], "materialize");
    assert_eq!(jobs[1]["action"], "generate run01");
    assert_eq!(
        jobs[1]["detail"],
        "ebeam1=180 ebeam2=180 polbeam1=0 polbeam2=0"
    );

    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the plan file should exist");
}

#[test]
fn test_run_plan_with_missing_executable_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("plan.toml"),
        r#"
[[process]]
directory = "pp"
initial_state = "p p"
final_state = "t t~"
"#,
    )
    .unwrap();
    let install = temp.path().join("no-such-install");
    let install = install.to_string_lossy().to_string();

    let err = execute(&temp, &["--install-path", install.as_str(), "run", "plan.toml"]).unwrap_err();
    let msg = evgen::cli::map_error(&err);
    assert!(msg.contains("Generator executable not found"), "{}", msg);
    assert!(msg.contains("--install-path"));
    assert!(temp.path().join("pp.txt").exists());
}

#[test]
fn test_missing_plan_file_reports_plan_error() {
    let temp = TempDir::new().unwrap();
    let err = execute(&temp, &["run", "absent.toml"]).unwrap_err();
    assert!(err.to_string().starts_with("Run plan error"));
}
