use std::{fs, path::PathBuf};

use tempfile::tempdir;

use simon_cli::{Args, list_types, run};

fn demos_path() -> PathBuf {
    // Demos are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn demo_args(entries: &[&str]) -> Args {
    let demos = demos_path();
    Args {
        entries: entries.iter().map(|e| e.to_string()).collect(),
        metamodel: Some(demos.join("ui.toml").to_string_lossy().to_string()),
        root: demos.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        list_types: Vec::new(),
    }
}

#[test]
fn e2e_smoke_test_demo_compiles() {
    let report = run(&demo_args(&["main"])).expect("demo should compile");

    for result in report.compilation().results() {
        for problem in result.problems() {
            eprintln!("  - {problem}");
        }
    }
    assert!(!report.has_errors(), "demo reported problems");

    let sources: Vec<&str> = report
        .compilation()
        .results()
        .iter()
        .map(|result| result.source())
        .collect();
    assert_eq!(sources, ["main", "screens.settings", "ui.prelude"]);

    let trees = report.render_trees();
    assert!(trees.contains("== main =="));
    assert!(trees.contains("Application main"));
    assert!(trees.contains("target -> options"));
    assert!(trees.contains("target -> splash"));
}

#[test]
fn e2e_problems_are_reported_not_returned() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(
        dir.path().join("broken.simon"),
        "language UI\nApplication broken {\n    home: nowhere\n}\n",
    )
    .unwrap();

    let mut args = demo_args(&["broken"]);
    args.root = dir.path().to_string_lossy().to_string();

    let report = run(&args).expect("problems in sources should not fail the run");
    assert!(report.has_errors());

    let result = report.compilation().result("broken").unwrap();
    assert_eq!(result.problems().len(), 1);
    assert_eq!(result.problems()[0].message(), "Unknown name: 'nowhere'");
    assert_eq!(result.problems()[0].line(), 3);
    assert_eq!(
        report.source_text("broken").as_deref(),
        Some("language UI\nApplication broken {\n    home: nowhere\n}\n")
    );
}

#[test]
fn e2e_config_file_selects_metamodel_and_extension() {
    let dir = tempdir().expect("Failed to create temp directory");
    let metamodel = demos_path().join("ui.toml");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[compiler]\nsource_extension = \"ui\"\n\n[metamodel]\npath = {:?}\n",
            metamodel.to_string_lossy()
        ),
    )
    .unwrap();
    fs::write(
        dir.path().join("app.ui"),
        "language UI\nApplication app { title = \"From config\" }\n",
    )
    .unwrap();

    let args = Args {
        entries: vec!["app".to_string()],
        metamodel: None,
        root: dir.path().to_string_lossy().to_string(),
        config: Some(config_path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        list_types: Vec::new(),
    };

    let report = run(&args).expect("configured run should succeed");
    assert!(!report.has_errors());
    assert!(report.render_trees().contains("title = \"From config\""));
}

#[test]
fn e2e_missing_metamodel_is_an_error() {
    let dir = tempdir().expect("Failed to create temp directory");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[compiler]\nimplicit_builtins = false\n").unwrap();

    let args = Args {
        entries: vec!["main".to_string()],
        config: Some(config_path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        ..Args::default()
    };

    let err = run(&args).expect_err("no metamodel is configured");
    assert_eq!(err.to_string(), "No metamodel configured");
}

#[test]
fn e2e_list_types() {
    let mut args = demo_args(&[]);
    args.list_types = vec!["UI".to_string()];

    let types = list_types(&args).expect("types should be listed");
    assert!(types.contains(&"Application (object type)".to_string()));
    assert!(types.contains(&"Layout (enumerated type)".to_string()));
    assert!(types.contains(&"Color (record type)".to_string()));
}
