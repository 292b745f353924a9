use clap::Parser;
use duelist::cli::commands::{
    evaluate::{self, EvaluateArgs},
    train::{self, TrainArgs},
};
use tempfile::tempdir;

#[test]
fn train_writes_summary_and_agent() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");
    let agent_path = tmp.path().join("agent.msgpack");

    let args = TrainArgs::parse_from([
        "train",
        "--episodes",
        "50",
        "--seed",
        "7",
        "--progress",
        "false",
        "--summary",
        summary_stem.to_str().unwrap(),
        "--output",
        agent_path.to_str().unwrap(),
    ]);
    train::execute(args).expect("training should succeed");

    let expected_path = summary_stem.with_extension("json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 50);
    assert_eq!(parsed["config"]["episodes"], 50);
    assert_eq!(parsed["metadata"]["seed"], 7);
    assert!(agent_path.exists());

    let args = EvaluateArgs::parse_from([
        "evaluate",
        &format!("montecarlo:{}", agent_path.display()),
        "random",
        "--games",
        "5",
        "--seed",
        "1",
    ]);
    evaluate::execute(args).expect("evaluation of the trained agent should succeed");
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = TrainArgs::parse_from([
        "train",
        "--episodes",
        "3",
        "--progress",
        "false",
        "--summary",
        &summary_arg,
    ]);
    train::execute(args).expect("training with directory summary should succeed");

    let contents = std::fs::read_to_string(summary_dir.join("training_summary.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 3);
}

#[test]
fn train_reads_json_config_and_flags_override_it() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"episodes": 1000, "discount": 0.9, "adversarial": {"switch_ratio": 0.5}}"#,
    )
    .unwrap();

    let args = TrainArgs::parse_from([
        "train",
        "--config",
        config_path.to_str().unwrap(),
        "--episodes",
        "20",
    ]);
    let config = train::build_config(&args).unwrap();
    assert_eq!(config.episodes, 20);
    assert_eq!(config.discount, 0.9);
    assert_eq!(config.adversarial.unwrap().switch_ratio, 0.5);
}

#[test]
fn evaluate_rejects_unknown_players() {
    assert!(EvaluateArgs::try_parse_from(["evaluate", "oracle", "random"]).is_err());
}

#[test]
fn evaluate_search_players_and_export() {
    let tmp = tempdir().unwrap();
    let export = tmp.path().join("results.json");
    let args = EvaluateArgs::parse_from([
        "evaluate",
        "alphabeta",
        "minmax",
        "--games",
        "2",
        "--depth",
        "3",
        "--symmetries",
        "--export",
        export.to_str().unwrap(),
    ]);
    evaluate::execute(args).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(parsed["games"], 2);
}
