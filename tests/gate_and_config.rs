//! Execution gate and configuration behavior, end to end.

use riskgate::config::Config;
use riskgate::{Analyzer, ConfirmThreshold, Gate, GateDecision, RiskLevel};
use std::io::Write;
use std::path::PathBuf;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".riskgate.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn threshold_matrix() {
    let analyzer = Analyzer::default();
    let cases = [
        // (command, decision at safe, at caution, at dangerous)
        (
            "echo hello",
            GateDecision::AutoRun,
            GateDecision::AutoRun,
            GateDecision::AutoRun,
        ),
        (
            "rm -rf ./build",
            GateDecision::Confirm,
            GateDecision::AutoRun,
            GateDecision::AutoRun,
        ),
        (
            "chmod -R 777 /tmp",
            GateDecision::Confirm,
            GateDecision::Confirm,
            GateDecision::AutoRun,
        ),
        (
            "rm -rf /",
            GateDecision::Refuse,
            GateDecision::Refuse,
            GateDecision::Refuse,
        ),
    ];
    for (command, at_safe, at_caution, at_dangerous) in cases {
        let analysis = analyzer.analyze(command);
        for (threshold, expected) in [
            (ConfirmThreshold::Safe, at_safe),
            (ConfirmThreshold::Caution, at_caution),
            (ConfirmThreshold::Dangerous, at_dangerous),
        ] {
            assert_eq!(
                Gate::new(threshold).decide(&analysis),
                expected,
                "command {command:?} at threshold {threshold}"
            );
        }
    }
}

#[test]
fn blocked_command_refuses_even_at_the_loosest_threshold() {
    let analyzer = Analyzer::with_lists(vec!["ls".to_string()], Vec::new());
    let analysis = analyzer.analyze("ls -la");
    assert_eq!(
        Gate::new(ConfirmThreshold::Dangerous).decide(&analysis),
        GateDecision::Refuse
    );
}

#[test]
fn config_file_drives_the_analyzer() {
    let (_dir, path) = write_config(
        r#"
        [safety]
        blocked_commands = ["dd"]
        allowed_paths = ["/home/alice/project"]
        allow_path_violation = "dangerous"

        [gate]
        confirm_threshold = "caution"
        "#,
    );
    let config = Config::load_from(&path).unwrap();
    let analyzer = Analyzer::new(config.analyzer_config());
    let gate = Gate::new(config.gate.confirm_threshold);

    // Blocked command refuses.
    let analysis = analyzer.analyze("dd if=a of=b");
    assert_eq!(analysis.risk_level, RiskLevel::Critical);
    assert_eq!(gate.decide(&analysis), GateDecision::Refuse);

    // Write outside the allowed prefix elevates to the configured tier.
    let analysis = analyzer.analyze("cp notes.txt /srv/notes.txt");
    assert_eq!(analysis.risk_level, RiskLevel::Dangerous);
    assert_eq!(gate.decide(&analysis), GateDecision::Confirm);

    // Writes inside the allowed prefix stay quiet.
    let analysis = analyzer.analyze("cp notes.txt /home/alice/project/notes.txt");
    assert_eq!(analysis.risk_level, RiskLevel::Safe);
    assert_eq!(gate.decide(&analysis), GateDecision::AutoRun);
}

#[test]
fn invalid_config_fails_at_load_not_per_call() {
    let (_dir, path) = write_config(
        r#"
        [safety]
        allowed_paths = ["relative/path"]
        "#,
    );
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("absolute"));
}

#[test]
fn unknown_violation_policy_is_rejected() {
    let (_dir, path) = write_config(
        r#"
        [safety]
        allow_path_violation = "critical"
        "#,
    );
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let (_dir, path) = write_config("");
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.gate.confirm_threshold, ConfirmThreshold::Safe);
    assert!(config.analyzer_config().blocked_commands.is_empty());
}
