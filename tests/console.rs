//! End-to-end runs of the `credit-console` binary against the fixtures in `tests/data`.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn console(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_credit-console"))
        .args(args)
        .env("APP_LOG_LEVEL", "warn")
        .env_remove("RUST_LOG")
        .output()
        .expect("console runs")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn path(buf: &PathBuf) -> &str {
    buf.to_str().expect("utf-8 path")
}

#[test]
fn rule_preview_lists_conditions_and_actions() {
    let rule = fixture("rule.json");
    let output = console(&["rule", "preview", path(&rule)]);
    assert!(output.status.success());

    let preview = String::from_utf8(output.stdout).expect("utf-8");
    assert!(preview.starts_with("Rule: Salaried limit uplift\nProduct Type: PersonalLoan\n"));
    assert!(preview.contains("  Logical Operator: AND"));
    assert!(preview.contains("multiply_limit (x1.5)"));
}

#[test]
fn rule_graph_chains_start_to_end() {
    let rule = fixture("rule.json");
    let output = console(&["rule", "graph", path(&rule)]);
    assert!(output.status.success());

    let graph = stdout_json(&output);
    let nodes = graph["nodes"].as_array().expect("nodes");
    // start, two conditions, logical operator, two actions, end
    assert_eq!(nodes.len(), 7);
    assert_eq!(nodes[0]["type"], "start");
    assert_eq!(graph["edges"].as_array().expect("edges").len(), 6);
}

#[test]
fn rule_check_rejects_a_disconnected_graph() {
    let rule = fixture("rule.json");
    let mut graph = stdout_json(&console(&["rule", "graph", path(&rule)]));

    let edges = graph["edges"].as_array_mut().expect("edges");
    let index = edges
        .iter()
        .position(|edge| edge["target"] == "action-1")
        .expect("edge into the second action");
    edges.remove(index);

    let broken = std::env::temp_dir().join(format!(
        "credit-console-{}-broken-graph.json",
        std::process::id()
    ));
    std::fs::write(&broken, graph.to_string()).expect("write graph");
    let output = console(&["rule", "check", path(&broken)]);
    let _ = std::fs::remove_file(&broken);

    assert!(!output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["isValidRule"], false);
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("application error: rule error:"));
    assert!(stderr.contains("action-1"));
}

#[test]
fn rule_check_reports_invalid_node_data() {
    let rule = fixture("rule.json");
    let mut graph = stdout_json(&console(&["rule", "graph", path(&rule)]));

    let nodes = graph["nodes"].as_array_mut().expect("nodes");
    let condition = nodes
        .iter_mut()
        .find(|node| node["id"] == "condition-0")
        .expect("first condition");
    condition["data"]["operator"] = "contains".into();

    let broken = std::env::temp_dir().join(format!(
        "credit-console-{}-bad-node.json",
        std::process::id()
    ));
    std::fs::write(&broken, graph.to_string()).expect("write graph");
    let output = console(&["rule", "check", path(&broken)]);
    let _ = std::fs::remove_file(&broken);

    assert!(!output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["isValidRule"], false);
    let reason = report["validationErrors"][0].as_str().expect("reason");
    assert!(reason.contains("node 'condition-0' has invalid data"));
}

#[test]
fn rule_test_reports_fired_actions() {
    let rule = fixture("rule.json");
    let facts = fixture("facts.json");
    let output = console(&["rule", "test", path(&rule), path(&facts)]);
    assert!(output.status.success());

    let evaluation = stdout_json(&output);
    assert_eq!(evaluation["matched"], true);
    assert_eq!(evaluation["actions"].as_array().expect("actions").len(), 2);
}

#[test]
fn batch_validate_prints_counts() {
    let csv = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("crates/credit-rules/tests/data/loan_applications.csv");

    let output = console(&["batch", "validate", path(&csv), "--json"]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["validRows"], 3);
    assert_eq!(result["invalidRows"], 2);

    let text = console(&["batch", "validate", path(&csv)]);
    let rendered = String::from_utf8(text.stdout).expect("utf-8");
    assert!(rendered.starts_with("Total rows: 5 | Valid: 3 | Invalid: 2 | Errors: 3 | Warnings: 1"));
    assert!(rendered.contains("- row 5 [phone_number]:"));
}

#[test]
fn compliance_check_flags_the_salary_rule() {
    let application = fixture("application.json");
    let output = console(&["compliance", "check", path(&application)]);
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["valid"], false);
    assert_eq!(result["violations"][0]["field"], "loan_amount");
}

#[test]
fn compliance_thresholds_come_from_the_environment() {
    let application = fixture("application.json");
    let output = Command::new(env!("CARGO_BIN_EXE_credit-console"))
        .args(["compliance", "check", path(&application)])
        .env("CREDIT_MAX_LTV_PCT", "not-a-number")
        .output()
        .expect("console runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("CREDIT_MAX_LTV_PCT must be a number"));
}

#[test]
fn compliance_limits_reports_calculators() {
    let loan = fixture("loan.json");
    let output = console(&["compliance", "limits", path(&loan), "--customer-type", "business"]);
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["compliance"]["compliant"], true);
    assert!(report["max_affordable_loan"].as_f64().expect("number") > 0.0);
}

#[test]
fn features_build_uses_supplied_ids() {
    let inputs = fixture("inputs.json");
    let output = console(&[
        "features",
        "build",
        path(&inputs),
        "--request-id",
        "req-9",
        "--correlation-id",
        "corr-9",
        "--timestamp",
        "2026-06-01T19:00:00+03:00",
        "--channel",
        "agent_portal",
    ]);
    assert!(output.status.success());

    let request = stdout_json(&output);
    assert_eq!(request["request_id"], "req-9");
    assert_eq!(request["customer_id"], "AK-3001");
    assert_eq!(request["identity_and_fraud_intelligence"]["kyc_level"], "Tier2");
    assert_eq!(request["additional_context"]["application_channel"], "agent_portal");
    assert_eq!(request["additional_context"]["application_date"], "2026-06-01");
    assert_eq!(
        request["digital_behavioral_intelligence"]["app_submission_timestamp_context"],
        "Evening"
    );
    assert_eq!(request["core_credit_performance"]["credit_utilization_ratio"], 0.35);
}

#[test]
fn missing_input_fails_with_the_path() {
    let output = console(&["rule", "preview", "no-such-rule.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("unable to read no-such-rule.json"));
}
