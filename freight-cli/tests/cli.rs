use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "freight-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_runs_bundled_scenario_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_freight-cli");
    let output_path = temp_path("bundled.json");
    let status = Command::new(exe)
        .args(["--report", "json", "--seeds", "1,2", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let runs = parsed.as_array().expect("array of runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["seed"], 1);
    assert_eq!(runs[0]["orders"].as_array().map(Vec::len), Some(6));
}

#[test]
fn cli_console_report_prints_outcome_lines() {
    let exe = env!("CARGO_BIN_EXE_freight-cli");
    let scenario_path = temp_path("scenario.json");
    std::fs::write(
        &scenario_path,
        r#"{
            "cities": [ { "name": "A", "is_major": true }, { "name": "B" } ],
            "transports": [ { "name": "truck", "cost_per_weight": 2.0, "speed": 50.0, "accident_prob": 0.1 } ],
            "roads": [ { "name": "R1" } ],
            "weather": [ { "name": "storm", "is_good": false } ],
            "orders": [ { "weight": 10.0, "origin": "A", "destination": "B", "desired_speed": 1000.0, "desired_price": 1000.0 } ]
        }"#,
    )
    .expect("write scenario");
    let output = Command::new(exe)
        .arg("--scenario")
        .arg(&scenario_path)
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Weather is bad in A, delivery delayed"));
    assert!(stdout.contains("weather bad"));
    assert!(stdout.contains("Delivered: 0"));
}

#[test]
fn cli_fails_on_invalid_scenario() {
    let exe = env!("CARGO_BIN_EXE_freight-cli");
    let scenario_path = temp_path("broken.json");
    std::fs::write(&scenario_path, "{ \"transports\": [ { \"name\": \"cart\" } ] }")
        .expect("write scenario");
    let output = Command::new(exe)
        .arg("--scenario")
        .arg(&scenario_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid scenario"));
}

#[test]
fn cli_fails_on_empty_road_catalog() {
    let exe = env!("CARGO_BIN_EXE_freight-cli");
    let scenario_path = temp_path("no-roads.json");
    std::fs::write(
        &scenario_path,
        r#"{
            "cities": [ { "name": "A", "is_major": true } ],
            "transports": [ { "name": "truck", "cost_per_weight": 2.0, "speed": 50.0, "accident_prob": 0.1 } ],
            "weather": [ { "name": "sunny", "is_good": true } ],
            "orders": [ { "weight": 1.0, "origin": "A", "destination": "A", "desired_speed": 10.0, "desired_price": 10.0 } ]
        }"#,
    )
    .expect("write scenario");
    let output = Command::new(exe)
        .args(["--seeds", "4", "--scenario"])
        .arg(&scenario_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("road catalog is empty"));
}
