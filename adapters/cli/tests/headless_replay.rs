use std::process::Command;

fn run_headless(seed: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_artillery-duel"))
        .args(["--headless", "--seed", seed, "--shots", "60:45,70:40,50:55"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch artillery-duel");

    assert!(output.status.success(), "headless run failed: {output:?}");
    String::from_utf8(output.stdout).expect("utf-8 report")
}

#[test]
fn headless_report_is_deterministic_per_seed() {
    let first = run_headless("17");
    let second = run_headless("17");

    assert_eq!(first, second);
    assert!(first.contains("shots 3"), "{first}");
}

#[test]
fn malformed_shot_scripts_are_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_artillery-duel"))
        .args(["--headless", "--shots", "60-45"])
        .output()
        .expect("failed to launch artillery-duel");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("POWER:ANGLE"), "{stderr}");
}
