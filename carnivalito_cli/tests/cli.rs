// End-to-end tests for the `carnivalito-analyze` binary.
//
// Each test writes poems to a temp dir, runs the built binary, and checks
// exit status plus stdout (JSON or text report).

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

const COPLA: &str = "\
Con el bombo y con la caja
la chirigota ya viene,
illo, que nadie se raja
que el carnaval se mantiene
";

/// Run the analyzer with `args` in `dir`.
fn run_analyze(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_carnivalito-analyze"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute carnivalito-analyze")
}

/// Run the analyzer feeding `input` on stdin.
fn run_analyze_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_carnivalito-analyze"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn carnivalito-analyze");
    // The binary may exit before reading (e.g. bad flags); ignore EPIPE.
    let _ = child.stdin.take().unwrap().write_all(input.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_single_file_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("copla.txt"), COPLA).unwrap();

    let output = run_analyze(dir.path(), &["copla.txt"]);
    assert!(output.status.success(), "analyze failed: {}", stderr_str(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();
    assert_eq!(json["rhyme"]["scheme"], "ABAB");
    assert_eq!(json["rhyme"]["rhyme_type"], "consonant");
    assert_eq!(json["meter"]["pattern"], "Octosyllabic");
    assert_eq!(json["verses"].as_array().unwrap().len(), 4);
    assert_eq!(json["carnival_style"]["level"], "authentic");
    assert!(json["style"].is_null());
}

#[test]
fn test_stdin_text_report_with_style() {
    let output = run_analyze_stdin(&["--format", "text", "--style", "cheerful"], COPLA);
    assert!(output.status.success(), "analyze failed: {}", stderr_str(&output));

    let report = stdout_str(&output);
    assert!(report.starts_with("Requested style: cheerful"));
    assert!(report.contains("Meter: Octosyllabic"));
    assert!(report.contains("Rhyme: ABAB consonant"));
}

#[test]
fn test_unknown_style_rejected() {
    let output = run_analyze_stdin(&["--style", "gloomy"], COPLA);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("unknown poem style 'gloomy'"));
}

#[test]
fn test_multiple_files_keep_order_and_report_failures() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "vida\nquerida\n").unwrap();
    fs::write(dir.path().join("b.txt"), "---\n\n").unwrap();
    fs::write(dir.path().join("c.txt"), COPLA).unwrap();

    let output = run_analyze(dir.path(), &["a.txt", "b.txt", "c.txt"]);
    assert!(!output.status.success(), "an empty poem should fail the run");
    assert!(stderr_str(&output).contains("no valid verses"));

    let json: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["input"], "a.txt");
    assert_eq!(entries[0]["analysis"]["rhyme"]["scheme"], "AA");
    assert_eq!(entries[1]["input"], "c.txt");
}

#[test]
fn test_config_limits_input_length() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("copla.txt"), COPLA).unwrap();
    fs::write(dir.path().join("config.json"), r#"{"max_input_chars": 20}"#).unwrap();

    let output = run_analyze(dir.path(), &["--config", "config.json", "copla.txt"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("the limit is 20"));
}

#[test]
fn test_custom_vocabulary() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("poem.txt"), "la luna\nla fortuna\n").unwrap();
    fs::write(dir.path().join("vocab.json"), r#"{"theme_words": ["luna"]}"#).unwrap();

    let output = run_analyze(dir.path(), &["--vocabulary", "vocab.json", "poem.txt"]);
    assert!(output.status.success(), "analyze failed: {}", stderr_str(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();
    let features = json["carnival_style"]["features"].as_array().unwrap();
    assert!(features.iter().any(|f| f == "carnival theme word: luna"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempdir().unwrap();
    let output = run_analyze(dir.path(), &["nope.txt"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("Failed to read nope.txt"));
}
