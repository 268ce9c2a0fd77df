use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "grobwalk-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_grobwalk<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_grobwalk");
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("grobwalk command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

const INTRO_LEX: [&str; 2] = ["x + 1/2*y^4 - 1/2*y", "y^5 - y^2 + 4"];

fn walk_args(variant: &str) -> Vec<String> {
    [
        "walk",
        "--vars",
        "x,y",
        "--poly",
        "x^2 + y^3 - 1",
        "--poly",
        "x*y - 2",
        "--start",
        "1,1",
        "--target",
        "1,0",
        "--variant",
        variant,
        "--json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn walk_json_reports_lex_basis() {
    let output = run_grobwalk(walk_args("plain"));
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["variant"], "plain");
    assert_eq!(payload["basis"], serde_json::json!(INTRO_LEX));
    assert_eq!(payload["report"]["steps"].as_array().map(Vec::len), Some(3));
    assert!(
        payload["report"]["basisDigest"]
            .as_str()
            .is_some_and(|d| d.starts_with("b1_"))
    );
}

#[test]
fn every_variant_agrees_on_the_intro_example() {
    for variant in [
        "mwalk",
        "mrwalk",
        "mpwalk",
        "mfwalk",
        "mfrwalk",
        "tran",
        "tran_random",
        "alt1",
        "alt2",
    ] {
        let output = run_grobwalk(walk_args(variant));
        assert_success(&output);
        let payload = parse_json_stdout(&output);
        assert_eq!(payload["basis"], serde_json::json!(INTRO_LEX), "{variant}");
    }
}

#[test]
fn walk_text_output_lists_path_and_basis() {
    let mut args = walk_args("plain");
    args.pop();
    let output = run_grobwalk(args);
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.contains("grobwalk walk --variant plain"));
    assert!(text.contains("Path: (3,2) -> (4,1) -> (1,0)"));
    assert!(text.contains("- y^5 - y^2 + 4"));
}

#[test]
fn walk_rejects_identical_weights() {
    let mut args = walk_args("plain");
    let target = args.iter().position(|a| a == "--target").unwrap() + 1;
    args[target] = "1,1".to_string();
    let output = run_grobwalk(args);
    assert_failure(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["failureClass"], "invalid_input");
}

#[test]
fn walk_rejects_unknown_variant() {
    let mut args = walk_args("sideways");
    args.pop();
    let output = run_grobwalk(args);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown walk variant"));
}

#[test]
fn run_reads_toml_problem() {
    let tmp = TempDirGuard::new("run-toml");
    let path = tmp.path().join("cubic.toml");
    fs::write(
        &path,
        r#"variables = ["x", "y", "z"]
generators = ["y - x^2", "z - x^3"]
start = [1, 1, 1]
target = [1, 0, 0]

[walk]
variant = "fractal"
"#,
    )
    .expect("problem should be written");

    let output = run_grobwalk([OsStr::new("run"), path.as_os_str(), OsStr::new("--json")]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["variant"], "fractal");
    assert_eq!(
        payload["basis"],
        serde_json::json!(["x^2 - y", "x*y - z", "x*z - y^2", "y^3 - z^2"])
    );
}

#[test]
fn run_reports_missing_file() {
    let tmp = TempDirGuard::new("run-missing");
    let path = tmp.path().join("absent.json");
    let output = run_grobwalk([OsStr::new("run"), path.as_os_str()]);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read file"));
}

#[test]
fn cone_describes_lex_cone() {
    let output = run_grobwalk([
        "cone",
        "--vars",
        "x,y",
        "--poly",
        "x^2 + y^3 - 1",
        "--poly",
        "x*y - 2",
        "--weight",
        "1,0",
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["order"], "lp");
    assert_eq!(payload["ambientDimension"], 2);
    assert_eq!(payload["dimension"], 2);
    assert_eq!(payload["codimension"], 0);
    assert_eq!(payload["containsWeight"], true);
}

#[test]
fn samples_list_and_run() {
    let output = run_grobwalk(["samples", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    let names: Vec<&str> = payload["samples"]
        .as_array()
        .expect("samples array")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, ["intro", "twisted_cubic", "cyclic3", "circle_line"]);

    let output = run_grobwalk(["samples", "cyclic3", "--variant", "alt2", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(
        payload["basis"],
        serde_json::json!(["x + y + z", "y^2 + y*z + z^2", "z^3 - 1"])
    );

    let output = run_grobwalk(["samples", "missing"]);
    assert_failure(&output);
}
