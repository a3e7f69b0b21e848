use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

// Helper to get a Command for the `sugar` binary, isolated from any config
// files on the machine running the tests.
fn sugar(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sugar").expect("binary exists");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("SUGAR_CONFIG")
        .env_remove("NO_COLOR")
        .env_remove("COLUMNS");
    cmd
}

fn render(home: &TempDir) -> Command {
    let mut cmd = sugar(home);
    cmd.args(["render", "--force-sugar", "--no-color", "--width", "60"]);
    cmd
}

fn report(nodeid: &str, when: &str, outcome: &str) -> Value {
    let (path, name) = nodeid.split_once("::").expect("nodeid has a test name");
    json!({
        "event": "test_report",
        "nodeid": nodeid,
        "location": {"path": path, "line": 3, "name": name},
        "when": when,
        "outcome": outcome,
        "duration": 0.01,
    })
}

/// Setup, call and teardown for one test, with the call outcome given.
fn test_run(nodeid: &str, call: Value) -> Vec<Value> {
    vec![
        report(nodeid, "setup", "passed"),
        call,
        report(nodeid, "teardown", "passed"),
    ]
}

fn stream(events: &[Value]) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&event.to_string());
        out.push('\n');
    }
    out
}

fn collected(count: usize) -> Value {
    json!({"event": "collection_finish", "count": count})
}

// -----------------------------------------------------------------------
// Basic CLI
// -----------------------------------------------------------------------

#[test]
fn help_shows_description() {
    let home = TempDir::new().unwrap();
    sugar(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Live, colorized test progress"));
}

#[test]
fn version_shows_semver() {
    let home = TempDir::new().unwrap();
    sugar(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn no_args_shows_usage() {
    let home = TempDir::new().unwrap();
    sugar(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn render_help_lists_traceback_styles() {
    let home = TempDir::new().unwrap();
    sugar(&home)
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tb"))
        .stdout(predicate::str::contains("--force-sugar"));
}

// -----------------------------------------------------------------------
// Rich rendering
// -----------------------------------------------------------------------

#[test]
fn three_passing_tests() {
    let home = TempDir::new().unwrap();
    let mut events = vec![collected(3)];
    for name in ["t1", "t2", "t3"] {
        let nodeid = format!("test_a.py::{name}");
        events.extend(test_run(&nodeid, report(&nodeid, "call", "passed")));
    }

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .success()
        .stdout(predicate::str::contains("Results ("))
        .stdout(predicate::str::contains("      3 passed"))
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("✓✓✓"))
        .stdout(predicate::str::contains("failed").not());
}

#[test]
fn call_failure_prints_immediately_and_fails_run() {
    let home = TempDir::new().unwrap();
    let nodeid = "test_a.py::test_boom";
    let mut call = report(nodeid, "call", "failed");
    call["longrepr"] = json!("def test_boom():\n>       assert 0\nE       assert 0");
    call["crash"] = json!({"path": "test_a.py", "lineno": 4, "message": "assert 0"});
    let mut events = vec![collected(1)];
    events.extend(test_run(nodeid, call));

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("E       assert 0"))
        .stdout(predicate::str::contains("      1 failed"))
        .stdout(predicate::str::contains("- test_a.py:4 test_boom"));
}

#[test]
fn expected_failure_is_not_a_failure() {
    let home = TempDir::new().unwrap();
    let nodeid = "test_a.py::test_known_bug";
    let mut call = report(nodeid, "call", "skipped");
    call["xfail"] = json!(true);
    let mut events = vec![collected(1)];
    events.extend(test_run(nodeid, call));

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 xfailed"))
        .stdout(predicate::str::contains(" failed").not());
}

#[test]
fn strict_unexpected_pass_fails_run() {
    let home = TempDir::new().unwrap();
    let nodeid = "test_a.py::test_fixed";
    let mut call = report(nodeid, "call", "passed");
    call["xfail"] = json!(true);
    call["strict"] = json!(true);
    let mut events = vec![collected(1)];
    events.extend(test_run(nodeid, call));

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1 failed"));
}

#[test]
fn teardown_error_counts_as_error() {
    let home = TempDir::new().unwrap();
    let nodeid = "test_a.py::test_leaky";
    let mut teardown = report(nodeid, "teardown", "failed");
    teardown["longrepr"] = json!("E   RuntimeError: fixture cleanup");
    let events = vec![
        collected(1),
        report(nodeid, "setup", "passed"),
        report(nodeid, "call", "passed"),
        teardown,
    ];

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ERROR at teardown of test_leaky"))
        .stdout(predicate::str::contains("1 passed"))
        .stdout(predicate::str::contains("1 error"));
}

#[test]
fn collection_error_is_reported() {
    let home = TempDir::new().unwrap();
    let events = vec![
        json!({
            "event": "collect_report",
            "path": "test_broken.py",
            "outcome": "failed",
            "longrepr": "E   SyntaxError: invalid syntax",
        }),
        collected(0),
    ];

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ERROR collecting test_broken.py"))
        .stdout(predicate::str::contains("1 error"));
}

#[test]
fn deselected_items_are_tallied() {
    let home = TempDir::new().unwrap();
    let mut events = vec![
        collected(3),
        json!({"event": "deselected", "items": ["test_a.py::t2", "test_a.py::t3"]}),
    ];
    events.extend(test_run(
        "test_a.py::t1",
        report("test_a.py::t1", "call", "passed"),
    ));

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("2 deselected"));
}

#[test]
fn malformed_lines_are_skipped() {
    let home = TempDir::new().unwrap();
    let mut input = String::from("this is not json\n");
    input.push_str(&stream(&test_run(
        "test_a.py::t1",
        report("test_a.py::t1", "call", "passed"),
    )));

    render(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 passed"))
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn host_exit_status_passes_through() {
    let home = TempDir::new().unwrap();
    let events = vec![
        collected(0),
        json!({"event": "session_finish", "exit_status": 5}),
    ];

    render(&home).write_stdin(stream(&events)).assert().code(5);
}

#[test]
fn session_header_is_printed() {
    let home = TempDir::new().unwrap();
    let events = vec![json!({"event": "session_start", "header": ["rootdir: /src"]})];

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .success()
        .stdout(predicate::str::contains("Test session starts (platform: "))
        .stdout(predicate::str::contains("rootdir: /src"));
}

#[test]
fn no_color_output_has_no_escape_codes() {
    let home = TempDir::new().unwrap();
    let mut call = report("test_a.py::t1", "call", "failed");
    call["longrepr"] = json!("E   assert 0");
    let events = test_run("test_a.py::t1", call);

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\x1b[3").not())
        .stdout(predicate::str::contains("\x1b[1m").not());
}

#[test]
fn input_file_is_read() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("events.jsonl");
    std::fs::write(
        &path,
        stream(&test_run(
            "test_a.py::t1",
            report("test_a.py::t1", "call", "passed"),
        )),
    )
    .unwrap();

    render(&home)
        .arg("--input")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 passed"));
}

#[test]
fn missing_input_file_is_a_renderer_error() {
    let home = TempDir::new().unwrap();
    render(&home)
        .args(["--input", "nope.jsonl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to open"));
}

// -----------------------------------------------------------------------
// Plain fallback
// -----------------------------------------------------------------------

#[test]
fn piped_output_without_force_is_plain() {
    let home = TempDir::new().unwrap();
    let mut events = vec![collected(2)];
    events.extend(test_run(
        "test_a.py::t1",
        report("test_a.py::t1", "call", "passed"),
    ));
    events.extend(test_run(
        "test_a.py::t2",
        report("test_a.py::t2", "call", "skipped"),
    ));

    sugar(&home)
        .arg("render")
        .write_stdin(stream(&events))
        .assert()
        .success()
        .stdout(predicate::str::contains("test_a.py::t1 PASSED\n"))
        .stdout(predicate::str::contains("test_a.py::t2 SKIPPED\n"))
        .stdout(predicate::str::contains("1 passed, 1 skipped in "))
        .stdout(predicate::str::contains("\x1b[").not());
}

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

#[test]
fn explicit_missing_config_is_a_renderer_error() {
    let home = TempDir::new().unwrap();
    render(&home)
        .args(["--config", "missing.toml"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn invalid_bar_length_is_a_renderer_error() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("sugar.toml"),
        "[sugar]\nprogressbar_length = \"wide\"\n",
    )
    .unwrap();

    render(&home)
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid progressbar_length"));
}

#[test]
fn unparsable_config_is_a_renderer_error() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("sugar.toml"), "[theme\n").unwrap();

    render(&home)
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn custom_symbols_are_used() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("sugar.toml"),
        "[theme]\nsymbol_passed = \"+\"\n",
    )
    .unwrap();
    let events = test_run(
        "test_a.py::t1",
        report("test_a.py::t1", "call", "passed"),
    );

    render(&home)
        .write_stdin(stream(&events))
        .assert()
        .success()
        .stdout(predicate::str::contains(" test_a.py +"));
}

#[test]
fn theme_shows_config_from_env() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("custom.toml");
    std::fs::write(
        &path,
        "[theme]\nfail = \"blue\"\nsymbol_passed = \"+\"\n\n[sugar]\nprogressbar_length = \"20%\"\n",
    )
    .unwrap();

    sugar(&home)
        .args(["theme", "--no-color"])
        .env("SUGAR_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"))
        .stdout(predicate::str::is_match(r"\n  fail\s+blue\n").unwrap())
        .stdout(predicate::str::is_match(r"symbol_passed\s+\+").unwrap())
        .stdout(predicate::str::contains("progressbar_length: 20%"));
}

#[test]
fn theme_defaults_without_config() {
    let home = TempDir::new().unwrap();
    sugar(&home)
        .args(["theme", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(built-in defaults)"))
        .stdout(predicate::str::is_match(r"\n  header\s+magenta\n").unwrap())
        .stdout(predicate::str::contains("progressbar_length: 10"));
}
