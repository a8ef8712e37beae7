use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the smart-log binary
fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_smart-log"))
}

/// Write `content` to `name` inside a fresh temp dir
fn fixture(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    (dir, path)
}

fn run(args: &[&str], file: &Path) -> Output {
    Command::new(bin_path())
        .args(args)
        .arg("--file")
        .arg(file)
        .env_remove("SMART_LOG_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_insert_after_declaration() {
    let (_dir, file) = fixture("main.ts", "const a = 10;\nrun(a);\n");

    let output = run(&["insert", "--at", "1:7"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Inserted at line 2"), "Unexpected output: {}", stdout);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "const a = 10;\nconsole.log(\"🚀 ~ line:2 ~ a:\", a);\nrun(a);\n"
    );
}

#[test]
fn test_insert_uses_function_label() {
    let (_dir, file) = fixture("load.js", "function load() {\n  const total = 1;\n}\n");

    let output = run(&["insert", "--at", "2:9"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let content = fs::read_to_string(&file).unwrap();
    assert!(
        content.contains("console.log(\"🚀 ~ load ~ total:\", total);"),
        "Unexpected content: {}",
        content
    );
}

#[test]
fn test_insert_with_suffix_from_settings_file() {
    let (dir, file) = fixture("main.ts", "const a = 10;\n");
    fs::write(dir.path().join(".smart-log.json"), r#"{"smart-log.suffix": " 👀"}"#).unwrap();

    let output = run(&["insert", "--at", "1:7"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "const a = 10;\nconsole.log(\"🚀 ~ line:2 ~ a: 👀\", a);\n"
    );
}

#[test]
fn test_insert_outside_document() {
    let (_dir, file) = fixture("main.ts", "const a = 10;\n");

    let output = run(&["insert", "--at", "9:1"], &file);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("outside the document"), "Unexpected error: {}", stderr);
}

#[test]
fn test_delete_with_yes() {
    let (_dir, file) = fixture("main.js", "console.log(1);\nrun();\nconsole.log(\"done\");\n");

    let output = run(&["delete", "--yes"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deleted 2 console.log statement(s)"), "Unexpected output: {}", stdout);
    assert_eq!(fs::read_to_string(&file).unwrap(), "\nrun();\n\n");
}

#[test]
fn test_delete_with_no_leaves_file() {
    let original = "console.log(1);\nrun();\n";
    let (_dir, file) = fixture("main.js", original);

    let output = run(&["delete", "--no"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_delete_reads_answer_from_stdin() {
    let (_dir, file) = fixture("main.js", "console.log(1);\nrun();\n");

    let mut child = Command::new(bin_path())
        .args(["delete", "--file"])
        .arg(&file)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");
    {
        use std::io::Write;
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(b"1\n").unwrap();
    }
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Found 1 console.log statement(s). Delete them?"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "\nrun();\n");
}

#[test]
fn test_delete_inside_vue_script() {
    let (_dir, file) = fixture(
        "App.vue",
        "<template><div/></template>\n<script>\nconsole.log(a);\nrun();\n</script>\n",
    );

    let output = run(&["delete", "--yes"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "<template><div/></template>\n<script>\n\nrun();\n</script>\n"
    );
}

#[test]
fn test_vue_without_script() {
    let (_dir, file) = fixture("App.vue", "<template><div/></template>\n");

    let output = run(&["delete", "--yes"], &file);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("info: No console.log statements found"), "Unexpected output: {}", stdout);
}

#[test]
fn test_unsupported_extension() {
    let (_dir, file) = fixture("main.py", "print(1)\n");

    let output = run(&["delete", "--yes"], &file);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("warning: Only .vue | .ts | .js | .tsx | .jsx files are supported"),
        "Unexpected output: {}",
        stdout
    );
}

#[test]
fn test_dry_run_prints_result() {
    let original = "console.log(1);\nrun();\n";
    let (_dir, file) = fixture("main.js", original);

    let output = run(&["delete", "--yes", "--dry-run"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run();"), "Dry run should print the result: {}", stdout);
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_json_output() {
    let (_dir, file) = fixture("main.js", "console.log(1);\nrun();\n");

    let output = run(&["--json", "delete", "--yes"], &file);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["command"], "smart-log.deleteConsoleLog");
    assert_eq!(json["outcome"], "deleted");
    assert_eq!(json["count"], 1);
    assert_eq!(json["edits"][0]["type"], "delete");
    assert!(json["final_checksum"].is_string(), "JSON should have final_checksum");
    assert_ne!(json["final_checksum"], json["original_checksum"]);
}

#[test]
fn test_json_output_to_file() {
    let (dir, file) = fixture("main.ts", "const a = 10;\n");
    let report = dir.path().join("report.json");

    let output = Command::new(bin_path())
        .args(["insert", "--at", "1:7", "--json", "--output"])
        .arg(&report)
        .arg("--file")
        .arg(&file)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let content = fs::read_to_string(&report).expect("Failed to read output file");
    let json: serde_json::Value = serde_json::from_str(&content).expect("Output file should contain valid JSON");

    assert_eq!(json["outcome"], "inserted");
    assert_eq!(json["edit"]["type"], "insert");
    assert_eq!(json["edit"]["position"]["line"], 1);
}
