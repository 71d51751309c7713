use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const CS_ROADMAP: &str = r#"id: cs
name: Computer Science
label: علوم کامپیوتر
pdf: /CS-UT-V3.pdf
courses:
  - { id: prog, name: Programming, credits: 4, category: base }
  - { id: math1, name: Calculus, credits: 3, category: base }
  - id: ds
    name: Data Structures
    credits: 3
    category: specialized
    prerequisites: [prog]
    corequisites: [ds-lab]
  - { id: ds-lab, name: Data Structures Lab, credits: 1, category: specialized }
  - { id: algo, name: Algorithms, credits: 3, category: specialized, prerequisites: [ds, math1] }
  - { id: ai, name: Artificial Intelligence, credits: 3, category: elective, prerequisites: [algo] }
  - { id: seminar, name: Seminar, credits: 2, category: special }
"#;

struct TestRoot {
    root: PathBuf,
}

impl TestRoot {
    fn new() -> Self {
        let root = unique_temp_dir("progress");
        fs::create_dir_all(root.join("roadmaps")).expect("create roadmaps dir");
        fs::write(root.join("roadmaps").join("cs.yaml"), CS_ROADMAP).expect("write roadmap");
        Self { root }
    }

    fn run_roadmap(&self, args: &[&str]) -> std::process::Output {
        Command::new(roadmap_bin())
            .arg("--root")
            .arg(&self.root)
            .arg("--no-color")
            .args(args)
            .env_remove("ROADMAP_DATA_DIR")
            .env_remove("ROADMAP_LOG")
            .output()
            .expect("run roadmap")
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn roadmap_bin() -> PathBuf {
    PathBuf::from(
        std::env::var("CARGO_BIN_EXE_roadmap")
            .expect("CARGO_BIN_EXE_roadmap is not set for integration test"),
    )
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("roadmap-{prefix}-{pid}-{nanos}"))
}

fn assert_success(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(
        output.status.success(),
        "command failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
    );
    stdout
}

fn progress_json(root: &TestRoot) -> serde_json::Value {
    let stdout = assert_success(&root.run_roadmap(&["progress", "show", "cs", "--json"]));
    serde_json::from_str(&stdout).expect("parse progress json")
}

#[test]
fn toggle_persists_completion_per_department() {
    let root = TestRoot::new();

    let stdout = assert_success(&root.run_roadmap(&["progress", "toggle", "cs", "prog"]));
    assert!(stdout.contains("prog\tProgramming\t4\n"));
    assert!(stdout.contains("completed 4/19 credits"));
    assert!(root
        .root
        .join(".roadmap")
        .join("progress")
        .join("completed-courses%3A%3Acs.json")
        .is_file());

    assert_success(&root.run_roadmap(&["progress", "toggle", "cs", "ds"]));
    let progress = progress_json(&root);
    assert_eq!(progress["completed"], serde_json::json!(["ds", "prog"]));
    assert_eq!(progress["completed_credits"], 7);
    assert_eq!(progress["total_credits"], 19);

    let stdout = assert_success(&root.run_roadmap(&["progress", "toggle", "cs", "prog"]));
    assert!(stdout.contains("completed 3/19 credits"));
}

#[test]
fn clear_with_yes_empties_the_set() {
    let root = TestRoot::new();
    assert_success(&root.run_roadmap(&["progress", "toggle", "cs", "algo"]));
    assert_success(&root.run_roadmap(&["progress", "clear", "cs", "--yes"]));

    let progress = progress_json(&root);
    assert_eq!(progress["completed"], serde_json::json!([]));
    assert_eq!(progress["completed_credits"], 0);
}

#[test]
fn unknown_course_is_rejected() {
    let root = TestRoot::new();
    let output = root.run_roadmap(&["progress", "toggle", "cs", "cooking"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown course 'cooking'"), "stderr:\n{stderr}");
}

#[test]
fn corrupt_progress_file_reads_as_empty() {
    let root = TestRoot::new();
    let dir = root.root.join(".roadmap").join("progress");
    fs::create_dir_all(&dir).expect("create progress dir");
    fs::write(dir.join("completed-courses%3A%3Acs.json"), "{not json").expect("write corrupt file");

    let progress = progress_json(&root);
    assert_eq!(progress["completed"], serde_json::json!([]));

    let stdout = assert_success(&root.run_roadmap(&["progress", "toggle", "cs", "seminar"]));
    assert!(stdout.contains("completed 2/19 credits"));
    let saved = fs::read_to_string(dir.join("completed-courses%3A%3Acs.json")).expect("read saved");
    assert_eq!(saved, "[\"seminar\"]");
}
