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
        let root = unique_temp_dir("view");
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

fn view_json(root: &TestRoot, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["view", "cs", "--json"];
    full.extend_from_slice(args);
    let stdout = assert_success(&root.run_roadmap(&full));
    serde_json::from_str(&stdout).expect("parse view json")
}

#[test]
fn selection_lights_the_connected_chain() {
    let root = TestRoot::new();
    let view = view_json(&root, &["--select", "ds"]);
    let nodes = &view["nodes"];
    let edges = &view["edges"];

    assert_eq!(nodes["ds"]["highlighted"], true);
    for lit in ["ds", "prog", "algo", "ai"] {
        assert_eq!(nodes[lit]["dimmed"], false, "{lit} should be lit");
    }
    for dim in ["math1", "ds-lab", "seminar"] {
        assert_eq!(nodes[dim]["dimmed"], true, "{dim} should be dimmed");
    }

    assert_eq!(edges["e-prog-ds"]["emphasized"], true);
    assert_eq!(edges["e-ds-algo"]["emphasized"], true);
    assert_eq!(edges["e-algo-ai"]["emphasized"], false);
    assert_eq!(edges["e-algo-ai"]["visibility"], "visible");
    assert_eq!(edges["e-math1-algo"]["visibility"], "faint");
    assert_eq!(edges["e-coreq-ds-lab-ds"]["emphasized"], false);
}

#[test]
fn available_mode_follows_completed_courses() {
    let root = TestRoot::new();
    assert_success(&root.run_roadmap(&["progress", "toggle", "cs", "prog"]));

    let view = view_json(&root, &["--available"]);
    assert_eq!(
        view["available"],
        serde_json::json!(["ds", "ds-lab", "math1", "seminar"])
    );
    assert_eq!(view["nodes"]["prog"]["completed"], true);
    assert_eq!(view["nodes"]["ds"]["dimmed"], false);
    assert_eq!(view["nodes"]["algo"]["dimmed"], true);
    assert_eq!(view["filters"]["available_only"], true);
}

#[test]
fn category_filters_dim_other_categories() {
    let root = TestRoot::new();

    let view = view_json(&root, &["--category", "base"]);
    assert_eq!(view["nodes"]["prog"]["dimmed"], false);
    assert_eq!(view["nodes"]["ds"]["dimmed"], true);
    assert_eq!(view["edges"]["e-prog-ds"]["visibility"], "faint");

    let view = view_json(&root, &["--hide", "elective", "--hide", "special"]);
    assert_eq!(view["nodes"]["ai"]["dimmed"], true);
    assert_eq!(view["nodes"]["seminar"]["dimmed"], true);
    assert_eq!(view["nodes"]["algo"]["dimmed"], false);
    assert_eq!(view["filters"]["categories"], serde_json::json!(["base", "specialized"]));
}

#[test]
fn hiding_the_last_category_keeps_it_visible() {
    let root = TestRoot::new();
    let output = root.run_roadmap(&["view", "cs", "--json", "--category", "base", "--hide", "base"]);
    let stdout = assert_success(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stays visible"), "stderr:\n{stderr}");
    let view: serde_json::Value = serde_json::from_str(&stdout).expect("parse view json");
    assert_eq!(view["nodes"]["prog"]["dimmed"], false);
}

#[test]
fn text_view_flags_each_course() {
    let root = TestRoot::new();
    let stdout = assert_success(&root.run_roadmap(&["view", "cs", "--select", "algo"]));
    assert!(stdout.contains("algo\tAlgorithms\tselected"));
    assert!(stdout.contains("seminar\tSeminar\tavailable,dimmed"));
}

#[test]
fn invalid_category_is_a_usage_error() {
    let root = TestRoot::new();
    let output = root.run_roadmap(&["view", "cs", "--category", "sports"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown category 'sports'"), "stderr:\n{stderr}");
}
