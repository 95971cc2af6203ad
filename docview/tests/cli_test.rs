use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Run the docview binary from `dir` so no stray docview.toml is picked up
fn docview(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docview"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run docview")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_outline_text() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let output = docview(dir.path(), &["outline", sample.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Payments Service",
            "  section-0001  Overview",
            "    section-0002  Architecture",
            "  section-0003  Usage",
            "  section-0004  Troubleshooting",
        ]
    );
}

#[test]
fn test_outline_json() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let output = docview(dir.path(), &["outline", sample.to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["title"], "Payments Service");
    assert_eq!(value["sections"].as_array().unwrap().len(), 4);
    assert_eq!(value["sections"][1]["id"], "section-0002");
    assert_eq!(value["sections"][1]["level"], 2);
    assert!(value["sections"][0].get("content").is_none());

    let output = docview(
        dir.path(),
        &["outline", sample.to_str().unwrap(), "--json", "--with-content"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        value["sections"][0]["content"],
        "The **payments** service settles card transactions.\n\nIt exposes a small HTTP API."
    );
}

#[test]
fn test_outline_without_sections() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.md");
    fs::write(&input, "Just text, no headings.\n").unwrap();

    let output = docview(dir.path(), &["outline", input.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Technical Documentation\n"));
    assert!(text.contains("No sections found"));
}

#[test]
fn test_render_section_json() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let output = docview(
        dir.path(),
        &["render", sample.to_str().unwrap(), "-s", "section-0002", "--json"],
    );

    assert!(output.status.success());
    let blocks: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["kind"], "diagram");
    assert_eq!(blocks[0]["source"], "graph TD\n  A[Client] --> B[API]");
    assert_eq!(blocks[1]["kind"], "paragraph");
    assert_eq!(blocks[1]["html"], "Requests flow through the API.");
}

#[test]
fn test_render_unterminated_fence() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let output = docview(
        dir.path(),
        &["render", sample.to_str().unwrap(), "-s", "section-0004", "--json"],
    );

    assert!(output.status.success());
    let blocks: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(blocks[1]["kind"], "code");
    assert_eq!(blocks[1]["language"], "text");
    assert_eq!(blocks[1]["lines"][0], "panic at line 3");
}

#[test]
fn test_render_unknown_section_fails() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let output = docview(
        dir.path(),
        &["render", sample.to_str().unwrap(), "-s", "section-0099"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("section-0099"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = docview(dir.path(), &["outline", "does-not-exist.md"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read document"));
}

#[test]
fn test_stats() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let output = docview(dir.path(), &["stats", sample.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("  - 4 sections"));
    assert!(text.contains("  - 4 paragraphs"));
    assert!(text.contains("  - 2 code blocks"));
    assert!(text.contains("  - 1 diagrams"));
}

#[test]
fn test_view_writes_page() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let page_path = dir.path().join("out/page.html");
    let output = docview(
        dir.path(),
        &[
            "view",
            sample.to_str().unwrap(),
            "-o",
            page_path.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    assert!(stdout(&output).contains("Successfully wrote"));

    let page = fs::read_to_string(&page_path).unwrap();
    assert!(page.contains("<title>Payments Service</title>"));
    assert!(page.contains("<nav class=\"sidebar\">"));
    assert!(page.contains("id=\"diagram-section-0002-1\""));
    assert!(page.contains("<strong>payments</strong>"));
    assert!(page.contains("<code class=\"language-bash\">"));
    assert!(!page.contains("Preamble text"));
}

#[test]
fn test_view_single_section_without_sidebar() {
    let dir = tempfile::tempdir().unwrap();
    let sample = fixture("sample.md");
    let page_path = dir.path().join("usage.html");
    let output = docview(
        dir.path(),
        &[
            "view",
            sample.to_str().unwrap(),
            "-o",
            page_path.to_str().unwrap(),
            "--section",
            "section-0003",
            "--no-sidebar",
        ],
    );

    assert!(output.status.success());
    let page = fs::read_to_string(&page_path).unwrap();
    assert!(!page.contains("class=\"sidebar\""));
    assert!(page.contains("<section id=\"section-0003\">"));
    assert!(!page.contains("<section id=\"section-0001\">"));
    assert!(!page.contains("<script"));
}

#[test]
fn test_repo_source_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let repos = dir.path().join("docs/repositories");
    fs::create_dir_all(&repos).unwrap();
    fs::write(
        repos.join("billing_20240101_120000.md"),
        "# Billing v1\n\n## Old\n",
    )
    .unwrap();
    fs::write(
        repos.join("billing_20240201_120000.md"),
        "# Billing v2\n\n## New\n",
    )
    .unwrap();
    fs::write(repos.join("billing_latest.md"), "billing_20240201_120000.md").unwrap();

    let output = docview(dir.path(), &["outline", "--repo", "billing"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Billing v2\n"));

    let output = docview(dir.path(), &["list"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("billing (2 version(s))"));
    assert!(text.contains("20240201_120000"));

    let output = docview(dir.path(), &["outline", "--repo", "unknown"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_file_applies() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("docview.toml"),
        "fallback_title = \"Handbook\"\n",
    )
    .unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "## Only\nbody\n").unwrap();

    let output = docview(dir.path(), &["outline", input.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Handbook\n"));
}
