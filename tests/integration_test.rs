// tests/integration_test.rs
use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn ci_release(project_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ci-release"))
        .arg("--project-dir")
        .arg(project_dir)
        .args(args)
        .env_remove("PublishLanguage")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

/// Checkout whose origin is a local bare repository carrying `tags`.
fn project_with_remote_tags(tags: &[&str]) -> (tempfile::TempDir, tempfile::TempDir) {
    let remote = tempfile::tempdir().unwrap();
    let repo = Repository::init_bare(remote.path()).unwrap();
    let sig = Signature::now("CI", "ci@example.com").unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let commit_id = repo
        .commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();
    let commit = repo.find_object(commit_id, None).unwrap();
    for tag in tags {
        repo.tag_lightweight(tag, &commit, false).unwrap();
    }

    let checkout = tempfile::tempdir().unwrap();
    let local = Repository::init(checkout.path()).unwrap();
    local
        .remote("origin", remote.path().to_str().unwrap())
        .unwrap();

    (checkout, remote)
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = ci_release(dir.path(), &["--help"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("next-version"));
    assert!(out.contains("check-coverage"));
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = ci_release(dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_next_version_end_to_end() {
    let (checkout, _remote) = project_with_remote_tags(&["v1.4.0", "v1.4.2", "v1.4.1", "v2.0.0"]);
    fs::write(
        checkout.path().join("release.toml"),
        "[version]\ntarget = \"1.4\"\n",
    )
    .unwrap();
    fs::write(
        checkout.path().join("Cargo.toml"),
        "[package]\nname = \"svc\"\nversion = \"0.0.0\"\n",
    )
    .unwrap();

    let output = ci_release(checkout.path(), &["next-version", "--language", "RUST"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "##vso[task.setvariable variable=RELEASE_VERSION]1.4.3\n"
    );
    let manifest = fs::read_to_string(checkout.path().join("Cargo.toml")).unwrap();
    assert!(manifest.contains("version = \"1.4.3\""));
    let config = fs::read_to_string(checkout.path().join("release.toml")).unwrap();
    assert!(config.contains("release = \"1.4.3\""));
}

#[test]
fn test_next_version_new_line_with_plain_dialect() {
    let (checkout, _remote) = project_with_remote_tags(&["v1.4.0", "v1.4.2"]);
    fs::write(
        checkout.path().join("release.toml"),
        "[version]\ntarget = \"2.0\"\n",
    )
    .unwrap();

    let output = ci_release(
        checkout.path(),
        &["next-version", "--language", "go", "--dialect", "plain", "--no-write"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "RELEASE_VERSION=2.0.0\n");
    let config = fs::read_to_string(checkout.path().join("release.toml")).unwrap();
    assert!(!config.contains("release ="));
}

#[test]
fn test_next_version_language_from_environment() {
    let (checkout, _remote) = project_with_remote_tags(&["not-a-version", "v1.4.x", "v1.4.5"]);
    fs::write(
        checkout.path().join("release.toml"),
        "[version]\ntarget = \"1.4\"\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ci-release"))
        .arg("--project-dir")
        .arg(checkout.path())
        .args(["next-version", "--dialect", "plain"])
        .env("PublishLanguage", "GO")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "RELEASE_VERSION=1.4.6\n");
}

#[test]
fn test_next_version_remote_failure() {
    // Not a git checkout, so the tag query exits non-zero.
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("release.toml"), "[version]\ntarget = \"1.4\"\n").unwrap();

    let output = ci_release(dir.path(), &["next-version", "--language", "go"]);

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Remote operation failed"));
    let config = fs::read_to_string(dir.path().join("release.toml")).unwrap();
    assert!(!config.contains("release ="));
}

#[test]
fn test_next_version_malformed_target() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("release.toml"), "[version]\ntarget = \"1\"\n").unwrap();

    let output = ci_release(dir.path(), &["next-version", "--language", "go"]);

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Configuration error"));
}

#[test]
fn test_next_version_unknown_language() {
    let dir = tempfile::tempdir().unwrap();
    let output = ci_release(dir.path(), &["next-version", "--language", "cobol"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cobol"));
}

#[test]
fn test_next_version_missing_language_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = ci_release(dir.path(), &["next-version"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--language"));
}

#[test]
fn test_check_coverage_below_minimum_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("release.toml"), "[testing]\ncoverage_required = 0.85\n").unwrap();
    fs::write(dir.path().join("cov.xml"), r#"<coverage line-rate="0.7"/>"#).unwrap();

    let output = ci_release(
        dir.path(),
        &["check-coverage", "--format", "rust", "--report", "cov.xml"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("70.00%"));
}

#[test]
fn test_check_coverage_passes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cov.xml"),
        r#"<coverage><packages><package name="." line-rate="0.91"/></packages></coverage>"#,
    )
    .unwrap();

    let output = ci_release(
        dir.path(),
        &[
            "check-coverage",
            "--format",
            "python",
            "--report",
            "cov.xml",
            "--minimum",
            "0.9",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_service_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("release.toml"), "[metadata]\nname = \"billing\"\n").unwrap();

    let output = ci_release(dir.path(), &["service-name"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "##vso[task.setvariable variable=SERVICE_NAME]billing\n"
    );
}

#[test]
fn test_repo_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("release.toml"), "").unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    repo.remote("origin", "https://example.com/acme/inventory.git")
        .unwrap();

    let output = ci_release(dir.path(), &["repo-name", "--dialect", "plain"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "REPO_NAME=inventory\n");
}

#[test]
fn test_explicit_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = ci_release(dir.path(), &["--config", "/nonexistent/release.toml", "service-name"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Configuration error"));
}
