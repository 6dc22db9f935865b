use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn command(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_changed-code-files"));
    cmd.current_dir(dir)
        .env_remove("GITHUB_BASE_SHA")
        .env_remove("GITHUB_HEAD_SHA")
        .env_remove("GITHUB_API_URL")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_TOKEN");
    cmd
}

fn write_config(dir: &Path, server: &MockServer) {
    let content = format!(
        "[github]\napi_url = \"{}\"\nrepository = \"acme/widgets\"\n",
        server.uri()
    );
    std::fs::write(dir.join(".changed-code-files.toml"), content).unwrap();
}

async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn prints_code_files_one_per_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/abc123...def456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                { "filename": "src/core.py" },
                { "filename": "docs/readme.md" },
                { "filename": ".github/workflows/ci.yml" },
                { "filename": "README.md" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.env("GITHUB_BASE_SHA", "abc123")
        .env("GITHUB_HEAD_SHA", "def456");

    let output = run(cmd).await;
    assert!(
        output.status.success(),
        "failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout_lines(&output), vec!["src/core.py"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("base = abc123"));
    assert!(stderr.contains("head = def456"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_base_exits_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.env("GITHUB_HEAD_SHA", "def456");

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no base commit (missing) or head commit (set) given"));
}

#[tokio::test(flavor = "multi_thread")]
async fn upstream_404_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/abc...def"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.env("GITHUB_BASE_SHA", "abc").env("GITHUB_HEAD_SHA", "def");

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not Found"));
    assert!(stderr.contains("could not find any commit files"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_comparison_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/abc...abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.env("GITHUB_BASE_SHA", "abc").env("GITHUB_HEAD_SHA", "abc");

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not find any commit files"));
}

#[tokio::test(flavor = "multi_thread")]
async fn repository_flag_overrides_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/compare/abc...def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                { "filename": "docker/helm/values.yaml" },
                { "filename": "lib/util.go" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.args(["--repository", "octocat/hello-world", "--quiet"])
        .env("GITHUB_BASE_SHA", "abc")
        .env("GITHUB_HEAD_SHA", "def");

    let output = run(cmd).await;
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["lib/util.go"]);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("base = abc"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path())
        .args(["--config", "nope.toml"])
        .env("GITHUB_BASE_SHA", "abc")
        .env("GITHUB_HEAD_SHA", "def")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.toml"));
}

#[tokio::test(flavor = "multi_thread")]
async fn github_repository_env_overrides_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/runner-org/runner-repo/compare/abc...def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{ "filename": "src/main.rs" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.env("GITHUB_REPOSITORY", "runner-org/runner-repo")
        .env("GITHUB_BASE_SHA", "abc")
        .env("GITHUB_HEAD_SHA", "def");

    let output = run(cmd).await;
    assert!(
        output.status.success(),
        "failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout_lines(&output), vec!["src/main.rs"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn repository_flag_beats_github_repository_env() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/pinned/compare/abc...def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{ "filename": "lib/util.go" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.args(["--repository", "acme/pinned"])
        .env("GITHUB_REPOSITORY", "runner-org/runner-repo")
        .env("GITHUB_BASE_SHA", "abc")
        .env("GITHUB_HEAD_SHA", "def");

    let output = run(cmd).await;
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["lib/util.go"]);
}

#[test]
fn help_documents_github_repository_override() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GITHUB_REPOSITORY"));
    assert!(stdout.contains("GitHub Actions always sets this"));
}

#[tokio::test(flavor = "multi_thread")]
async fn response_without_files_fails_with_diagnostic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/abc...def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ahead" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let mut cmd = command(dir.path());
    cmd.env("GITHUB_BASE_SHA", "abc").env("GITHUB_HEAD_SHA", "def");

    let output = run(cmd).await;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ccf::response"), "stderr: {stderr}");
    assert!(stderr.contains("missing field `files`"), "stderr: {stderr}");
}
