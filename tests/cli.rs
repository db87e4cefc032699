use std::process::Command;

const REQUIRED: [&str; 5] = [
    "GITHUB_TOKEN",
    "REPO_PATH",
    "PR_NUMBER",
    "OPENAI_API_KEY",
    "COMMIT_SHA",
];

#[test]
fn missing_configuration_lists_every_field() {
    let output = Command::new(env!("CARGO_BIN_EXE_readmebot"))
        .env_clear()
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    for name in REQUIRED {
        assert!(stderr.contains(name), "{name} not reported: {stderr}");
    }
    assert!(output.stdout.is_empty());
}

#[test]
fn dry_run_does_not_ask_for_run_id() {
    let output = Command::new(env!("CARGO_BIN_EXE_readmebot"))
        .env_clear()
        .env("NO_COLOR", "1")
        .args(["--dry-run", "--repo", "octocat/hello-world"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GITHUB_TOKEN"));
    assert!(stderr.contains("PR_NUMBER"));
    assert!(!stderr.contains("COMMIT_SHA"));
    assert!(!stderr.contains("REPO_PATH"));
}

#[test]
fn malformed_pr_number_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_readmebot"))
        .env_clear()
        .env("NO_COLOR", "1")
        .args(["--pr", "abc"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'abc'"));
    assert!(stderr.contains("positive"));
}

#[test]
fn help_mentions_environment_variables() {
    let output = Command::new(env!("CARGO_BIN_EXE_readmebot"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("REPO_PATH"));
    assert!(stdout.contains("--dry-run"));
}
