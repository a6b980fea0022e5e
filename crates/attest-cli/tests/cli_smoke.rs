use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn attest(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("attest").unwrap();
    cmd.env("ATTEST_DB", dir.join("attest.db"))
        .env("ATTEST_DATA_DIR", dir.join("objects"))
        .env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn upload_list_show_delete_lifecycle() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let evidence = dir.path().join("policy.txt");
    std::fs::write(&evidence, "MFA required for all admins")?;

    // Upload prints the created item as JSON.
    let out = attest(dir.path())
        .args(["upload", evidence.to_str().unwrap(), "--uploaded-by", "auditor-1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let item: serde_json::Value = serde_json::from_slice(&out)?;
    let id = item["id"].as_str().unwrap().to_string();
    assert_eq!(item["status"], "pending");
    assert_eq!(item["file_type"], "text/plain");

    attest(dir.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policy.txt"))
        .stdout(predicate::str::contains("pending"));

    // Scoping: another principal cannot see the item.
    attest(dir.path())
        .args(["show", &id, "--principal", "someone-else"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));

    attest(dir.path())
        .args(["show", &id, "--principal", "auditor-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("validation runs: 0"));

    attest(dir.path())
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    attest(dir.path())
        .args(["show", &id])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn validate_unknown_id_reports_not_found() -> anyhow::Result<()> {
    let dir = tempdir()?;
    attest(dir.path())
        .args(["validate", "no-such-id"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    Ok(())
}
