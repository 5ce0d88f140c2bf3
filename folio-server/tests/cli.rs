use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("folio.yml");
    fs::write(
        &path,
        format!(
            r#"
site:
  title: "Test"
  author: "Tester"
  description: "Desc"
  url: "https://example.com"
database:
  path: "data.db"
{extra}"#
        ),
    )
    .unwrap();
    path
}

fn folio() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env_remove("FOLIO_CONFIG")
        .env_remove("FOLIO_AUTH_USERNAME")
        .env_remove("FOLIO_AUTH_PASSWORD")
        .env_remove("FOLIO_ADDR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn init_db_creates_database() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = write_config(dir.path(), "");

    folio()
        .arg("--config")
        .arg(&config)
        .arg("init-db")
        .assert()
        .success()
        .stdout(contains("(0 articles)"));
    assert!(dir.path().join("data.db").exists());

    // Idempotent on an existing database
    folio()
        .arg("--config")
        .arg(&config)
        .arg("init-db")
        .assert()
        .success();
    Ok(())
}

#[test]
fn config_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = write_config(dir.path(), "");

    folio()
        .env("FOLIO_CONFIG", &config)
        .arg("init-db")
        .assert()
        .success();
    assert!(dir.path().join("data.db").exists());
    Ok(())
}

#[test]
fn serve_refuses_to_start_without_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = write_config(dir.path(), "auth:\n  username: admin\n");

    folio()
        .arg("--config")
        .arg(&config)
        .args(["serve", "--addr", "127.0.0.1:0"])
        .assert()
        .failure()
        .stderr(contains("auth.password"));
    Ok(())
}

#[test]
fn missing_config_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    folio()
        .arg("--config")
        .arg(dir.path().join("absent.yml"))
        .arg("init-db")
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
    Ok(())
}
