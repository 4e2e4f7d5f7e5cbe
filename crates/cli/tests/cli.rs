use assert_cmd::Command;

fn libris(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("libris").unwrap();
    cmd.env("LIBRIS_CONFIG_DIR", config_dir)
        .env_remove("LIBRIS_ENV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    let output = libris(dir.path()).arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for subcommand in ["serve", "migrate", "config"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn config_reflects_overlay_and_env_vars() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("test.toml"),
        "[server]\nport = 9191\n\n[database]\nurl = \"sqlite::memory:\"\n",
    )
    .unwrap();

    let output = libris(dir.path())
        .args(["--env", "test", "config"])
        .env("LIBRIS_SERVER__REQUEST_TIMEOUT_MS", "2500")
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "test");
    assert_eq!(settings["server"]["port"], 9191);
    assert_eq!(settings["server"]["request_timeout_ms"], 2500);
    assert_eq!(settings["database"]["url"], "sqlite::memory:");
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = libris(dir.path())
        .args(["--env", "qa", "config"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported environment"));
}

#[test]
fn migrate_creates_books_table() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("libris.db");

    let output = libris(dir.path())
        .arg("migrate")
        .env(
            "LIBRIS_DATABASE__URL",
            format!("sqlite://{}", db_path.display()),
        )
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(db_path.exists());
}
