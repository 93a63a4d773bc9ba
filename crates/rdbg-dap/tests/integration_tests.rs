use assert_cmd::Command;
use rstest::rstest;
use serde_json::Value;
use tempfile::TempDir;

fn rdbg_dap(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rdbg-dap").unwrap();
    cmd.env("RDBG_DAP_CONFIG_DIR", config_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn test_configurations_lists_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;

    let assert = rdbg_dap(&config_dir).arg("configurations").assert().success();
    let json = stdout_json(&assert.get_output().stdout);

    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 12);
    assert_eq!(list[0]["name"], "run current file");
    assert_eq!(list[0]["request"], "launch");
    assert_eq!(list[0]["localfs"], true);
    assert_eq!(list[11]["name"], "attach to existing session");
    assert_eq!(list[11]["request"], "attach");

    Ok(())
}

#[test]
fn test_configurations_without_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;

    rdbg_dap(&config_dir)
        .args(["--no-default-configurations", "configurations"])
        .assert()
        .success()
        .stdout("[]\n");

    Ok(())
}

#[test]
fn test_no_nonstop_overrides_options_file() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;
    std::fs::write(config_dir.path().join("config.toml"), "nonstop = true\n")?;

    let assert = rdbg_dap(&config_dir)
        .args(["--no-nonstop", "configurations"])
        .assert()
        .success();
    let json = stdout_json(&assert.get_output().stdout);

    assert_eq!(json[0]["nonstop"], false);

    Ok(())
}

#[test]
fn test_configurations_from_options_file() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;
    std::fs::write(
        config_dir.path().join("config.toml"),
        r#"
nonstop = true
should_include_default_configurations = false

[[configurations]]
name = "minitest"
args = ["bundle", "exec", "ruby", "-Itest"]
target = "file"

[[configurations]]
name = "broken args"
args = ["ruby", 1]
"#,
    )?;

    let assert = rdbg_dap(&config_dir).arg("configurations").assert().success();
    let json = stdout_json(&assert.get_output().stdout);

    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "minitest");
    assert_eq!(list[0]["request"], "launch");
    assert_eq!(list[0]["nonstop"], true);
    assert_eq!(list[1]["request"], "attach");
    assert!(list[1].get("args").is_none());

    Ok(())
}

#[rstest]
#[case("rspec current line", "/srv/app/spec/user_spec.rb:12")]
#[case("rspec current file", "/srv/app/spec/user_spec.rb")]
#[case("rspec workspace", "/srv/app")]
fn test_adapter_launch(#[case] name: &str, #[case] target: &str) {
    let config_dir = tempfile::tempdir().unwrap();

    let assert = rdbg_dap(&config_dir)
        .args([
            "--nonstop",
            "--rdbg-path",
            "/x/rdbg",
            "adapter",
            name,
            "--cwd",
            "/srv/app",
            "--file",
            "spec/user_spec.rb",
            "--line",
            "12",
            "--port",
            "1234",
        ])
        .assert()
        .success();
    let json = stdout_json(&assert.get_output().stdout);

    assert_eq!(json["type"], "server");
    assert_eq!(json["host"], "127.0.0.1");
    assert_eq!(json["port"], 1234);
    assert_eq!(json["executable"]["command"], "/x/rdbg");
    assert_eq!(json["executable"]["cwd"], "/srv/app");
    assert_eq!(
        json["executable"]["args"],
        serde_json::json!([
            "--nonstop",
            "--open",
            "--host",
            "127.0.0.1",
            "--port",
            "1234",
            "--command",
            "--",
            "rspec",
            target
        ])
    );
}

#[test]
fn test_adapter_attach_reads_port_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;

    let assert = rdbg_dap(&config_dir)
        .args(["adapter", "attach to existing session", "--cwd", "/srv/app"])
        .write_stdin("38698\n")
        .assert()
        .success();
    let json = stdout_json(&assert.get_output().stdout);

    assert_eq!(json["port"], 38698);
    assert!(json.get("executable").is_none());

    Ok(())
}

#[test]
fn test_adapter_attach_without_port_fails() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;

    let assert = rdbg_dap(&config_dir)
        .args(["adapter", "attach to existing session", "--cwd", "/srv/app"])
        .write_stdin("")
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
    assert!(stderr.contains("a port is required to run the debugger"));

    Ok(())
}

#[test]
fn test_adapter_unknown_configuration() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;

    let assert = rdbg_dap(&config_dir)
        .args(["adapter", "does not exist"])
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
    assert!(stderr.contains("Unknown configuration: does not exist"));

    Ok(())
}

#[test]
fn test_launch_missing_debugger() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;
    let missing = config_dir.path().join("no-rdbg-here");

    let assert = rdbg_dap(&config_dir)
        .args(["--rdbg-path"])
        .arg(&missing)
        .args(["launch", "run current file", "--file", "app.rb", "--cwd"])
        .arg(config_dir.path())
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
    assert!(stderr.contains("missing dependency"));

    Ok(())
}

#[test]
fn test_launch_attach_does_not_spawn() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = tempfile::tempdir()?;

    let assert = rdbg_dap(&config_dir)
        .args([
            "launch",
            "attach to existing session",
            "--port",
            "4000",
            "--cwd",
            "/srv/app",
        ])
        .assert()
        .success();
    let json = stdout_json(&assert.get_output().stdout);

    assert_eq!(json["adapter"]["port"], 4000);
    assert!(json.get("pid").is_none());

    Ok(())
}
