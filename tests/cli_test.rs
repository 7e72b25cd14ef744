//! Integration tests for the assetgate binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".assetgate");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    temp
}

fn assetgate(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("assetgate"));
    cmd.current_dir(temp.path());
    cmd.env_remove("ASSETGATE_STRICT");
    cmd
}

const PROJECT_CONFIG: &str = r#"
package:
  name: quantlab
  version: 0.1.0
  entry_points:
    jupyter-quantlab: quantlab.quantlabapp:main
manifests:
  assets:
    paths: [quantlab/static/main.bundle.js]
    build: mkdir -p quantlab/static && touch quantlab/static/main.bundle.js
  core:
    paths: [quantlab/core.json]
    build: mkdir -p quantlab && touch quantlab/core.json
commands:
  build_py:
    run: touch build_py.done
    gate: { manifest: core }
  sdist:
    run: touch sdist.done
    gate: { manifest: assets, strict: true }
  bdist_egg:
    run: touch egg.done
    explicit_only: true
  release:
    run: touch release.done
    depends_on: [bdist_egg]
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("assetgate"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Refuse to package"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("assetgate"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn sdist_without_assets_fails_and_does_not_package() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["run", "sdist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing assets"))
        .stderr(predicate::str::contains("quantlab/static/main.bundle.js"));

    assert!(!temp.path().join("sdist.done").exists());
    assert!(!temp.path().join("quantlab/static").exists());
    Ok(())
}

const ASSETS_ONLY: &str = r#"
package:
  name: quantlab
manifests:
  assets:
    paths: [quantlab/static/main.bundle.js]
    build: mkdir -p quantlab/static && touch quantlab/static/main.bundle.js
"#;

#[test]
fn overriding_sdist_run_keeps_strict_gate() -> Result<(), Box<dyn std::error::Error>> {
    let config = format!("{}commands:\n  sdist:\n    run: touch sdist.done\n", ASSETS_ONLY);
    let temp = setup_project(&config);
    assetgate(&temp)
        .args(["run", "sdist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing assets"));

    assert!(!temp.path().join("sdist.done").exists());
    assert!(!temp.path().join("quantlab/static").exists());
    Ok(())
}

#[test]
fn self_heal_gate_on_sdist_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let config = format!(
        "{}commands:\n  sdist:\n    run: touch sdist.done\n    gate: {{ manifest: assets }}\n",
        ASSETS_ONLY
    );
    let temp = setup_project(&config);
    assetgate(&temp)
        .args(["run", "sdist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("strict: true"));

    assert!(!temp.path().join("sdist.done").exists());
    assert!(!temp.path().join("quantlab/static").exists());
    Ok(())
}

#[test]
fn sdist_without_assets_manifest_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp =
        setup_project("package:\n  name: quantlab\ncommands:\n  sdist:\n    run: touch sdist.done\n");
    assetgate(&temp)
        .args(["run", "sdist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has no asset gate"));

    assert!(!temp.path().join("sdist.done").exists());
    Ok(())
}

#[test]
fn build_py_builds_missing_core_and_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["run", "build_py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished build_py"));

    assert!(temp.path().join("quantlab/core.json").exists());
    assert!(temp.path().join("build_py.done").exists());
    Ok(())
}

#[test]
fn jsdeps_then_sdist_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["run", "jsdeps", "sdist"])
        .assert()
        .success();

    assert!(temp.path().join("sdist.done").exists());
    Ok(())
}

#[test]
fn strict_flag_blocks_self_heal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["run", "build_py", "--strict"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing assets"));

    assert!(!temp.path().join("quantlab/core.json").exists());
    Ok(())
}

#[test]
fn stale_manifest_is_removed() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    fs::write(temp.path().join("MANIFEST"), "setup.py\n")?;

    assetgate(&temp)
        .args(["run", "build_py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed stale MANIFEST"));

    assert!(!temp.path().join("MANIFEST").exists());
    Ok(())
}

#[test]
fn explicit_only_command_as_dependency_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["run", "release"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("can only be run explicitly"));

    assert!(!temp.path().join("egg.done").exists());
    assert!(!temp.path().join("release.done").exists());
    Ok(())
}

#[test]
fn explicit_only_command_runs_when_named() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp).args(["run", "bdist_egg"]).assert().success();

    assert!(temp.path().join("egg.done").exists());
    Ok(())
}

#[test]
fn unknown_command_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["run", "upload"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: upload"));
    Ok(())
}

#[test]
fn unsupported_interpreter_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let config = format!(
        "{}interpreter:\n  command: echo Python 3.2.5\n",
        PROJECT_CONFIG
    );
    let temp = setup_project(&config);
    assetgate(&temp)
        .args(["run", "build_py"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("quantlab requires echo"))
        .stderr(predicate::str::contains("found 3.2.5"));

    assert!(!temp.path().join("build_py.done").exists());
    Ok(())
}

#[test]
fn supported_interpreter_passes() -> Result<(), Box<dyn std::error::Error>> {
    let config = format!(
        "{}interpreter:\n  command: echo Python 2.7.18\n",
        PROJECT_CONFIG
    );
    let temp = setup_project(&config);
    assetgate(&temp).args(["run", "build_py"]).assert().success();
    Ok(())
}

#[test]
fn missing_config_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    assetgate(&temp)
        .args(["--project", temp.path().to_str().unwrap(), "check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No configuration found"));
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("package:\n  name: quantlab\ncommands:\n  sdist:\n    run: x\n    gate: { manifest: nope }\n");
    assetgate(&temp)
        .args(["run", "sdist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn check_reports_readiness() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["check"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("assets: missing"));

    assetgate(&temp).args(["run", "jsdeps", "coredeps"]).assert().success();

    assetgate(&temp)
        .args(["check", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ready\""));
    Ok(())
}

#[test]
fn list_shows_gates() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    assetgate(&temp)
        .args(["--no-color", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strict gate on assets"))
        .stdout(predicate::str::contains("self-heal gate on core"));
    Ok(())
}

#[test]
fn metadata_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    let output = assetgate(&temp).args(["metadata", "--json"]).output()?;
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["name"], "quantlab");
    assert_eq!(
        parsed["entry_points"]["jupyter-quantlab"],
        "quantlab.quantlabapp:main"
    );
    Ok(())
}

#[test]
fn clean_dry_run_lists_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(PROJECT_CONFIG);
    fs::create_dir_all(temp.path().join("node_modules/react"))?;

    assetgate(&temp)
        .args(["clean", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove node_modules"))
        .stdout(predicate::str::contains("Would run git clean -dfx"));

    assert!(temp.path().join("node_modules").exists());
    Ok(())
}

#[test]
fn completions_generate() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("assetgate"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("assetgate"));
    Ok(())
}
