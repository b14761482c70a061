use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run layerconf with given args.
fn layerconf() -> assert_cmd::Command {
    cargo_bin_cmd!("layerconf")
}

#[test]
fn init_scaffolds_a_working_root() {
    let dir = assert_fs::TempDir::new().unwrap();

    layerconf()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated layerconf.toml"));

    dir.child("layerconf.toml")
        .assert(predicate::str::contains("default_env = \"dev\""));
    dir.child("envs/dev.yaml").assert(predicate::path::exists());

    layerconf()
        .current_dir(dir.path())
        .args(["resolve", "app"])
        .assert()
        .success()
        .stdout("server.host=127.0.0.1\nserver.port=8080\n");
}

#[test]
fn init_twice_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    layerconf().current_dir(dir.path()).arg("init").assert().success();

    layerconf()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_keeps_existing_files() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("envs/dev.yaml").write_str("portOffset: 4\n").unwrap();

    layerconf()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    dir.child("envs/dev.yaml").assert("portOffset: 4\n");
}

#[test]
fn envs_lists_names_and_default() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("components").create_dir_all().unwrap();
    dir.child("envs/dev.yaml").write_str("").unwrap();
    dir.child("envs/prod.yaml").write_str("").unwrap();

    layerconf()
        .current_dir(dir.path())
        .arg("envs")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("prod"));
}

#[test]
fn envs_describes_one_environment_after_includes() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("components").create_dir_all().unwrap();
    dir.child("envs/base.yaml")
        .write_str("ip: 10.0.0.1\ngroups:\n  - name: db\n    components: [pg]\n")
        .unwrap();
    dir.child("envs/uat.yaml")
        .write_str(
            "include: { env: base }\n\
             portOffset: 3\n\
             groups:\n\
             \x20 - name: web\n\
             \x20   ip: 10.0.0.2\n\
             \x20   components: [api, { name: node1, type: node }]\n",
        )
        .unwrap();

    layerconf()
        .current_dir(dir.path())
        .args(["envs", "--env", "uat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment: uat"))
        .stdout(predicate::str::contains("base"))
        .stdout(predicate::str::contains("10.0.0.1"))
        .stdout(predicate::str::contains("3"))
        .stdout(predicate::str::contains("pg"))
        .stdout(predicate::str::contains("node1:node"));
}

#[test]
fn envs_reports_include_cycles() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("components").create_dir_all().unwrap();
    dir.child("envs/a.yaml").write_str("include: { env: b }\n").unwrap();
    dir.child("envs/b.yaml").write_str("include: { env: a }\n").unwrap();

    layerconf()
        .current_dir(dir.path())
        .args(["envs", "--env", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a -> b -> a"));
}

#[test]
fn duplicate_component_in_environment_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("components").create_dir_all().unwrap();
    dir.child("envs/dev.yaml")
        .write_str(
            "ip: 10.0.0.1\ngroups:\n  - name: a\n    components: [x]\n  - name: b\n    components: [x]\n",
        )
        .unwrap();

    layerconf()
        .current_dir(dir.path())
        .args(["envs", "--env", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("several definitions of component 'x'"));
}
