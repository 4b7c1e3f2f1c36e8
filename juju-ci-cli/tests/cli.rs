//! End-to-end runs of the juju-ci binaries against a scripted fake juju

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Shell stand-in for juju keeping controller state as files in `$JUJU_DATA`.
///
/// Setting `FAKE_JUJU_STICKY_MODEL` makes destroy-model leave the selection.
const FAKE_JUJU: &str = r#"#!/bin/sh
state="$JUJU_DATA"
if [ "$1" = "--debug" ]; then shift; fi
cmd="$1"
shift
case "$cmd" in
  bootstrap)
    echo "$2" > "$state/controller"
    echo "$4" > "$state/current"
    echo "$4" > "$state/models"
    ;;
  add-model)
    echo "$1" >> "$state/models"
    echo "$1" > "$state/current"
    ;;
  destroy-model)
    model="${1#*:}"
    grep -vx "$model" "$state/models" > "$state/models.new" || true
    mv "$state/models.new" "$state/models"
    if [ -z "$FAKE_JUJU_STICKY_MODEL" ] && [ "$(cat "$state/current" 2>/dev/null)" = "$model" ]; then
      rm -f "$state/current"
    fi
    ;;
  switch)
    if [ $# -eq 0 ]; then
      if [ -f "$state/current" ]; then
        printf '%s:admin/%s\n' "$(cat "$state/controller")" "$(cat "$state/current")"
      else
        printf '%s\n' "$(cat "$state/controller")"
      fi
    else
      echo "${1#*:}" > "$state/current"
    fi
    ;;
  list-models)
    if [ -f "$state/current" ]; then
      printf '{"models":[],"current-model":"%s"}\n' "$(cat "$state/current")"
    else
      printf '{"models":[]}\n'
    fi
    ;;
  debug-log)
    echo "machine-0: fake agent log"
    ;;
  kill-controller)
    echo "$1" > "$state/killed"
    ;;
  *)
    echo "ERROR unrecognized command: juju $cmd" >&2
    exit 2
    ;;
esac
"#;

struct FakeJujuHome {
    dir: tempfile::TempDir,
}

impl FakeJujuHome {
    #[cfg(unix)]
    fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let script = dir.path().join("juju");
        std::fs::write(&script, FAKE_JUJU).expect("write fake juju");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("make fake juju executable");
        std::fs::write(dir.path().join("config.toml"), "keep_env = false\n")
            .expect("write config");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn juju_bin(&self) -> PathBuf {
        self.path().join("juju")
    }

    fn logs(&self) -> PathBuf {
        self.path().join("logs")
    }

    fn destroy_model_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("juju-ci").expect("juju-ci binary");
        cmd.env("JUJU_DATA", self.path())
            .env_remove("FAKE_JUJU_STICKY_MODEL")
            .arg("--config")
            .arg(self.path().join("config.toml"))
            .arg("destroy-model")
            .arg("lxd")
            .arg(self.juju_bin())
            .arg(self.logs())
            .arg("ci-ctrl");
        cmd
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).unwrap_or_default()
    }
}

#[cfg(unix)]
#[test]
fn destroy_model_passes_and_tears_down() {
    let home = FakeJujuHome::new();
    home.destroy_model_cmd().assert().success();

    assert_eq!(home.read("killed"), "ci-ctrl\n");
    assert_eq!(home.read("current"), "ci-ctrl\n");
    assert_eq!(home.read("models"), "ci-ctrl\n");
    let debug_log = std::fs::read_to_string(home.logs().join("debug-log.txt")).unwrap();
    assert!(debug_log.contains("fake agent log"));
}

#[cfg(unix)]
#[test]
fn destroy_model_fails_when_selection_survives() {
    let home = FakeJujuHome::new();
    let output = home
        .destroy_model_cmd()
        .env("FAKE_JUJU_STICKY_MODEL", "1")
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Juju failed to unset model after it was destroyed"),
        "stderr was: {stderr}"
    );
    // teardown still happened
    assert_eq!(home.read("killed"), "ci-ctrl\n");
}

#[cfg(unix)]
#[test]
fn destroy_model_keep_env_skips_kill() {
    let home = FakeJujuHome::new();
    home.destroy_model_cmd().arg("--keep-env").assert().success();
    assert_eq!(home.read("killed"), "");
}

#[test]
fn destroy_model_requires_env() {
    Command::cargo_bin("juju-ci")
        .unwrap()
        .arg("destroy-model")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn git_gate_requires_project() {
    let output = Command::cargo_bin("juju-ci")
        .unwrap()
        .args(["git-gate", "--merge-url", "git.testing/proposed"])
        .assert()
        .failure()
        .code(2)
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--project"), "stderr was: {stderr}");
}

#[test]
fn git_gate_wrapper_delegates_to_juju_ci() {
    let output = Command::cargo_bin("git_gate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--merge-ref"), "stdout was: {stdout}");
    assert!(stdout.contains("--dependency"), "stdout was: {stdout}");
}

#[test]
fn assess_wrapper_forwards_usage_errors() {
    Command::cargo_bin("assess_destroy_model")
        .unwrap()
        .assert()
        .failure()
        .code(2);
}

/// Shell stand-in for git, logging each call to `$GATE_LOG`.
///
/// Clone creates the target directory. The subcommand named in `GATE_FAIL`
/// prints to both streams and exits 128.
const FAKE_GIT: &str = r#"#!/bin/sh
case "$1" in
  clone)
    mkdir -p "$3"
    echo "git clone $2 src/${3#*/src/}" >> "$GATE_LOG"
    ;;
  *)
    echo "git $*" >> "$GATE_LOG"
    ;;
esac
if [ "$1" = "$GATE_FAIL" ]; then
  echo "error: pathspec '$2' did not match any file(s) known to git"
  echo "hint: try git fetch" >&2
  exit 128
fi
"#;

/// Shell stand-in for go, logging each call to `$GATE_LOG` and the GOPATH it
/// saw to `$GATE_LOG.gopath`. `get` creates the package source directory and
/// `install` drops a logging godeps into `$GOPATH/bin`.
const FAKE_GO: &str = r#"#!/bin/sh
echo "go $*" >> "$GATE_LOG"
echo "$GOPATH" > "$GATE_LOG.gopath"
case "$1" in
  get)
    for pkg; do :; done
    mkdir -p "$GOPATH/src/${pkg%/...}"
    ;;
  install)
    mkdir -p "$GOPATH/bin"
    printf '#!/bin/sh\necho "godeps $1 src/${2#*/src/}" >> "$GATE_LOG"\n' > "$GOPATH/bin/godeps"
    chmod +x "$GOPATH/bin/godeps"
    ;;
esac
"#;

struct FakeGoToolchain {
    dir: tempfile::TempDir,
}

impl FakeGoToolchain {
    #[cfg(unix)]
    fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let bin = dir.path().join("bin");
        std::fs::create_dir(&bin).expect("create bin dir");
        std::fs::create_dir(dir.path().join("tmp")).expect("create tmp dir");
        for (name, script) in [("git", FAKE_GIT), ("go", FAKE_GO)] {
            let path = bin.join(name);
            std::fs::write(&path, script).expect("write fake tool");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("make fake tool executable");
        }
        Self { dir }
    }

    fn log(&self) -> PathBuf {
        self.dir.path().join("calls")
    }

    fn git_gate_cmd(&self, args: &[&str]) -> Command {
        let mut path = vec![self.dir.path().join("bin")];
        path.extend(std::env::split_paths(
            &std::env::var_os("PATH").unwrap_or_default(),
        ));

        let mut cmd = Command::cargo_bin("juju-ci").expect("juju-ci binary");
        cmd.env("PATH", std::env::join_paths(path).expect("join PATH"))
            .env("TMPDIR", self.dir.path().join("tmp"))
            .env("GATE_LOG", self.log())
            .env_remove("GATE_FAIL")
            .arg("git-gate")
            .args(args);
        cmd
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// GOPATH the gate handed to go
    fn gopath(&self) -> PathBuf {
        let mut log = self.log().into_os_string();
        log.push(".gopath");
        PathBuf::from(std::fs::read_to_string(log).expect("go was run").trim())
    }
}

#[cfg(unix)]
#[test]
fn git_gate_merges_then_fetches_dependencies_in_order() {
    let tools = FakeGoToolchain::new();
    tools
        .git_gate_cmd(&[
            "--project",
            "x.y/p",
            "--project-url",
            "u",
            "--merge-url",
            "m",
            "--go-get-all",
            "-d",
            "a",
            "-d",
            "b",
        ])
        .assert()
        .success();

    assert_eq!(
        tools.calls(),
        vec![
            "git clone u src/x.y/p",
            "git fetch m HEAD",
            "git merge --no-ff -m Merged HEAD FETCH_HEAD",
            "go get -v -d -t x.y/p/...",
            "go get -v -d a",
            "go get -v -d b",
            "go build x.y/p/...",
            "go test x.y/p/...",
        ]
    );
    let gopath = tools.gopath();
    assert!(
        gopath.file_name().unwrap().to_string_lossy().starts_with("git_gate_"),
        "gopath was {}",
        gopath.display()
    );
    assert!(!gopath.exists(), "working dir was not removed");
}

#[cfg(unix)]
#[test]
fn git_gate_go_get_all_with_godeps_and_keep() {
    let tools = FakeGoToolchain::new();
    tools
        .git_gate_cmd(&[
            "--project",
            "x.y/p",
            "--project-ref",
            "v1",
            "--go-get-all",
            "--tsv-path",
            "deps.tsv",
            "--keep",
        ])
        .assert()
        .success();

    assert_eq!(
        tools.calls(),
        vec![
            "go get -v -d -t x.y/p/...",
            "git checkout v1",
            "go get -v -d github.com/rogpeppe/godeps/...",
            "go install github.com/rogpeppe/godeps/...",
            "godeps -u src/x.y/p/deps.tsv",
            "go build x.y/p/...",
            "go test x.y/p/...",
        ]
    );
    assert!(tools.gopath().is_dir(), "working dir was removed despite --keep");
}

#[cfg(unix)]
#[test]
fn git_gate_reports_failed_step() {
    let tools = FakeGoToolchain::new();
    let output = tools
        .git_gate_cmd(&["--project", "x.y/p", "--project-url", "u", "--project-ref", "v1"])
        .env("GATE_FAIL", "checkout")
        .assert()
        .failure()
        .code(1)
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stderr.contains("Subprocess git checkout failed with code 128"),
        "stderr was: {stderr}"
    );
    assert!(
        stdout.contains("error: pathspec 'v1' did not match"),
        "stdout was: {stdout}"
    );
    assert!(stdout.contains("hint: try git fetch"), "stdout was: {stdout}");
    assert_eq!(tools.calls(), vec!["git clone u src/x.y/p", "git checkout v1"]);
}
