//! Integration tests for configuration layering.
//!
//! Tests the priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;

/// An `eyefit` command isolated from the user's config, data and CAD keys.
fn eyefit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("eyefit").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env_remove("EYEFIT_CAD_ACCESS_KEY")
        .env_remove("EYEFIT_CAD_SECRET_KEY");
    cmd
}

fn write_project_config(dir: &Path, content: &str) {
    fs::write(dir.join(".eyefit.toml"), content).unwrap();
}

fn write_xdg_config(home: &Path, content: &str) {
    let dir = home.join(".config/eyefit");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_default_cascades_path_is_data_dir() {
    let home = tempfile::tempdir().unwrap();
    eyefit(home.path())
        .args(["cascades", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".local/share/eyefit/cascades"));
}

#[test]
fn test_project_config_sets_cascades_dir() {
    let home = tempfile::tempdir().unwrap();
    write_project_config(
        home.path(),
        r"
[cascades]
dir = '/opt/eyefit-cascades'
",
    );

    eyefit(home.path())
        .args(["cascades", "path"])
        .assert()
        .success()
        .stdout(predicate::str::diff("/opt/eyefit-cascades\n"));
}

#[test]
fn test_project_config_overrides_xdg() {
    let home = tempfile::tempdir().unwrap();
    write_xdg_config(
        home.path(),
        r"
[cascades]
dir = '/from/xdg'
",
    );

    eyefit(home.path())
        .args(["cascades", "path"])
        .assert()
        .stdout(predicate::str::diff("/from/xdg\n"));

    write_project_config(
        home.path(),
        r"
[cascades]
dir = '/from/project'
",
    );

    eyefit(home.path())
        .args(["cascades", "path"])
        .assert()
        .stdout(predicate::str::diff("/from/project\n"));
}

#[test]
fn test_cli_overrides_project_config() {
    let home = tempfile::tempdir().unwrap();
    write_project_config(
        home.path(),
        r"
[cascades]
dir = '/from/project'
",
    );

    eyefit(home.path())
        .args(["cascades", "path", "--dir", "/from/cli"])
        .assert()
        .stdout(predicate::str::diff("/from/cli\n"));
}

#[test]
fn test_project_config_found_in_parent() {
    let home = tempfile::tempdir().unwrap();
    write_project_config(
        home.path(),
        r"
[cascades]
dir = '/from/parent'
",
    );
    let nested = home.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();

    eyefit(home.path())
        .current_dir(&nested)
        .args(["cascades", "path"])
        .assert()
        .stdout(predicate::str::diff("/from/parent\n"));
}

#[test]
fn test_invalid_config_value_warns() {
    let home = tempfile::tempdir().unwrap();
    write_project_config(
        home.path(),
        r"
[measure]
center_tolerance = 1.5
",
    );

    eyefit(home.path())
        .args(["cascades", "path"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: measure.center_tolerance must be 0.0-1.0",
        ));
}

#[test]
fn test_cascades_list_uses_configured_dir() {
    let home = tempfile::tempdir().unwrap();
    let cascades = home.path().join("cascades");
    fs::create_dir(&cascades).unwrap();
    fs::write(cascades.join("haarcascade_frontalface_default.xml"), "<face/>").unwrap();
    fs::write(cascades.join("haarcascade_eye.xml"), "<eye/>").unwrap();
    write_project_config(
        home.path(),
        &format!("[cascades]\ndir = '{}'\n", cascades.display()),
    );

    eyefit(home.path())
        .args(["cascades", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("✓ haarcascade_frontalface_default.xml")
                .and(predicate::str::contains("✓ haarcascade_eye.xml"))
                .and(predicate::str::contains("2/2 cascades found")),
        );
}

#[test]
fn test_cascades_fetch_keeps_present_files() {
    let home = tempfile::tempdir().unwrap();
    let cascades = home.path().join("cascades");
    fs::create_dir(&cascades).unwrap();
    fs::write(cascades.join("haarcascade_frontalface_default.xml"), "face").unwrap();
    fs::write(cascades.join("haarcascade_eye.xml"), "eye").unwrap();

    eyefit(home.path())
        .arg("cascades")
        .arg("fetch")
        .arg("--dir")
        .arg(&cascades)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("haarcascade_eye.xml (present)").and(
                predicate::str::contains(
                    "sha256 47c215b5f70eb9c9b4bcb2c027007d6cf38a899f40d1d1da6922e49308b15b69",
                ),
            ),
        );

    assert_eq!(
        fs::read_to_string(cascades.join("haarcascade_eye.xml")).unwrap(),
        "eye"
    );
}

/// Answers one HTTP request with 200 and hands back the request body.
fn accept_one() -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_lowercase();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("content-length:") {
                length = value.trim().parse().unwrap();
            }
        }
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}"
        )
        .unwrap();
        stream.flush().unwrap();
        tx.send(String::from_utf8(body).unwrap()).unwrap();
    });

    (format!("http://{addr}"), rx)
}

#[test]
fn test_push_uses_cad_config() {
    let home = tempfile::tempdir().unwrap();
    let (base_url, body) = accept_one();
    write_project_config(
        home.path(),
        &format!(
            r"
[cad]
base_url = '{base_url}'
document_id = 'doc'
workspace_id = 'ws'
element_id = 'el'
access_key = 'access'
secret_key = 'secret'
offset_mm = 2.5
"
        ),
    );

    eyefit(home.path())
        .args(["push", "--bridge", "18", "--lens-length", "50", "--lens-width", "40"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("BridgeWid = 20.5 mm")
                .and(predicate::str::contains("LensLen = 50 mm"))
                .and(predicate::str::contains("LensWid = 40 mm")),
        );

    let body = body.recv().unwrap();
    assert!(body.contains(r#""variableId":"BridgeWid","expression":"20.5 mm""#));
}
