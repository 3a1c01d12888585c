use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SENTINEL: &[u8] = b"dL7pKGdnNz796PbbjQWNKmHXBZaB9tsX";

const CONFIG: &str = r#"{
  "_comment": "test fuses",
  "_schema": "0 == off, 1 == on",
  "_version": 1,
  // this is ignored
  "run_as_node": "1",
  "cookie_encryption": "0",
  "grant_file_protocol_extra_privileges": "1"
}"#;

fn fuses() -> Command {
    Command::cargo_bin("fuses").unwrap()
}

fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("fuses.json5");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn generates_with_bundled_config() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("fuses.h");
    let source = dir.path().join("fuses.cc");

    fuses().arg(&header).arg(&source).assert().success();

    let header = fs::read_to_string(header).unwrap();
    let source = fs::read_to_string(source).unwrap();
    assert!(header.contains("FUSE_EXPORT bool IsRunAsNodeEnabled();"));
    assert!(header.contains("FUSE_EXPORT bool IsCookieEncryptionEnabled();"));
    assert!(source.contains("return kFuseWire[34] == '1';"));
}

#[test]
fn generates_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, CONFIG);
    let header = dir.path().join("fuses.h");
    let source = dir.path().join("fuses.cc");

    fuses()
        .arg(&header)
        .arg(&source)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 fuses"));

    let source = fs::read_to_string(source).unwrap();
    assert!(source.contains("/* fuse_version */ 0x01, /* fuse_wire_length */ 0x03, /* fuse_wire */ 0x31,0x30,0x31};"));
    assert!(source.contains("bool IsGrantFileProtocolExtraPrivilegesEnabled() {\n  return kFuseWire[36] == '1';\n}"));
}

#[test]
fn requires_two_output_paths() {
    fuses().assert().failure();
    fuses().arg("only-one.h").assert().failure();
}

#[test]
fn version_overflow_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &CONFIG.replace("\"_version\": 1", "\"_version\": 256"));
    let header = dir.path().join("fuses.h");
    let source = dir.path().join("fuses.cc");

    fuses()
        .arg(&header)
        .arg(&source)
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("can not exceed one byte"));

    assert!(!header.exists());
    assert!(!source.exists());
}

#[test]
fn malformed_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "{ \"_version\": 1, \"run_as_node\": }");

    fuses()
        .arg(dir.path().join("fuses.h"))
        .arg(dir.path().join("fuses.cc"))
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config parse error"));
}

#[test]
fn read_and_write_a_binary() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, CONFIG);
    let binary = dir.path().join("app.bin");

    let mut image = b"\x7fELF padding".to_vec();
    image.extend_from_slice(SENTINEL);
    image.extend_from_slice(&[0x01, 0x03, b'1', b'0', b'1']);
    image.extend_from_slice(b" more code");
    fs::write(&binary, &image).unwrap();

    fuses()
        .arg("read")
        .arg(&binary)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("run_as_node: enabled"))
        .stdout(predicate::str::contains("cookie_encryption: disabled"));

    fuses()
        .arg("write")
        .arg(&binary)
        .arg("run_as_node=off")
        .arg("cookie_encryption=on")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let patched = fs::read(&binary).unwrap();
    assert_eq!(patched.len(), image.len());
    let start = 12 + SENTINEL.len();
    assert_eq!(&patched[start..start + 5], &[0x01, 0x03, b'0', b'1', b'1']);

    fuses()
        .arg("write")
        .arg(&binary)
        .arg("no_such_fuse=on")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown fuse"));
}

#[test]
fn output_path_named_like_a_subcommand() {
    let dir = TempDir::new().unwrap();

    fuses()
        .current_dir(dir.path())
        .arg("./read")
        .arg("./write")
        .assert()
        .success();

    assert!(fs::read_to_string(dir.path().join("read")).unwrap().contains("IsRunAsNodeEnabled();"));
    assert!(fs::read_to_string(dir.path().join("write")).unwrap().contains("kFuseWire[34]"));
}
