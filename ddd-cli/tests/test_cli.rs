use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};

fn ddd_tool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ddd-tool"))
        .args(args)
        .output()
        .expect("running ddd-tool")
}

fn record_array(record_type: u8, records: &[&[u8]]) -> Vec<u8> {
    let mut out = vec![record_type];
    out.extend_from_slice(&(records[0].len() as u16).to_be_bytes());
    out.extend_from_slice(&(records.len() as u16).to_be_bytes());
    for record in records {
        out.extend_from_slice(record);
    }
    out
}

/// Interface version followed by a generation 2 overview.
fn vu_download() -> Vec<u8> {
    let mut data = vec![0x76, 0x00, 0x02, 0x02, 0x76, 0x21];
    data.extend(record_array(0x0A, &[b"WDB9634031L123456"]));
    data.extend(record_array(0x03, &[&[0x5E, 0x0D, 0x32, 0x80]]));
    data.extend(record_array(0x08, &[&[0x5A; 64]]));
    data
}

fn write_fixture(dir: &Path, name: &str, data: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_info_reports_vehicle_unit() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "vu.ddd", &vu_download());

    let out = ddd_tool(&["info", &path]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("vehicle unit"));
    assert!(stdout.contains("OverviewGen2"));
    assert!(stdout.contains("SHA-256:"));
}

#[test]
fn test_dump_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "vu.ddd", &vu_download());
    let json_path = dir.path().join("vu.json");

    let out = ddd_tool(&["dump", &path, "-o", &json_path.to_string_lossy()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(&json_path).unwrap();
    let file: tacho_ir::StructuredFile = serde_json::from_str(&text).unwrap();
    assert_eq!(tacho_ir::marshal_file(&file).unwrap(), vu_download());
}

#[test]
fn test_dump_yaml_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "vu.ddd", &vu_download());

    let out = ddd_tool(&["dump", &path, "--format", "yaml"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("VehicleUnit"));
}

#[test]
fn test_check_passes_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_fixture(dir.path(), "good.ddd", &vu_download());
    let unknown = write_fixture(dir.path(), "unknown.ddd", &[0x42, 0x00, 0x01]);

    let out = ddd_tool(&["check", &good]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("good.ddd: ok"));

    let out = ddd_tool(&["check", "--quiet", &good, &unknown]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown.ddd: FAIL"));
    assert!(stderr.contains("1 of 2 files did not round-trip"));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_fail_policy_rejects_trailing_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = vu_download();
    data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    let path = write_fixture(dir.path(), "garbage.ddd", &data);

    let preserved = ddd_tool(&["check", &path]);
    assert!(preserved.status.success());

    let strict = ddd_tool(&["check", "--unknown-tag", "fail", &path]);
    assert!(!strict.status.success());
}
