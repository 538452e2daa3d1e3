//! kiss-ssdv命令行测试

use std::fs;
use std::process::Command;

fn kiss_ssdv() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kiss-ssdv"))
}

#[test]
fn test_empty_capture_exits_cleanly() {
    for satellite in ["A", "B", "C"] {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.kss");
        fs::write(&input, b"").unwrap();

        let status = kiss_ssdv()
            .args(["--satellite", satellite, "--decoder", "/nonexistent/ssdv"])
            .arg(&input)
            .arg(dir.path().join("out"))
            .status()
            .unwrap();

        assert!(status.success(), "satellite {satellite}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = kiss_ssdv()
        .args(["-s", "A"])
        .arg(dir.path().join("missing.kss"))
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.kss"), "stderr: {stderr}");
}

#[test]
fn test_missing_satellite_is_usage_error() {
    let output = kiss_ssdv().args(["in.kss", "out"]).output().unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_undecodable_image_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.kss");
    // 变体C：紧凑头部VCID 1，图像7，序列号0
    fs::write(
        &input,
        [0xC0, 0x00, 0x00, 0x01, 0x00, 0x00, 0x07, 0x00, 0x00, 0xAA, 0xC0],
    )
    .unwrap();
    let report = dir.path().join("report.json");

    let status = kiss_ssdv()
        .args(["-s", "C", "--decoder", "/nonexistent/ssdv"])
        .arg("--report")
        .arg(&report)
        .arg(&input)
        .arg(dir.path().join("img"))
        .status()
        .unwrap();

    assert!(status.success());
    assert!(dir.path().join("img_7.ssdv").exists());
    assert!(!dir.path().join("img_7.jpg").exists());

    let report = fs::read_to_string(&report).unwrap();
    assert!(report.contains("failed to launch decoder"));
}

#[test]
fn test_no_decode_never_launches_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.kss");
    fs::write(
        &input,
        [0xC0, 0x00, 0x00, 0x01, 0x00, 0x00, 0x07, 0x00, 0x00, 0xAA, 0xC0],
    )
    .unwrap();
    let report = dir.path().join("report.json");

    let status = kiss_ssdv()
        .args(["-s", "C", "--no-decode", "--decoder", "/nonexistent/ssdv"])
        .arg("--report")
        .arg(&report)
        .arg(&input)
        .arg(dir.path().join("img"))
        .status()
        .unwrap();

    assert!(status.success());
    assert!(dir.path().join("img_7.ssdv").exists());
    assert!(!dir.path().join("img_7.jpg").exists());

    let report = fs::read_to_string(&report).unwrap();
    assert!(!report.contains("failed to launch decoder"));
    assert!(report.contains("\"decode_error\": null"));
}
