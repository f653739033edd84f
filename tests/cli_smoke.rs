use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_scrollytell")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "scrollytell.exe"
            } else {
                "scrollytell"
            });
            p
        })
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(exe())
        .args([
            "frame", "--at", "0.47", "--width", "96", "--height", "54", "--frames", "10",
            "--out",
        ])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (96, 54));
}

#[test]
fn cli_eval_prints_render_state() {
    let out = std::process::Command::new(exe())
        .args(["eval", "--at", "0.93"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["activeScene"], "reboot");
    assert_eq!(v["showTerminal"], true);
    assert_eq!(v["scroll"]["activeIndex"], 7);
    assert_eq!(v["scroll"]["progressPercent"], 93);
}

#[test]
fn cli_rejects_out_of_range_fraction() {
    let status = std::process::Command::new(exe())
        .args(["eval", "--at", "1.5"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_validate_rejects_gapped_story() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let story_path = dir.join("gapped.json");
    std::fs::write(
        &story_path,
        r#"{"segments":[
            {"index":0,"sceneTag":"landing","scrollStart":0.0,"scrollEnd":0.4,
             "title":"a","subtitle":"","bodyText":""},
            {"index":1,"sceneTag":"reboot","scrollStart":0.5,"scrollEnd":1.0,
             "title":"b","subtitle":"","bodyText":""}
        ]}"#,
    )
    .unwrap();

    let out = std::process::Command::new(exe())
        .args(["validate", "--story"])
        .arg(story_path.to_string_lossy().as_ref())
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("gap"));
}

#[test]
fn cli_sweep_prints_one_row_per_step() {
    let out = std::process::Command::new(exe())
        .args(["sweep", "--steps", "10"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    // Header plus steps + 1 rows.
    assert_eq!(stdout.lines().count(), 12);
    assert!(stdout.lines().nth(1).unwrap().starts_with("0.0000\t0\t0"));
    assert!(stdout.lines().last().unwrap().starts_with("1.0000\t7\t7"));
}
