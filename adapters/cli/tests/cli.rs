use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn track_design(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_track-design"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to invoke the track-design binary")
}

fn stdout_of(args: &[&str]) -> String {
    let output = track_design(args);
    assert!(
        output.status.success(),
        "track-design {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

fn sample_loop() -> String {
    stdout_of(&["capture-sample", "loop", "--tree"]).trim().to_owned()
}

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "track-design"])
        .status()
        .expect("failed to invoke cargo check for the track-design binary");

    assert!(status.success(), "cargo check --bin track-design should succeed");
}

#[test]
fn captured_sample_can_be_inspected() {
    let design = sample_loop();
    assert!(design.starts_with("design:v1:ride:"), "{design}");

    let summary = stdout_of(&["inspect", &design]);
    assert!(summary.contains("ride type: SteelCoaster"), "{summary}");
    assert!(summary.contains("track elements: 4"), "{summary}");
    assert!(summary.contains("entrances and exits: 2"), "{summary}");
    assert!(summary.contains("scenery elements: 1"), "{summary}");
    assert!(summary.contains("space required: 2x2"), "{summary}");
}

#[test]
fn mirrored_sample_stays_a_ride_and_mirrors_back() {
    let design = sample_loop();
    let mirrored = stdout_of(&["mirror", &design]).trim().to_owned();
    assert!(mirrored.starts_with("design:v1:ride:"));
    assert_ne!(mirrored, design);
    let restored = stdout_of(&["mirror", &mirrored]).trim().to_owned();
    assert_eq!(restored, design);
}

#[test]
fn maze_sample_can_be_built() {
    let design = stdout_of(&["capture-sample", "maze"]).trim().to_owned();
    assert!(design.starts_with("design:v1:maze:"));

    let report = stdout_of(&["place", &design, "--x", "20", "--y", "20", "--rotation", "2"]);
    assert!(report.contains("entrance and exit placed: true"), "{report}");
}

#[test]
fn ghost_placement_is_removed_again() {
    let design = sample_loop();
    let report = stdout_of(&["place", &design, "--mode", "ghost"]);
    assert!(report.contains("ghost elements after removal: 0"), "{report}");
}

#[test]
fn preview_writes_four_images() {
    let design = sample_loop();
    let output: PathBuf = std::env::temp_dir().join(format!("track-design-preview-{}", std::process::id()));
    let report = stdout_of(&["preview", &design, "--output", output.to_str().expect("utf-8 path")]);
    assert!(report.contains("map size after preview: 64"), "{report}");

    for rotation in 0..4 {
        let image = fs::read(output.join(format!("preview_{rotation}.ppm"))).expect("image written");
        assert!(image.starts_with(b"P6\n370 217\n255\n"));
    }
    let _ = fs::remove_dir_all(&output);
}

#[test]
fn malformed_designs_are_reported() {
    let output = track_design(&["inspect", "design:v1:ride"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing the payload"), "{stderr}");
}
