mod common;

use gemlevels::compiler::compile;
use gemlevels::output::{fingerprint_dir, handoff, DeployMode};

#[test]
fn copy_handoff_mirrors_the_built_tree() {
    let (tmp, config) = common::workspace();
    let report = compile(&config).expect("compile");

    let target = tmp.path().join("app/assets/puzzle_mode_levels");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("9_9.cfg"), "stale").unwrap();

    handoff(&config.output.dir, &target, DeployMode::Copy).unwrap();
    assert_eq!(fingerprint_dir(&target).unwrap(), report.fingerprint);
    assert!(!target.join("9_9.cfg").exists());
    assert!(config.output.dir.join("index.json").exists());
}

#[test]
fn move_handoff_consumes_the_built_tree() {
    let (tmp, config) = common::workspace();
    let report = compile(&config).expect("compile");

    let target = tmp.path().join("app/assets/puzzle_mode_levels");
    handoff(&config.output.dir, &target, DeployMode::Move).unwrap();
    assert_eq!(fingerprint_dir(&target).unwrap(), report.fingerprint);
    assert!(!config.output.dir.exists());

    // the next build recreates the source tree from scratch
    let again = compile(&config).expect("rebuild");
    assert_eq!(again.fingerprint, report.fingerprint);
}

#[test]
fn separate_layouts_build_independent_trees() {
    let (tmp, config) = common::workspace();
    let mut other = config.clone();
    other.output.dir = tmp.path().join("second");
    other.output.bundle_file = "bundle.json".to_string();

    compile(&config).expect("first layout");
    let report = compile(&other).expect("second layout");
    assert!(report.files.contains(&"bundle.json".to_string()));
    assert!(config.output.dir.join("react_native_levels.json").exists());
    assert!(!config.output.dir.join("bundle.json").exists());
    assert_eq!(
        common::read_json(&config.output.dir, "react_native_levels.json"),
        common::read_json(&other.output.dir, "bundle.json")
    );
}
