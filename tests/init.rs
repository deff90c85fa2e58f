use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ownercheck"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "ownercheck init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".ownercheck.toml");
    assert!(config_path.exists(), ".ownercheck.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[codeowners]"));
    assert!(content.contains("[git]"));

    // Every option is commented out, so the template parses to the defaults.
    let config = ownercheck_core::OwnerCheckConfig::from_toml(&content).unwrap();
    assert_eq!(config.codeowners.catch_all, "*");
    let _raw: toml::Value = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".ownercheck.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ownercheck"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(
        std::fs::read_to_string(dir.path().join(".ownercheck.toml")).unwrap(),
        "# existing"
    );
}
