#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

const SETTING_VARS: [&str; 6] = [
    "EMBED_DRIVER_CONFIG",
    "EMBED_DRIVER_MODE",
    "EMBED_DRIVER_MODEL_TYPE",
    "EMBED_DRIVER_OTHER_SUBSETS",
    "EMBED_DRIVER_DATA_ROOT",
    "EMBED_DRIVER_PROCESSOR",
];

/// The CLI binary with any settings inherited from the environment removed.
pub fn driver() -> Command {
    let mut cmd = Command::cargo_bin("embed-driver").unwrap();
    for var in SETTING_VARS {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("driver.yaml");
    fs::write(&path, contents).expect("write config file");
    path
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("utf-8 stdout")
}
