#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, ExitStatus};

use panel_result_log::core::config::Config;

/// Env override and subdirectory for every log directory.
const LOG_DIRS: [(&str, &str); 7] = [
    ("RESULT_LOG_CIM_DIR", "CIM"),
    ("RESULT_LOG_EECP_DIR", "EECP"),
    ("RESULT_LOG_EECP_SUMMARY_DIR", "EECP_Summary"),
    ("RESULT_LOG_VALIDATION_DIR", "Validation"),
    ("RESULT_LOG_IPVS_CIM_DIR", "IPVS/CIM"),
    ("RESULT_LOG_IPVS_EECP_DIR", "IPVS/EECP"),
    ("RESULT_LOG_IPVS_EECP_SUMMARY_DIR", "IPVS/EECP_Summary"),
];

/// Station settings a developer shell might leak into the binary.
const STATION_VARS: [&str; 9] = [
    "RESULT_LOG_HVI_MODE",
    "RESULT_LOG_MTP_ZONE",
    "RESULT_LOG_CREATE_CIM",
    "RESULT_LOG_CREATE_EECP",
    "RESULT_LOG_CREATE_EECP_SUMMARY",
    "RESULT_LOG_CREATE_VALIDATION",
    "RESULT_LOG_IPVS_CREATE_CIM",
    "RESULT_LOG_IPVS_CREATE_EECP",
    "RESULT_LOG_IPVS_CREATE_EECP_SUMMARY",
];

/// Config whose every log directory lives under `root`, matching [`run_cli`].
pub fn config_under(root: &Path, hvi_mode: &str) -> Config {
    let dir = |sub: &str| root.join(sub).display().to_string();
    let mut config = Config::default();
    config.paths.cim_dir = dir("CIM");
    config.paths.eecp_dir = dir("EECP");
    config.paths.eecp_summary_dir = dir("EECP_Summary");
    config.paths.validation_dir = dir("Validation");
    config.paths.ipvs_cim_dir = dir("IPVS/CIM");
    config.paths.ipvs_eecp_dir = dir("IPVS/EECP");
    config.paths.ipvs_eecp_summary_dir = dir("IPVS/EECP_Summary");
    config.mtp.hvi_mode = hvi_mode.to_string();
    config
}

pub struct CliRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliRun {
    /// Exit status plus both streams, for assertion messages.
    pub fn transcript(&self) -> String {
        format!(
            "status={}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            self.status, self.stdout, self.stderr
        )
    }
}

/// Run `result-log` with HOME and every log directory under `root`.
pub fn run_cli(root: &Path, envs: &[(&str, &str)], args: &[&str]) -> CliRun {
    let mut command = Command::new(env!("CARGO_BIN_EXE_result-log"));
    command.args(args).env("HOME", root).env_remove("RUST_LOG");
    for (var, sub) in LOG_DIRS {
        command.env(var, root.join(sub));
    }
    for var in STATION_VARS {
        command.env_remove(var);
    }
    command.envs(envs.iter().copied());

    let output = command.output().expect("execute result-log");
    CliRun {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
