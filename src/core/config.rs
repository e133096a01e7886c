//! Configuration system: TOML file + env var overrides + smart defaults.
//!
//! Values are read once when a sink is constructed. Numeric knobs that come
//! from hand-edited files are parsed leniently: a malformed zone count falls
//! back to its default with a warning instead of failing the sink.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::core::errors::{Result, ResultLogError};

/// Zone count used when `MTP_ZONE` is absent or malformed.
pub const DEFAULT_ZONE_COUNT: u32 = 3;

/// Upper bound on configured zones; larger values are clamped.
pub const MAX_ZONE_COUNT: u32 = 64;

/// Full result-log configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub mtp: MtpConfig,
    pub summary: SummaryConfig,
    pub ipvs: IpvsConfig,
}

/// Per-kind output directories, kept as raw text until a sink resolves them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(skip)]
    pub config_file: PathBuf,
    pub cim_dir: String,
    pub eecp_dir: String,
    pub eecp_summary_dir: String,
    pub validation_dir: String,
    pub ipvs_cim_dir: String,
    pub ipvs_eecp_dir: String,
    pub ipvs_eecp_summary_dir: String,
}

/// Operating-mode knobs for the MTP (optical) station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MtpConfig {
    /// Raw `HVI_MODE` flag; interpreted by [`crate::sink::mode::LogMode::from_flag`].
    pub hvi_mode: String,
    /// `MTP_ZONE`: number of measured zones.
    #[serde(deserialize_with = "deserialize_zone_count")]
    pub zone: u32,
    pub create_cim: bool,
    pub create_eecp: bool,
    pub create_eecp_summary: bool,
    pub create_validation: bool,
}

/// IPVS station switches, independent of the MTP ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IpvsConfig {
    pub create_cim: bool,
    pub create_eecp: bool,
    pub create_eecp_summary: bool,
}

/// EECP-SUMMARY layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SummaryConfig {
    /// Append the TACT/JUDGMENT/ERROR_NAME/TOTAL_POINT/CUR_POINT columns.
    pub extended: bool,
}

impl Default for MtpConfig {
    fn default() -> Self {
        Self {
            hvi_mode: "F".to_string(),
            zone: DEFAULT_ZONE_COUNT,
            create_cim: true,
            create_eecp: true,
            create_eecp_summary: true,
            create_validation: true,
        }
    }
}

impl Default for IpvsConfig {
    fn default() -> Self {
        Self {
            create_cim: true,
            create_eecp: true,
            create_eecp_summary: true,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { extended: true }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                warn!("HOME not set, falling back to /tmp for result log paths");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir
            .join(".config")
            .join("result-log")
            .join("config.toml");
        let result = home_dir
            .join(".local")
            .join("share")
            .join("result-log")
            .join("Result");
        let optic = result.join("OPTIC");
        let ipvs = result.join("IPVS");
        Self {
            config_file: cfg,
            cim_dir: path_text(&optic.join("CIM")),
            eecp_dir: path_text(&optic.join("EECP")),
            eecp_summary_dir: path_text(&optic.join("EECP_Summary")),
            validation_dir: path_text(&optic.join("Validation")),
            ipvs_cim_dir: path_text(&ipvs.join("CIM")),
            ipvs_eecp_dir: path_text(&ipvs.join("EECP")),
            ipvs_eecp_summary_dir: path_text(&ipvs.join("EECP_Summary")),
        }
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf)
                .map_err(|source| ResultLogError::io(&path_buf, source))?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(ResultLogError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for diagnostics.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Render the effective config as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(env_var)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let dirs: [(&str, &mut String); 7] = [
            ("RESULT_LOG_CIM_DIR", &mut self.paths.cim_dir),
            ("RESULT_LOG_EECP_DIR", &mut self.paths.eecp_dir),
            ("RESULT_LOG_EECP_SUMMARY_DIR", &mut self.paths.eecp_summary_dir),
            ("RESULT_LOG_VALIDATION_DIR", &mut self.paths.validation_dir),
            ("RESULT_LOG_IPVS_CIM_DIR", &mut self.paths.ipvs_cim_dir),
            ("RESULT_LOG_IPVS_EECP_DIR", &mut self.paths.ipvs_eecp_dir),
            (
                "RESULT_LOG_IPVS_EECP_SUMMARY_DIR",
                &mut self.paths.ipvs_eecp_summary_dir,
            ),
        ];
        for (name, slot) in dirs {
            if let Some(raw) = lookup(name) {
                *slot = raw;
            }
        }

        if let Some(raw) = lookup("RESULT_LOG_HVI_MODE") {
            self.mtp.hvi_mode = raw;
        }
        if let Some(raw) = lookup("RESULT_LOG_MTP_ZONE") {
            self.mtp.zone = lenient_zone_count("RESULT_LOG_MTP_ZONE", &raw);
        }

        let flags: [(&str, &mut bool); 8] = [
            ("RESULT_LOG_CREATE_CIM", &mut self.mtp.create_cim),
            ("RESULT_LOG_CREATE_EECP", &mut self.mtp.create_eecp),
            (
                "RESULT_LOG_CREATE_EECP_SUMMARY",
                &mut self.mtp.create_eecp_summary,
            ),
            ("RESULT_LOG_CREATE_VALIDATION", &mut self.mtp.create_validation),
            ("RESULT_LOG_SUMMARY_EXTENDED", &mut self.summary.extended),
            ("RESULT_LOG_IPVS_CREATE_CIM", &mut self.ipvs.create_cim),
            ("RESULT_LOG_IPVS_CREATE_EECP", &mut self.ipvs.create_eecp),
            (
                "RESULT_LOG_IPVS_CREATE_EECP_SUMMARY",
                &mut self.ipvs.create_eecp_summary,
            ),
        ];
        for (name, slot) in flags {
            if let Some(raw) = lookup(name) {
                *slot = parse_env_bool(name, &raw)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_ZONE_COUNT).contains(&self.mtp.zone) {
            return Err(ResultLogError::InvalidConfig {
                details: format!(
                    "mtp.zone must be in [1,{MAX_ZONE_COUNT}], got {}",
                    self.mtp.zone
                ),
            });
        }
        Ok(())
    }
}

/// Parse a zone count, falling back to [`DEFAULT_ZONE_COUNT`] on junk.
#[must_use]
pub fn lenient_zone_count(name: &str, raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => clamp_zone_count(name, n),
        _ => {
            warn!(
                setting = name,
                value = raw,
                default = DEFAULT_ZONE_COUNT,
                "malformed zone count, using default"
            );
            DEFAULT_ZONE_COUNT
        }
    }
}

fn clamp_zone_count(name: &str, n: i64) -> u32 {
    let max = i64::from(MAX_ZONE_COUNT);
    if n > max {
        warn!(setting = name, value = n, max, "zone count clamped");
        return MAX_ZONE_COUNT;
    }
    u32::try_from(n).unwrap_or(DEFAULT_ZONE_COUNT)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawZoneCount {
    Int(i64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn deserialize_zone_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let zone = match RawZoneCount::deserialize(deserializer)? {
        RawZoneCount::Int(n) if n >= 1 => clamp_zone_count("mtp.zone", n),
        RawZoneCount::Int(n) => lenient_zone_count("mtp.zone", &n.to_string()),
        RawZoneCount::Text(raw) => lenient_zone_count("mtp.zone", &raw),
        RawZoneCount::Other(_) => lenient_zone_count("mtp.zone", "<non-numeric>"),
    };
    Ok(zone)
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "T" | "TRUE" | "1" => Ok(true),
        "F" | "FALSE" | "0" => Ok(false),
        _ => Err(ResultLogError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected T/TRUE/F/FALSE/1/0"),
        }),
    }
}
