//! Normal vs HVI schema selection.

use tracing::warn;

use crate::core::config::MtpConfig;
use crate::schema::columns::{EecpLayout, KeyKind};

/// Operating mode, fixed per sink at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// One row per zone.
    #[default]
    Normal,
    /// One row per sequence with zone-expanded columns.
    Hvi,
}

impl LogMode {
    /// Interpret an `HVI_MODE` flag. `T`/`TRUE` (any case) select HVI;
    /// anything else, including garbage, selects Normal.
    #[must_use]
    pub fn from_flag(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "T" | "TRUE" => Self::Hvi,
            "" | "F" | "FALSE" => Self::Normal,
            other => {
                warn!(value = other, "unrecognised HVI_MODE flag, using Normal");
                Self::Normal
            }
        }
    }

    #[must_use]
    pub fn from_config(mtp: &MtpConfig) -> Self {
        Self::from_flag(&mtp.hvi_mode)
    }

    #[must_use]
    pub const fn is_hvi(self) -> bool {
        matches!(self, Self::Hvi)
    }

    /// Suffix inserted before the file extension.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Hvi => "_HVI",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hvi => "HVI",
        }
    }

    #[must_use]
    pub const fn key_kind(self) -> KeyKind {
        match self {
            Self::Normal => KeyKind::Zone,
            Self::Hvi => KeyKind::Sequence,
        }
    }

    #[must_use]
    pub const fn eecp_layout(self, zone_count: usize) -> EecpLayout {
        match self {
            Self::Normal => EecpLayout::Normal,
            Self::Hvi => EecpLayout::Hvi { zone_count },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_flags_select_hvi() {
        for raw in ["T", "t", "TRUE", "true", " True "] {
            assert_eq!(LogMode::from_flag(raw), LogMode::Hvi, "flag {raw:?}");
        }
    }

    #[test]
    fn missing_or_invalid_flags_select_normal() {
        for raw in ["", "F", "false", "yes", "1", "HVI"] {
            assert_eq!(LogMode::from_flag(raw), LogMode::Normal, "flag {raw:?}");
        }
    }

    #[test]
    fn default_config_is_normal() {
        assert_eq!(LogMode::from_config(&MtpConfig::default()), LogMode::Normal);
    }

    #[test]
    fn mode_drives_key_and_suffix() {
        assert_eq!(LogMode::Hvi.file_suffix(), "_HVI");
        assert_eq!(LogMode::Normal.file_suffix(), "");
        assert_eq!(LogMode::Hvi.key_kind(), KeyKind::Sequence);
        assert_eq!(
            LogMode::Hvi.eecp_layout(4),
            EecpLayout::Hvi { zone_count: 4 }
        );
    }
}
