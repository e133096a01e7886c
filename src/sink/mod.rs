//! Result-log sinks: one file (or one file per zone) per log kind.
//!
//! Every sink follows the same lifecycle:
//!
//! 1. **Construction** resolves its directory, reads the mode flag once,
//!    fixes its file name from the construction date, and writes the header
//!    if the file is new.
//! 2. **Steady state**: each write formats its complete text first, then
//!    takes the sink's own lock for the single file operation.
//!
//! Locks are per sink. No sink calls into another while holding its lock.

use std::path::Path;

use chrono::NaiveDate;

use crate::core::config::{Config, PathsConfig};
use crate::core::errors::Result;
use crate::core::paths::resolve_log_dir;
use crate::schema::columns::{Column, header_line};

pub mod cim;
pub mod eecp;
pub mod file;
pub mod ipvs;
pub mod lazy;
pub mod mode;
pub mod summary;
pub mod validation;
pub mod worker;

/// Inputs read once while a sink is being constructed.
#[derive(Debug, Clone, Copy)]
pub struct SinkContext<'a> {
    pub config: &'a Config,
    /// Date embedded in file names for the sink's whole lifetime.
    pub date: NaiveDate,
}

impl<'a> SinkContext<'a> {
    #[must_use]
    pub const fn new(config: &'a Config, date: NaiveDate) -> Self {
        Self { config, date }
    }

    /// Zone count from `MTP_ZONE`.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.config.mtp.zone as usize
    }

    /// Resolve a configured directory against the matching default.
    pub(crate) fn resolve_dir(&self, pick: fn(&PathsConfig) -> &str) -> Result<std::path::PathBuf> {
        let defaults = PathsConfig::default();
        resolve_log_dir(pick(&self.config.paths), Path::new(pick(&defaults)))
    }
}

/// Header line plus newline for a CSV schema.
pub(crate) fn csv_header(columns: &[Column]) -> String {
    let mut header = header_line(columns);
    header.push('\n');
    header
}
