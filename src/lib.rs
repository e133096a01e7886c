#![forbid(unsafe_code)]

//! Structured test-result recording for optical panel inspection stations.
//!
//! Four fixed-schema logs are produced per station:
//! 1. **CIM**: the latest full snapshot per zone, replaced on every write
//! 2. **EECP**: one wide CSV row per zone (Normal) or per sequence (HVI)
//! 3. **EECP_SUMMARY**: one compact CSV row per zone or sequence
//! 4. **VALIDATION**: INI-style blocks for later review
//!
//! # Library usage
//!
//! ```rust,no_run
//! use panel_result_log::prelude::*;
//!
//! # fn main() -> panel_result_log::core::errors::Result<()> {
//! let logs = ResultLogs::new(Config::load(None)?);
//! let eecp = logs.eecp()?;
//! println!("writing to {}", eecp.path().display());
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod core;
pub mod manager;
pub mod record;
pub mod schema;
pub mod sink;
