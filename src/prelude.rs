//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use panel_result_log::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, ResultLogError};

// Records
pub use crate::record::{
    Input, IpvsOutput, JudgmentAxis, Output, PassRecord, Pattern, PatternField, Verdict,
    ZoneTestResult,
};

// Schema
pub use crate::schema::columns::{Column, EecpLayout, KeyKind};

// Sinks
pub use crate::sink::cim::{CimSink, IpvsCimSink};
pub use crate::sink::eecp::{BatchReport, EecpSink};
pub use crate::sink::ipvs::IpvsEecpSink;
pub use crate::sink::mode::LogMode;
pub use crate::sink::summary::EecpSummarySink;
pub use crate::sink::validation::ValidationSink;
pub use crate::sink::worker::{ResultJob, ResultWriterHandle, spawn_result_writer};

// Orchestration
pub use crate::manager::{IpvsZonePass, KindOutcome, LogKind, ResultLogs, RunReport, ZonePass};
