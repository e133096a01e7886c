//! Value types flowing into the sinks and the formatting they share.

pub mod format;
pub mod output;
pub mod pattern;
pub mod run;

pub use output::{IpvsOutput, Output};
pub use pattern::{Pattern, PatternField, Verdict};
pub use run::{Input, JudgmentAxis, PassRecord, ZoneTestResult};
