//! Result-log orchestration: one owner for every sink of a station.
//!
//! `ResultLogs` is built explicitly and shared by reference or `Arc`. Each
//! sink is constructed on first use; a failed construction is reported to the
//! caller and retried on the next access.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::Config;
use crate::core::errors::{Result, ResultLogError};
use crate::record::{Input, IpvsOutput, Output, PassRecord, ZoneTestResult};
use crate::sink::SinkContext;
use crate::sink::cim::{CimSink, IpvsCimSink};
use crate::sink::eecp::{EecpSink, sequence_key};
use crate::sink::ipvs::IpvsEecpSink;
use crate::sink::lazy::LazySink;
use crate::sink::mode::LogMode;
use crate::sink::summary::EecpSummarySink;
use crate::sink::validation::ValidationSink;

// ──────────────────── inputs ────────────────────

/// Everything measured for one zone in a Normal-mode pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonePass {
    pub input: Input,
    pub result: ZoneTestResult,
    pub output: Output,
    /// Overrides the generated EECP-SUMMARY text.
    pub summary_data: Option<String>,
}

impl ZonePass {
    #[must_use]
    pub fn new(input: Input, result: ZoneTestResult, output: Output) -> Self {
        Self {
            input,
            result,
            output,
            summary_data: None,
        }
    }

    #[must_use]
    pub fn with_summary_data(mut self, summary_data: impl Into<String>) -> Self {
        self.summary_data = Some(summary_data.into());
        self
    }

    #[must_use]
    pub const fn pass_record(&self, start: NaiveDateTime, end: NaiveDateTime) -> PassRecord<'_> {
        PassRecord::new(start, end, &self.input, &self.result)
    }
}

/// One IPVS zone measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpvsZonePass {
    #[serde(default)]
    pub input: Input,
    #[serde(default)]
    pub result: ZoneTestResult,
    pub output: IpvsOutput,
    /// Overrides `Zone_{n}_Summary_Data` in the IPVS EECP-SUMMARY row.
    #[serde(default)]
    pub summary_data: Option<String>,
}

impl IpvsZonePass {
    #[must_use]
    pub const fn new(input: Input, result: ZoneTestResult, output: IpvsOutput) -> Self {
        Self {
            input,
            result,
            output,
            summary_data: None,
        }
    }

    #[must_use]
    pub const fn pass_record(&self, start: NaiveDateTime, end: NaiveDateTime) -> PassRecord<'_> {
        PassRecord::new(start, end, &self.input, &self.result)
    }
}

/// EECP-SUMMARY text for `key` when the caller supplied none.
///
/// Present axis judgments as `LABEL:VALUE` joined by `;`, otherwise
/// `{Zone|Sequence}_{key}_Summary_Data`.
#[must_use]
pub fn default_summary_data(result: &ZoneTestResult, mode: LogMode, key: u32) -> String {
    let joined = result
        .axis_judgments()
        .map(|(axis, value)| format!("{}:{value}", axis.label()))
        .collect::<Vec<_>>()
        .join(";");
    if !joined.is_empty() {
        return joined;
    }
    let prefix = match mode {
        LogMode::Normal => "Zone",
        LogMode::Hvi => "Sequence",
    };
    format!("{prefix}_{key}_Summary_Data")
}

// ──────────────────── report ────────────────────

/// Log kinds handled by [`ResultLogs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Cim,
    Eecp,
    EecpSummary,
    Validation,
    IpvsCim,
    IpvsEecp,
    IpvsEecpSummary,
}

impl LogKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cim => "CIM",
            Self::Eecp => "EECP",
            Self::EecpSummary => "EECP_SUMMARY",
            Self::Validation => "VALIDATION",
            Self::IpvsCim => "IPVS_CIM",
            Self::IpvsEecp => "IPVS_EECP",
            Self::IpvsEecpSummary => "IPVS_EECP_SUMMARY",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one kind within a run.
#[derive(Debug)]
pub struct KindOutcome {
    pub kind: LogKind,
    /// Records written before completion or failure.
    pub records: usize,
    pub error: Option<ResultLogError>,
}

impl KindOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-kind outcomes of an orchestration call. Disabled kinds are absent.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<KindOutcome>,
    /// HVI column groups filled with placeholders.
    pub skipped_groups: usize,
}

impl RunReport {
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(KindOutcome::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &KindOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }

    /// Outcome for `kind`, if it ran.
    #[must_use]
    pub fn outcome(&self, kind: LogKind) -> Option<&KindOutcome> {
        self.outcomes.iter().find(|outcome| outcome.kind == kind)
    }

    /// The report itself, or the first failure.
    pub fn into_result(mut self) -> Result<Self> {
        let first_error = self
            .outcomes
            .iter_mut()
            .find_map(|outcome| outcome.error.take());
        match first_error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    fn run<F>(&mut self, kind: LogKind, enabled: bool, write: F)
    where
        F: FnOnce(&mut usize) -> Result<()>,
    {
        if !enabled {
            return;
        }
        let mut records = 0;
        let error = write(&mut records).err();
        match &error {
            Some(err) => warn!(
                kind = kind.label(),
                records,
                code = err.code(),
                error = %err,
                "result log kind failed"
            ),
            None => info!(kind = kind.label(), records, "result log kind written"),
        }
        self.outcomes.push(KindOutcome {
            kind,
            records,
            error,
        });
    }
}

// ──────────────────── manager ────────────────────

/// Owner of every result-log sink for one station.
#[derive(Debug)]
pub struct ResultLogs {
    config: Config,
    date: NaiveDate,
    mode: LogMode,
    cim: LazySink<CimSink>,
    eecp: LazySink<EecpSink>,
    eecp_summary: LazySink<EecpSummarySink>,
    validation: LazySink<ValidationSink>,
    ipvs_cim: LazySink<IpvsCimSink>,
    ipvs_eecp: LazySink<IpvsEecpSink>,
    ipvs_eecp_summary: LazySink<EecpSummarySink>,
}

impl ResultLogs {
    /// File names use today's local date.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_date(config, Local::now().date_naive())
    }

    #[must_use]
    pub fn with_date(config: Config, date: NaiveDate) -> Self {
        let mode = LogMode::from_config(&config.mtp);
        Self {
            config,
            date,
            mode,
            cim: LazySink::new(),
            eecp: LazySink::new(),
            eecp_summary: LazySink::new(),
            validation: LazySink::new(),
            ipvs_cim: LazySink::new(),
            ipvs_eecp: LazySink::new(),
            ipvs_eecp_summary: LazySink::new(),
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn mode(&self) -> LogMode {
        self.mode
    }

    fn context(&self) -> SinkContext<'_> {
        SinkContext::new(&self.config, self.date)
    }

    pub fn cim(&self) -> Result<&CimSink> {
        self.cim.get_or_try_init(|| CimSink::open(&self.context()))
    }

    pub fn eecp(&self) -> Result<&EecpSink> {
        self.eecp.get_or_try_init(|| EecpSink::open(&self.context()))
    }

    pub fn eecp_summary(&self) -> Result<&EecpSummarySink> {
        self.eecp_summary
            .get_or_try_init(|| EecpSummarySink::open(&self.context()))
    }

    pub fn validation(&self) -> Result<&ValidationSink> {
        self.validation
            .get_or_try_init(|| ValidationSink::open(&self.context()))
    }

    pub fn ipvs_cim(&self) -> Result<&IpvsCimSink> {
        self.ipvs_cim
            .get_or_try_init(|| IpvsCimSink::open(&self.context()))
    }

    pub fn ipvs_eecp(&self) -> Result<&IpvsEecpSink> {
        self.ipvs_eecp
            .get_or_try_init(|| IpvsEecpSink::open(&self.context()))
    }

    pub fn ipvs_eecp_summary(&self) -> Result<&EecpSummarySink> {
        self.ipvs_eecp_summary
            .get_or_try_init(|| EecpSummarySink::open_ipvs(&self.context()))
    }

    /// Replace the zone's CIM snapshot when `mtp.create_cim` is set.
    ///
    /// Returns whether a snapshot was written.
    pub fn create_cim_for_zone(
        &self,
        pass: &PassRecord<'_>,
        zone: u32,
        sequence: Option<u32>,
        output: &Output,
    ) -> Result<bool> {
        if !self.config.mtp.create_cim {
            return Ok(false);
        }
        let path = self.cim()?.write_record(pass, zone, sequence, output)?;
        info!(zone, path = %path.display(), "CIM snapshot written");
        Ok(true)
    }

    /// Normal-mode pass: EECP, EECP-SUMMARY and VALIDATION records for every
    /// zone, in ascending zone order.
    ///
    /// Each kind runs independently; a failure stops only that kind and is
    /// recorded in the report. Errors with [`ResultLogError::ModeMismatch`]
    /// when the station is configured for HVI.
    pub fn create_all_result_logs(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        zones: &BTreeMap<u32, ZonePass>,
    ) -> Result<RunReport> {
        self.expect_mode(LogMode::Normal, "create_all_result_logs")?;
        info!(zones = zones.len(), "creating result logs");
        let mtp = &self.config.mtp;
        let mut report = RunReport::default();

        report.run(LogKind::Eecp, mtp.create_eecp, |records| {
            let sink = self.eecp()?;
            for (zone, data) in zones {
                sink.write_record(&data.pass_record(start, end), *zone, &data.output)?;
                *records += 1;
            }
            Ok(())
        });

        report.run(LogKind::EecpSummary, mtp.create_eecp_summary, |records| {
            let sink = self.eecp_summary()?;
            for (zone, data) in zones {
                let text = data.summary_data.as_deref().map_or_else(
                    || Cow::Owned(default_summary_data(&data.result, self.mode, *zone)),
                    Cow::Borrowed,
                );
                sink.write_record(&data.pass_record(start, end), *zone, &text)?;
                *records += 1;
            }
            Ok(())
        });

        report.run(LogKind::Validation, mtp.create_validation, |records| {
            let sink = self.validation()?;
            for (zone, data) in zones {
                sink.write_record(&data.pass_record(start, end), *zone, Some(&data.output))?;
                *records += 1;
            }
            Ok(())
        });

        Ok(report)
    }

    /// HVI pass: one EECP row, one EECP-SUMMARY row and one VALIDATION block
    /// per sequence. `outputs` is zone-major.
    pub fn create_hvi_result_logs(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        input: &Input,
        result: &ZoneTestResult,
        outputs: &[Output],
        sequence_count: usize,
    ) -> Result<RunReport> {
        self.expect_mode(LogMode::Hvi, "create_hvi_result_logs")?;
        info!(
            sequences = sequence_count,
            snapshots = outputs.len(),
            "creating HVI result logs"
        );
        let mtp = &self.config.mtp;
        let pass = PassRecord::new(start, end, input, result);
        let mut report = RunReport::default();
        let mut skipped = 0;

        report.run(LogKind::Eecp, mtp.create_eecp, |records| {
            let batch = self.eecp()?.write_batch(&pass, outputs, sequence_count)?;
            *records = batch.rows;
            skipped = batch.skipped;
            Ok(())
        });
        report.skipped_groups = skipped;

        report.run(LogKind::EecpSummary, mtp.create_eecp_summary, |records| {
            let sink = self.eecp_summary()?;
            for sequence in 0..sequence_count {
                let key = sequence_key(sequence);
                let text = default_summary_data(result, self.mode, key);
                sink.write_record(&pass, key, &text)?;
                *records += 1;
            }
            Ok(())
        });

        report.run(LogKind::Validation, mtp.create_validation, |records| {
            let sink = self.validation()?;
            for sequence in 0..sequence_count {
                sink.write_record(&pass, sequence_key(sequence), None)?;
                *records += 1;
            }
            Ok(())
        });

        Ok(report)
    }

    /// Append an IPVS CIM entry for `zone` when `ipvs.create_cim` is set.
    ///
    /// `cim_data` defaults to `Zone_{n}_CIM_Data`. Returns whether an entry
    /// was written.
    pub fn create_ipvs_cim_for_zone(
        &self,
        pass: &PassRecord<'_>,
        zone: u32,
        cim_data: Option<&str>,
    ) -> Result<bool> {
        if !self.config.ipvs.create_cim {
            return Ok(false);
        }
        let text = cim_data.map_or_else(|| Cow::Owned(format!("Zone_{zone}_CIM_Data")), Cow::Borrowed);
        self.ipvs_cim()?.write_record(pass, zone, &text)?;
        info!(zone, "IPVS CIM entry written");
        Ok(true)
    }

    /// IPVS pass: IPVS EECP and IPVS EECP-SUMMARY rows for every zone, in
    /// ascending zone order, each gated by its `[ipvs]` switch.
    ///
    /// IPVS has no HVI variant, so this runs in either station mode.
    pub fn create_ipvs_result_logs(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        zones: &BTreeMap<u32, IpvsZonePass>,
    ) -> RunReport {
        info!(zones = zones.len(), "creating IPVS result logs");
        let ipvs = &self.config.ipvs;
        let mut report = RunReport::default();

        report.run(LogKind::IpvsEecp, ipvs.create_eecp, |records| {
            let sink = self.ipvs_eecp()?;
            for (zone, data) in zones {
                sink.write_record(&data.pass_record(start, end), *zone, &data.output)?;
                *records += 1;
            }
            Ok(())
        });

        report.run(LogKind::IpvsEecpSummary, ipvs.create_eecp_summary, |records| {
            let sink = self.ipvs_eecp_summary()?;
            for (zone, data) in zones {
                let text = data.summary_data.as_deref().map_or_else(
                    || Cow::Owned(format!("Zone_{zone}_Summary_Data")),
                    Cow::Borrowed,
                );
                sink.write_record(&data.pass_record(start, end), *zone, &text)?;
                *records += 1;
            }
            Ok(())
        });

        report
    }

    fn expect_mode(&self, wanted: LogMode, operation: &'static str) -> Result<()> {
        if self.mode == wanted {
            Ok(())
        } else {
            Err(ResultLogError::ModeMismatch {
                sink: "ResultLogs",
                mode: self.mode.label(),
                operation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::JudgmentAxis;
    use std::fs;
    use std::path::Path;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 2).unwrap()
    }

    fn at(s: u32) -> NaiveDateTime {
        date().and_hms_opt(11, 0, s).unwrap()
    }

    fn config(root: &Path, hvi: &str) -> Config {
        let mut cfg = Config::default();
        cfg.paths.cim_dir = root.join("CIM").display().to_string();
        cfg.paths.eecp_dir = root.join("EECP").display().to_string();
        cfg.paths.eecp_summary_dir = root.join("EECP_Summary").display().to_string();
        cfg.paths.validation_dir = root.join("Validation").display().to_string();
        cfg.paths.ipvs_cim_dir = root.join("IPVS/CIM").display().to_string();
        cfg.paths.ipvs_eecp_dir = root.join("IPVS/EECP").display().to_string();
        cfg.paths.ipvs_eecp_summary_dir = root.join("IPVS/EECP_Summary").display().to_string();
        cfg.mtp.hvi_mode = hvi.to_string();
        cfg
    }

    fn zones(count: u32) -> BTreeMap<u32, ZonePass> {
        (1..=count)
            .map(|zone| {
                let input = Input::new(format!("CELL{zone}"), "INNER", 7, 7);
                let result = ZoneTestResult::new("NONE", "OK", &at(0), &at(5));
                (zone, ZonePass::new(input, result, Output::empty()))
            })
            .collect()
    }

    #[test]
    fn default_summary_prefers_axis_judgments() {
        let plain = ZoneTestResult::default();
        assert_eq!(
            default_summary_data(&plain, LogMode::Normal, 2),
            "Zone_2_Summary_Data"
        );
        assert_eq!(
            default_summary_data(&plain, LogMode::Hvi, 3),
            "Sequence_3_Summary_Data"
        );
        let judged = plain
            .with_axis(JudgmentAxis::Color, "OK")
            .with_axis(JudgmentAxis::Efficiency, "NG");
        assert_eq!(
            default_summary_data(&judged, LogMode::Normal, 1),
            "COLOR:OK;EFFICIENCY:NG"
        );
    }

    #[test]
    fn sinks_are_built_lazily() {
        let tmp = tempfile::tempdir().unwrap();
        let logs = ResultLogs::with_date(config(tmp.path(), "F"), date());
        assert!(!tmp.path().join("EECP").exists());
        let first = logs.eecp().unwrap() as *const EecpSink;
        let second = logs.eecp().unwrap() as *const EecpSink;
        assert_eq!(first, second);
        assert!(tmp.path().join("EECP/EECP_20251002.csv").is_file());
        assert!(!tmp.path().join("CIM").exists());
    }

    #[test]
    fn all_result_logs_in_zone_order() {
        let tmp = tempfile::tempdir().unwrap();
        let logs = ResultLogs::with_date(config(tmp.path(), "F"), date());
        let mut data = zones(3);
        data.get_mut(&2).unwrap().summary_data = Some("custom".to_string());

        let report = logs.create_all_result_logs(at(0), at(5), &data).unwrap();
        assert!(report.all_ok());
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcome(LogKind::Eecp).unwrap().records, 3);

        let summary = fs::read_to_string(tmp.path().join("EECP_Summary/EECP_SUMMARY_20251002.csv"))
            .unwrap();
        let keys: Vec<&str> = summary
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(5).unwrap())
            .collect();
        assert_eq!(keys, ["Zone_1_Summary_Data", "custom", "Zone_3_Summary_Data"]);

        let validation =
            fs::read_to_string(tmp.path().join("Validation/VALIDATION_20251002.ini")).unwrap();
        assert_eq!(validation.matches("\nZONE=").count(), 3);
    }

    #[test]
    fn disabled_kinds_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path(), "F");
        cfg.mtp.create_eecp_summary = false;
        cfg.mtp.create_validation = false;
        cfg.mtp.create_cim = false;
        let logs = ResultLogs::with_date(cfg, date());

        let report = logs.create_all_result_logs(at(0), at(1), &zones(1)).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcome(LogKind::EecpSummary).is_none());
        assert!(!tmp.path().join("EECP_Summary").exists());

        let data = zones(1);
        let zone = &data[&1];
        let written = logs
            .create_cim_for_zone(&zone.pass_record(at(0), at(1)), 1, None, &zone.output)
            .unwrap();
        assert!(!written);
    }

    #[test]
    fn one_failing_kind_does_not_stop_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let mut cfg = config(tmp.path(), "F");
        cfg.paths.eecp_dir = blocker.join("EECP").display().to_string();
        let logs = ResultLogs::with_date(cfg, date());

        let report = logs.create_all_result_logs(at(0), at(1), &zones(2)).unwrap();
        assert!(!report.all_ok());
        let failed: Vec<LogKind> = report.failures().map(|outcome| outcome.kind).collect();
        assert_eq!(failed, [LogKind::Eecp]);
        assert_eq!(report.outcome(LogKind::EecpSummary).unwrap().records, 2);
        assert_eq!(report.outcome(LogKind::Validation).unwrap().records, 2);
        assert_eq!(report.into_result().unwrap_err().code(), "RLOG-3001");
    }

    #[test]
    fn orchestration_checks_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let normal = ResultLogs::with_date(config(tmp.path(), "F"), date());
        let err = normal
            .create_hvi_result_logs(at(0), at(1), &Input::default(), &ZoneTestResult::default(), &[], 1)
            .unwrap_err();
        assert_eq!(err.code(), "RLOG-2001");

        let hvi = ResultLogs::with_date(config(tmp.path(), "T"), date());
        let err = hvi
            .create_all_result_logs(at(0), at(1), &zones(1))
            .unwrap_err();
        assert_eq!(err.code(), "RLOG-2001");
    }

    #[test]
    fn hvi_run_writes_one_row_per_sequence() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path(), "T");
        cfg.mtp.zone = 2;
        let logs = ResultLogs::with_date(cfg, date());
        let outputs = vec![Output::empty(); 6];
        let input = Input::new("H", "I", 7, 7);
        let result = ZoneTestResult::new("NONE", "OK", &at(0), &at(3));

        let report = logs
            .create_hvi_result_logs(at(0), at(3), &input, &result, &outputs, 3)
            .unwrap();
        assert!(report.all_ok());
        assert_eq!(report.skipped_groups, 0);
        assert_eq!(report.outcome(LogKind::Eecp).unwrap().records, 3);
        assert_eq!(report.outcome(LogKind::EecpSummary).unwrap().records, 3);

        let eecp = fs::read_to_string(tmp.path().join("EECP/EECP_20251002_HVI.csv")).unwrap();
        assert_eq!(eecp.lines().count(), 4);
        let validation =
            fs::read_to_string(tmp.path().join("Validation/VALIDATION_20251002_HVI.ini")).unwrap();
        assert_eq!(validation.matches("\nSEQUENCE=").count(), 3);
    }

    fn ipvs_zones(count: u32) -> BTreeMap<u32, IpvsZonePass> {
        (1..=count)
            .map(|zone| {
                let input = Input::new(format!("IP{zone}"), "IN", 7, 7);
                let pass = IpvsZonePass::new(
                    input,
                    ZoneTestResult::default(),
                    IpvsOutput::from_patterns(Vec::new()),
                );
                (zone, pass)
            })
            .collect()
    }

    #[test]
    fn ipvs_eecp_and_summary_rows_per_zone() {
        let tmp = tempfile::tempdir().unwrap();
        let logs = ResultLogs::with_date(config(tmp.path(), "T"), date());
        let mut zones = ipvs_zones(2);
        zones.get_mut(&2).unwrap().summary_data = Some("custom".to_string());

        let report = logs.create_ipvs_result_logs(at(0), at(1), &zones);
        assert!(report.all_ok());
        assert_eq!(report.outcome(LogKind::IpvsEecp).unwrap().records, 2);
        assert_eq!(report.outcome(LogKind::IpvsEecpSummary).unwrap().records, 2);

        let eecp = fs::read_to_string(tmp.path().join("IPVS/EECP/EECP_20251002.csv")).unwrap();
        assert_eq!(eecp.lines().count(), 3);
        let summary =
            fs::read_to_string(tmp.path().join("IPVS/EECP_Summary/EECP_SUMMARY_20251002.csv"))
                .unwrap();
        let data: Vec<&str> = summary
            .lines()
            .skip(1)
            .map(|line| line.rsplit(',').next().unwrap())
            .collect();
        assert_eq!(data, ["Zone_1_Summary_Data", "custom"]);
        assert!(!tmp.path().join("EECP").exists());
    }

    #[test]
    fn ipvs_switches_do_not_follow_mtp_switches() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path(), "F");
        cfg.mtp.create_eecp = false;
        cfg.mtp.create_eecp_summary = false;
        cfg.mtp.create_cim = false;
        cfg.ipvs.create_eecp = false;
        let logs = ResultLogs::with_date(cfg, date());
        let stations = ipvs_zones(1);

        let report = logs.create_ipvs_result_logs(at(0), at(1), &stations);
        assert!(report.outcome(LogKind::IpvsEecp).is_none());
        assert_eq!(report.outcome(LogKind::IpvsEecpSummary).unwrap().records, 1);
        assert!(!tmp.path().join("IPVS/EECP").exists());

        let pass = stations[&1].pass_record(at(0), at(1));
        assert!(logs.create_ipvs_cim_for_zone(&pass, 1, None).unwrap());
        let cim = fs::read_to_string(tmp.path().join("IPVS/CIM/CIM_20251002.dat")).unwrap();
        assert!(cim.contains("CIM_DATA: Zone_1_CIM_Data\n"));
        assert!(!tmp.path().join("CIM").exists());

        let data = zones(1);
        let zone = &data[&1];
        let mtp_cim = logs
            .create_cim_for_zone(&zone.pass_record(at(0), at(1)), 1, None, &zone.output)
            .unwrap();
        assert!(!mtp_cim);
    }

    #[test]
    fn ipvs_cim_switch_off_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path(), "F");
        cfg.ipvs.create_cim = false;
        let logs = ResultLogs::with_date(cfg, date());
        let stations = ipvs_zones(1);
        let pass = stations[&1].pass_record(at(0), at(1));
        assert!(!logs.create_ipvs_cim_for_zone(&pass, 1, Some("snap")).unwrap());
        assert!(!tmp.path().join("IPVS/CIM").exists());

        let data = zones(1);
        let zone = &data[&1];
        assert!(
            logs.create_cim_for_zone(&zone.pass_record(at(0), at(1)), 1, None, &zone.output)
                .unwrap()
        );
    }
}
