//! VALIDATION sink: INI-style blocks appended to `VALIDATION_{yyyyMMdd}[_HVI].ini`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use tracing::debug;

use crate::core::errors::Result;
use crate::record::format::{SECTION_TIME_FORMAT, format_measure, format_timestamp, single_line};
use crate::record::{Output, PassRecord};
use crate::schema::catalog::PATTERN_NAMES;
use crate::sink::SinkContext;
use crate::sink::file::{append_text, dated_file_name};
use crate::sink::mode::LogMode;

#[derive(Debug)]
pub struct ValidationSink {
    path: PathBuf,
    mode: LogMode,
    lock: Mutex<()>,
}

impl ValidationSink {
    pub const KIND: &'static str = "VALIDATION";

    /// INI files have no header; only the directory is prepared here.
    pub fn open(ctx: &SinkContext<'_>) -> Result<Self> {
        let mode = LogMode::from_config(&ctx.config.mtp);
        let dir = ctx.resolve_dir(|paths| paths.validation_dir.as_str())?;
        let path = dir.join(dated_file_name(Self::KIND, ctx.date, mode, "ini"));
        debug!(path = %path.display(), mode = mode.label(), "validation sink ready");

        Ok(Self {
            path,
            mode,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn mode(&self) -> LogMode {
        self.mode
    }

    /// Append one record block for `key` (zone or sequence number).
    ///
    /// With a snapshot, the base-angle luminance and verdict of every
    /// pattern are included.
    pub fn write_record(&self, pass: &PassRecord<'_>, key: u32, output: Option<&Output>) -> Result<()> {
        self.write_record_at(now(), pass, key, output)
    }

    pub(crate) fn write_record_at(
        &self,
        written_at: NaiveDateTime,
        pass: &PassRecord<'_>,
        key: u32,
        output: Option<&Output>,
    ) -> Result<()> {
        let block = record_block(written_at, self.mode, pass, key, output);
        let _guard = self.lock.lock();
        append_text(&self.path, &block)
    }

    /// Append a named section of caller-supplied `key=value` pairs.
    pub fn write_section<K, V>(
        &self,
        section: &str,
        cell_id: &str,
        inner_id: &str,
        entries: &[(K, V)],
    ) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.write_section_at(now(), section, cell_id, inner_id, entries)
    }

    pub(crate) fn write_section_at<K, V>(
        &self,
        written_at: NaiveDateTime,
        section: &str,
        cell_id: &str,
        inner_id: &str,
        entries: &[(K, V)],
    ) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut block = String::new();
        let _ = writeln!(
            block,
            "[{}_{}]",
            single_line(section),
            written_at.format("%Y%m%d_%H%M%S")
        );
        push_entry(&mut block, "CELL_ID", cell_id);
        push_entry(&mut block, "INNER_ID", inner_id);
        push_entry(&mut block, "TIMESTAMP", &format_timestamp(&written_at));
        for (key, value) in entries {
            push_entry(&mut block, key.as_ref(), value.as_ref());
        }
        block.push('\n');

        let _guard = self.lock.lock();
        append_text(&self.path, &block)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn push_entry(block: &mut String, key: &str, value: &str) {
    let _ = writeln!(block, "{}={}", single_line(key), single_line(value));
}

fn record_block(
    written_at: NaiveDateTime,
    mode: LogMode,
    pass: &PassRecord<'_>,
    key: u32,
    output: Option<&Output>,
) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "[{}]", written_at.format(SECTION_TIME_FORMAT));
    push_entry(&mut block, "START_TIME", &format_timestamp(&pass.start));
    push_entry(&mut block, "END_TIME", &format_timestamp(&pass.end));
    push_entry(&mut block, "TACT", &format_measure(pass.tact()));
    push_entry(&mut block, "CELL_ID", pass.cell_id());
    push_entry(&mut block, "INNER_ID", pass.inner_id());
    push_entry(&mut block, mode.key_kind().label(), &key.to_string());
    push_entry(&mut block, "TOTAL_POINT", &pass.input.total_point.to_string());
    push_entry(&mut block, "CUR_POINT", &pass.input.cur_point.to_string());
    push_entry(&mut block, "ERROR_NAME", &pass.result.error_name);
    push_entry(&mut block, "JUDGMENT", &pass.result.judgment);
    for (axis, value) in pass.result.axis_judgments() {
        push_entry(&mut block, axis.key(), value);
    }
    if let Some(output) = output {
        for (pattern, name) in PATTERN_NAMES.iter().enumerate() {
            let cell = output.cell(0, pattern);
            push_entry(&mut block, &format!("{name}_L"), &format_measure(cell.l));
            push_entry(&mut block, &format!("{name}_RESULT"), cell.verdict().token());
        }
    }
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::record::{Input, JudgmentAxis, Pattern, ZoneTestResult};
    use chrono::NaiveDate;
    use std::fs;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, s).unwrap()
    }

    fn open(dir: &Path, hvi: &str) -> ValidationSink {
        let mut cfg = Config::default();
        cfg.paths.validation_dir = dir.display().to_string();
        cfg.mtp.hvi_mode = hvi.to_string();
        ValidationSink::open(&SinkContext::new(&cfg, date())).unwrap()
    }

    #[test]
    fn open_does_not_create_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = open(tmp.path(), "F");
        assert_eq!(sink.path(), tmp.path().join("VALIDATION_20250214.ini"));
        assert!(!sink.path().exists());
    }

    #[test]
    fn record_block_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = open(tmp.path(), "F");
        let input = Input::new("CELL9", "IN9", 7, 3);
        let result = ZoneTestResult::new("NONE", "OK", &at(10, 0, 0), &at(10, 0, 12))
            .with_axis(JudgmentAxis::Color, "OK")
            .with_axis(JudgmentAxis::Pattern, "NG");
        let pass = PassRecord::new(at(10, 0, 0), at(10, 0, 12), &input, &result);
        sink.write_record_at(at(10, 0, 13), &pass, 2, None).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(
            contents,
            "[2025-02-14 10:00:13]\n\
             START_TIME=2025:02:14 10:00:00:000\n\
             END_TIME=2025:02:14 10:00:12:000\n\
             TACT=12.000\n\
             CELL_ID=CELL9\n\
             INNER_ID=IN9\n\
             ZONE=2\n\
             TOTAL_POINT=7\n\
             CUR_POINT=3\n\
             ERROR_NAME=NONE\n\
             JUDGMENT=OK\n\
             COLOR_JUDGMENT=OK\n\
             PATTERN_JUDGMENT=NG\n\
             \n"
        );
    }

    #[test]
    fn snapshot_adds_base_angle_checks() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = open(tmp.path(), "T");
        let mut output = Output::empty();
        output.set_cell(
            0,
            1,
            Pattern {
                l: 88.8,
                result: 1,
                ..Pattern::PLACEHOLDER
            },
        );
        let input = Input::default();
        let result = ZoneTestResult::default();
        let pass = PassRecord::new(at(1, 0, 0), at(1, 0, 1), &input, &result);
        sink.write_record_at(at(1, 0, 2), &pass, 4, Some(&output)).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("\nSEQUENCE=4\n"));
        assert!(contents.contains("\nW_L=0.000\nW_RESULT=OK\nR_L=88.800\nR_RESULT=NG\n"));
        assert!(contents.contains("\nWG13_RESULT=OK\n\n"));
    }

    #[test]
    fn section_keeps_caller_order() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = open(tmp.path(), "F");
        let entries = [("Z_CHECK", "PASS"), ("A_CHECK", "FAIL")];
        sink.write_section_at(at(23, 59, 58), "LIMITS", "C", "I", &entries)
            .unwrap();
        sink.write_section_at(at(23, 59, 59), "LIMITS", "C", "I", &entries)
            .unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        let first = contents.split("\n\n").next().unwrap();
        assert_eq!(
            first,
            "[LIMITS_20250214_235958]\n\
             CELL_ID=C\n\
             INNER_ID=I\n\
             TIMESTAMP=2025:02:14 23:59:58:000\n\
             Z_CHECK=PASS\n\
             A_CHECK=FAIL"
        );
        assert_eq!(contents.matches("[LIMITS_").count(), 2);
    }
}
