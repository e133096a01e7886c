//! CIM sinks.
//!
//! The MTP sink keeps the latest full snapshot per zone in `ZONE{n}.dat`;
//! every write replaces the zone's file. IPVS stations instead append short
//! entries to a daily `CIM_{yyyyMMdd}.dat`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use tracing::debug;

use crate::core::errors::Result;
use crate::record::format::{SECTION_TIME_FORMAT, format_measure, format_timestamp, single_line};
use crate::record::{Output, PassRecord, PatternField};
use crate::schema::catalog::{OUTPUT_LEN, PATTERN_NAMES, WAD_LABELS, unflatten_index};
use crate::sink::SinkContext;
use crate::sink::file::{append_text, dated_file_name, replace_text};
use crate::sink::mode::LogMode;

/// Line closing every snapshot.
pub const CIM_TERMINATOR: &str = "====";

/// Line closing every IPVS entry.
pub const IPVS_CIM_SEPARATOR: &str = "----------------------------------------";

#[derive(Debug)]
pub struct CimSink {
    dir: PathBuf,
    date: NaiveDate,
    mode: LogMode,
    lock: Mutex<()>,
}

impl CimSink {
    pub const KIND: &'static str = "CIM";

    pub fn open(ctx: &SinkContext<'_>) -> Result<Self> {
        let mode = LogMode::from_config(&ctx.config.mtp);
        let dir = ctx.resolve_dir(|paths| paths.cim_dir.as_str())?;
        debug!(dir = %dir.display(), mode = mode.label(), "CIM sink ready");
        Ok(Self {
            dir,
            date: ctx.date,
            mode,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub const fn mode(&self) -> LogMode {
        self.mode
    }

    /// Snapshot file for `zone`.
    #[must_use]
    pub fn zone_path(&self, zone: u32) -> PathBuf {
        self.dir.join(format!("ZONE{zone}.dat"))
    }

    /// Replace the zone's snapshot. Returns the file written.
    ///
    /// `sequence` is recorded when present (HVI passes).
    pub fn write_record(
        &self,
        pass: &PassRecord<'_>,
        zone: u32,
        sequence: Option<u32>,
        output: &Output,
    ) -> Result<PathBuf> {
        let text = self.snapshot_text(pass, zone, sequence, output);
        let path = self.zone_path(zone);

        let _guard = self.lock.lock();
        replace_text(&path, &text)?;
        debug!(path = %path.display(), zone, "CIM snapshot replaced");
        Ok(path)
    }

    fn snapshot_text(
        &self,
        pass: &PassRecord<'_>,
        zone: u32,
        sequence: Option<u32>,
        output: &Output,
    ) -> String {
        let mut text = String::with_capacity(64 * 1024);
        text.push_str("[CIM]\n");
        push_line(&mut text, "DATE", &self.date.format("%Y%m%d").to_string());
        push_line(&mut text, "MODE", self.mode.label());
        push_line(&mut text, "START_TIME", &format_timestamp(&pass.start));
        push_line(&mut text, "END_TIME", &format_timestamp(&pass.end));
        push_line(&mut text, "TACT", &format_measure(pass.tact()));
        push_line(&mut text, "CELL_ID", pass.cell_id());
        push_line(&mut text, "INNER_ID", pass.inner_id());
        push_line(&mut text, "ZONE", &zone.to_string());
        if let Some(sequence) = sequence {
            push_line(&mut text, "SEQUENCE", &sequence.to_string());
        }
        push_line(&mut text, "TOTAL_POINT", &pass.input.total_point.to_string());
        push_line(&mut text, "CUR_POINT", &pass.input.cur_point.to_string());
        push_line(&mut text, "ERROR_NAME", &pass.result.error_name);
        push_line(&mut text, "JUDGMENT", &pass.result.judgment);
        for (axis, value) in pass.result.axis_judgments() {
            push_line(&mut text, axis.key(), value);
        }

        for index in 0..OUTPUT_LEN {
            let (wad, pattern) = unflatten_index(index);
            let cell = output.get(index);
            text.push('\n');
            for field in PatternField::CIM {
                let _ = writeln!(
                    text,
                    "{}_{}_{} = {}",
                    WAD_LABELS[wad],
                    PATTERN_NAMES[pattern],
                    field.name(),
                    cell.field_text(field)
                );
            }
        }
        text.push('\n');
        text.push_str(CIM_TERMINATOR);
        text.push('\n');
        text
    }
}

fn push_line(text: &mut String, key: &str, value: &str) {
    let _ = writeln!(text, "{key} = {}", single_line(value));
}

/// IPVS CIM log: one appended entry per zone pass.
#[derive(Debug)]
pub struct IpvsCimSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl IpvsCimSink {
    pub fn open(ctx: &SinkContext<'_>) -> Result<Self> {
        let dir = ctx.resolve_dir(|paths| paths.ipvs_cim_dir.as_str())?;
        let path = dir.join(dated_file_name(CimSink::KIND, ctx.date, LogMode::Normal, "dat"));
        debug!(path = %path.display(), "IPVS CIM sink ready");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry for `zone` carrying `cim_data`.
    pub fn write_record(&self, pass: &PassRecord<'_>, zone: u32, cim_data: &str) -> Result<()> {
        self.write_record_at(Local::now().naive_local(), pass, zone, cim_data)
    }

    pub(crate) fn write_record_at(
        &self,
        written_at: NaiveDateTime,
        pass: &PassRecord<'_>,
        zone: u32,
        cim_data: &str,
    ) -> Result<()> {
        let mut entry = String::new();
        let _ = writeln!(entry, "[{}] CIM Log Entry", written_at.format(SECTION_TIME_FORMAT));
        let fields = [
            ("START_TIME", format_timestamp(&pass.start)),
            ("END_TIME", format_timestamp(&pass.end)),
            ("CELL_ID", pass.cell_id().to_string()),
            ("INNER_ID", pass.inner_id().to_string()),
            ("ZONE", zone.to_string()),
            ("CIM_DATA", cim_data.to_string()),
        ];
        for (key, value) in &fields {
            let _ = writeln!(entry, "{key}: {}", single_line(value));
        }
        entry.push_str(IPVS_CIM_SEPARATOR);
        entry.push('\n');

        let _guard = self.lock.lock();
        append_text(&self.path, &entry)
    }
}
