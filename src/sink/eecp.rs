//! EECP sink: one CSV row per measured zone (Normal) or per sequence (HVI).
//!
//! File: `EECP_{yyyyMMdd}[_HVI].csv`, append-only for the day.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::core::errors::{Result, ResultLogError};
use crate::record::{Output, PassRecord};
use crate::schema::catalog::hvi_index;
use crate::schema::columns::{Column, RowValues, Snapshots, eecp_columns, render_row};
use crate::sink::file::{append_text, create_with_header, dated_file_name};
use crate::sink::mode::LogMode;
use crate::sink::{SinkContext, csv_header};

/// Outcome of an HVI batch write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Rows appended (one per sequence).
    pub rows: usize,
    /// (zone, sequence) groups filled with placeholders.
    pub skipped: usize,
}

/// Append-only EECP CSV log.
#[derive(Debug)]
pub struct EecpSink {
    path: PathBuf,
    mode: LogMode,
    zone_count: usize,
    columns: Vec<Column>,
    lock: Mutex<()>,
}

impl EecpSink {
    pub const KIND: &'static str = "EECP";

    /// Resolve the directory, fix schema and file name, write the header if new.
    pub fn open(ctx: &SinkContext<'_>) -> Result<Self> {
        let mode = LogMode::from_config(&ctx.config.mtp);
        let zone_count = ctx.zone_count();
        let dir = ctx.resolve_dir(|paths| paths.eecp_dir.as_str())?;
        let path = dir.join(dated_file_name(Self::KIND, ctx.date, mode, "csv"));
        let columns = eecp_columns(mode.eecp_layout(zone_count));

        if create_with_header(&path, &csv_header(&columns))? {
            info!(path = %path.display(), columns = columns.len(), "created EECP log");
        }
        debug!(path = %path.display(), mode = mode.label(), zone_count, "EECP sink ready");

        Ok(Self {
            path,
            mode,
            zone_count,
            columns,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn mode(&self) -> LogMode {
        self.mode
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Append one Normal-mode row for `zone`.
    pub fn write_record(&self, pass: &PassRecord<'_>, zone: u32, output: &Output) -> Result<()> {
        if self.mode.is_hvi() {
            return Err(self.mismatch("write_record"));
        }
        let mut line = render_row(
            &self.columns,
            &RowValues {
                pass,
                key: zone,
                summary_data: "",
                snapshots: Snapshots::Single(output),
            },
        );
        line.push('\n');

        let _guard = self.lock.lock();
        append_text(&self.path, &line)
    }

    /// Append one HVI row per sequence.
    ///
    /// `outputs` is zone-major: the snapshot for (zone, sequence) sits at
    /// [`hvi_index`]. Groups whose index overflows or falls outside `outputs` are logged
    /// and written as placeholders; the rest of the row is unaffected.
    pub fn write_batch(
        &self,
        pass: &PassRecord<'_>,
        outputs: &[Output],
        sequence_count: usize,
    ) -> Result<BatchReport> {
        if !self.mode.is_hvi() {
            return Err(self.mismatch("write_batch"));
        }

        let mut report = BatchReport::default();
        let mut text = String::new();
        for sequence in 0..sequence_count {
            let groups: Vec<Option<&Output>> = (0..self.zone_count)
                .map(|zone| {
                    let index = hvi_index(zone, sequence, sequence_count);
                    let found = index.and_then(|index| outputs.get(index));
                    if found.is_none() {
                        warn!(
                            zone = zone + 1,
                            sequence = sequence + 1,
                            index = ?index,
                            available = outputs.len(),
                            "HVI snapshot index out of range, writing placeholders"
                        );
                        report.skipped += 1;
                    }
                    found
                })
                .collect();

            text.push_str(&render_row(
                &self.columns,
                &RowValues {
                    pass,
                    key: sequence_key(sequence),
                    summary_data: "",
                    snapshots: Snapshots::PerZone(groups),
                },
            ));
            text.push('\n');
            report.rows += 1;
        }

        if !text.is_empty() {
            let _guard = self.lock.lock();
            append_text(&self.path, &text)?;
        }
        Ok(report)
    }

    fn mismatch(&self, operation: &'static str) -> ResultLogError {
        ResultLogError::ModeMismatch {
            sink: Self::KIND,
            mode: self.mode.label(),
            operation,
        }
    }
}

/// One-based sequence number for the key column.
pub(crate) fn sequence_key(sequence: usize) -> u32 {
    u32::try_from(sequence + 1).unwrap_or(u32::MAX)
}
