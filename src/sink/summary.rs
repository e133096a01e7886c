//! EECP-SUMMARY sink: one compact CSV row per zone or sequence.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::core::errors::Result;
use crate::record::PassRecord;
use crate::schema::columns::{Column, KeyKind, RowValues, Snapshots, render_row, summary_columns};
use crate::sink::file::{append_text, create_with_header, dated_file_name};
use crate::sink::mode::LogMode;
use crate::sink::{SinkContext, csv_header};

#[derive(Debug)]
pub struct EecpSummarySink {
    path: PathBuf,
    mode: LogMode,
    columns: Vec<Column>,
    lock: Mutex<()>,
}

impl EecpSummarySink {
    pub const KIND: &'static str = "EECP_SUMMARY";

    pub fn open(ctx: &SinkContext<'_>) -> Result<Self> {
        let mode = LogMode::from_config(&ctx.config.mtp);
        let dir = ctx.resolve_dir(|paths| paths.eecp_summary_dir.as_str())?;
        let columns = summary_columns(mode.key_kind(), ctx.config.summary.extended);
        Self::open_in(&dir, ctx, mode, columns, "EECP summary")
    }

    /// IPVS variant: basic six-column layout keyed by zone, never `_HVI`.
    pub fn open_ipvs(ctx: &SinkContext<'_>) -> Result<Self> {
        let dir = ctx.resolve_dir(|paths| paths.ipvs_eecp_summary_dir.as_str())?;
        let columns = summary_columns(KeyKind::Zone, false);
        Self::open_in(&dir, ctx, LogMode::Normal, columns, "IPVS EECP summary")
    }

    fn open_in(
        dir: &Path,
        ctx: &SinkContext<'_>,
        mode: LogMode,
        columns: Vec<Column>,
        label: &'static str,
    ) -> Result<Self> {
        let path = dir.join(dated_file_name(Self::KIND, ctx.date, mode, "csv"));
        if create_with_header(&path, &csv_header(&columns))? {
            info!(path = %path.display(), columns = columns.len(), log = label, "created summary log");
        }
        debug!(path = %path.display(), mode = mode.label(), log = label, "summary sink ready");

        Ok(Self {
            path,
            mode,
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

    /// Append one row. `key` is the zone (Normal) or sequence (HVI) number.
    pub fn write_record(&self, pass: &PassRecord<'_>, key: u32, summary_data: &str) -> Result<()> {
        let mut line = render_row(
            &self.columns,
            &RowValues {
                pass,
                key,
                summary_data,
                snapshots: Snapshots::None,
            },
        );
        line.push('\n');

        let _guard = self.lock.lock();
        append_text(&self.path, &line)
    }
}
