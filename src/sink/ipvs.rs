//! IPVS EECP sink: one row per zone covering all 10 points at every WAD.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::core::errors::Result;
use crate::record::{IpvsOutput, PassRecord};
use crate::schema::columns::{Column, RowValues, Snapshots, ipvs_eecp_columns, render_row};
use crate::sink::file::{append_text, create_with_header, dated_file_name};
use crate::sink::mode::LogMode;
use crate::sink::{SinkContext, csv_header};

#[derive(Debug)]
pub struct IpvsEecpSink {
    path: PathBuf,
    columns: Vec<Column>,
    lock: Mutex<()>,
}

impl IpvsEecpSink {
    pub const KIND: &'static str = "EECP";

    /// IPVS stations have no HVI variant; the file name never carries `_HVI`.
    pub fn open(ctx: &SinkContext<'_>) -> Result<Self> {
        let dir = ctx.resolve_dir(|paths| paths.ipvs_eecp_dir.as_str())?;
        let path = dir.join(dated_file_name(Self::KIND, ctx.date, LogMode::Normal, "csv"));
        let columns = ipvs_eecp_columns();

        if create_with_header(&path, &csv_header(&columns))? {
            info!(path = %path.display(), columns = columns.len(), "created IPVS EECP log");
        }
        debug!(path = %path.display(), "IPVS EECP sink ready");

        Ok(Self {
            path,
            columns,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn write_record(&self, pass: &PassRecord<'_>, zone: u32, output: &IpvsOutput) -> Result<()> {
        let mut line = render_row(
            &self.columns,
            &RowValues {
                pass,
                key: zone,
                summary_data: "",
                snapshots: Snapshots::Ipvs(output),
            },
        );
        line.push('\n');

        let _guard = self.lock.lock();
        append_text(&self.path, &line)
    }
}
