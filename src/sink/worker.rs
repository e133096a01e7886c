//! Background result writer.
//!
//! Callers hand owned [`ResultJob`]s to a dedicated thread over a bounded
//! crossbeam channel. `submit()` uses `try_send()`, so a test station's
//! measurement loop never waits on disk I/O.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use chrono::NaiveDateTime;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::{debug, error, info, warn};

use crate::core::errors::{Result, ResultLogError};
use crate::manager::{IpvsZonePass, ResultLogs, RunReport, ZonePass};
use crate::record::{Input, Output, PassRecord, ZoneTestResult};

/// Default bounded channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Work accepted by the writer thread.
#[derive(Debug, Clone)]
pub enum ResultJob {
    /// Replace one zone's CIM snapshot.
    Cim {
        start: NaiveDateTime,
        end: NaiveDateTime,
        zone: u32,
        sequence: Option<u32>,
        pass: Box<ZonePass>,
    },
    /// Normal-mode pass over every zone.
    AllZones {
        start: NaiveDateTime,
        end: NaiveDateTime,
        zones: BTreeMap<u32, ZonePass>,
    },
    /// HVI pass; `outputs` is zone-major.
    Hvi {
        start: NaiveDateTime,
        end: NaiveDateTime,
        input: Input,
        result: ZoneTestResult,
        outputs: Vec<Output>,
        sequence_count: usize,
    },
    /// IPVS EECP and EECP-SUMMARY rows for every zone.
    Ipvs {
        start: NaiveDateTime,
        end: NaiveDateTime,
        zones: BTreeMap<u32, IpvsZonePass>,
    },
    /// Named VALIDATION section.
    Section {
        section: String,
        cell_id: String,
        inner_id: String,
        entries: Vec<(String, String)>,
    },
    Shutdown,
}

impl ResultJob {
    const fn label(&self) -> &'static str {
        match self {
            Self::Cim { .. } => "cim",
            Self::AllZones { .. } => "all_zones",
            Self::Hvi { .. } => "hvi",
            Self::Ipvs { .. } => "ipvs",
            Self::Section { .. } => "section",
            Self::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    dropped: AtomicU64,
    failed: AtomicU64,
    completed: AtomicU64,
}

/// Cloneable, non-blocking handle to the writer thread.
#[derive(Debug, Clone)]
pub struct ResultWriterHandle {
    tx: Sender<ResultJob>,
    counters: Arc<Counters>,
}

impl ResultWriterHandle {
    /// Queue a job. Returns `Ok(false)` when a full queue dropped it.
    ///
    /// Dropped jobs are counted in [`Self::dropped_jobs`]. A stopped writer
    /// is reported as [`ResultLogError::ChannelClosed`].
    pub fn submit(&self, job: ResultJob) -> Result<bool> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(job)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(job = job.label(), "result writer queue full, job dropped");
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => Err(ResultLogError::ChannelClosed {
                component: "result-writer",
            }),
        }
    }

    /// Ask the writer to stop after the jobs already queued.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ResultJob::Shutdown);
    }

    pub fn dropped_jobs(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// Jobs that ran and reported at least one failure.
    pub fn failed_jobs(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    pub fn completed_jobs(&self) -> u64 {
        self.counters.completed.load(Ordering::Relaxed)
    }
}

/// Spawn the writer thread.
///
/// The thread runs until `shutdown()` is called or every handle is dropped.
pub fn spawn_result_writer(
    logs: Arc<ResultLogs>,
    capacity: usize,
) -> Result<(ResultWriterHandle, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<ResultJob>(capacity.max(1));
    let counters = Arc::new(Counters::default());
    let handle = ResultWriterHandle {
        tx,
        counters: Arc::clone(&counters),
    };

    let join = thread::Builder::new()
        .name("result-writer".to_string())
        .spawn(move || writer_thread_main(&rx, &logs, &counters))
        .map_err(|e| ResultLogError::Runtime {
            details: format!("failed to spawn result writer thread: {e}"),
        })?;

    Ok((handle, join))
}

fn writer_thread_main(rx: &Receiver<ResultJob>, logs: &ResultLogs, counters: &Counters) {
    info!("result writer started");
    while let Ok(job) = rx.recv() {
        if matches!(job, ResultJob::Shutdown) {
            break;
        }
        let label = job.label();
        match run_job(logs, job) {
            Ok(()) => {
                counters.completed.fetch_add(1, Ordering::Relaxed);
                debug!(job = label, "result job done");
            }
            Err(err) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(job = label, code = err.code(), error = %err, "result job failed");
            }
        }
    }
    info!(
        completed = counters.completed.load(Ordering::Relaxed),
        failed = counters.failed.load(Ordering::Relaxed),
        dropped = counters.dropped.load(Ordering::Relaxed),
        "result writer stopped"
    );
}

fn run_job(logs: &ResultLogs, job: ResultJob) -> Result<()> {
    match job {
        ResultJob::Cim {
            start,
            end,
            zone,
            sequence,
            pass,
        } => {
            let record = PassRecord::new(start, end, &pass.input, &pass.result);
            logs.create_cim_for_zone(&record, zone, sequence, &pass.output)
                .map(|_| ())
        }
        ResultJob::AllZones { start, end, zones } => logs
            .create_all_result_logs(start, end, &zones)
            .and_then(RunReport::into_result)
            .map(|_| ()),
        ResultJob::Hvi {
            start,
            end,
            input,
            result,
            outputs,
            sequence_count,
        } => logs
            .create_hvi_result_logs(start, end, &input, &result, &outputs, sequence_count)
            .and_then(RunReport::into_result)
            .map(|_| ()),
        ResultJob::Ipvs { start, end, zones } => logs
            .create_ipvs_result_logs(start, end, &zones)
            .into_result()
            .map(|_| ()),
        ResultJob::Section {
            section,
            cell_id,
            inner_id,
            entries,
        } => logs
            .validation()?
            .write_section(&section, &cell_id, &inner_id, &entries[..]),
        ResultJob::Shutdown => Ok(()),
    }
}
