//! Stress tests: many writers hammering every sink kind at once.

mod common;

use std::collections::BTreeMap;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{NaiveDate, NaiveDateTime};

use panel_result_log::manager::{ResultLogs, ZonePass};
use panel_result_log::record::{Input, Output, Pattern, ZoneTestResult};
use panel_result_log::schema::catalog::OUTPUT_LEN;
use panel_result_log::sink::worker::{ResultJob, spawn_result_writer};

const WRITERS: u32 = 6;
const ROUNDS: u32 = 40;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn at(s: u32) -> NaiveDateTime {
    date().and_hms_opt(2, 0, s).unwrap()
}

fn marked_pass(writer: u32, round: u32) -> ZonePass {
    let input = Input::new(format!("W{writer}"), format!("R{round}"), 7, 7);
    let result = ZoneTestResult::new("NONE", "OK", &at(0), &at(1));
    let output = Output::from_patterns(vec![
        Pattern {
            l: f64::from(writer * 1000 + round),
            ..Pattern::PLACEHOLDER
        };
        OUTPUT_LEN
    ]);
    ZonePass::new(input, result, output)
}

#[test]
fn every_kind_under_parallel_load() {
    let tmp = tempfile::tempdir().unwrap();
    let logs = Arc::new(ResultLogs::with_date(
        common::config_under(tmp.path(), "F"),
        date(),
    ));
    let barrier = Arc::new(Barrier::new(WRITERS as usize));

    let handles: Vec<_> = (1..=WRITERS)
        .map(|writer| {
            let logs = Arc::clone(&logs);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..ROUNDS {
                    let data = marked_pass(writer, round);
                    let zones = BTreeMap::from([(writer, data.clone())]);
                    let report = logs.create_all_result_logs(at(0), at(1), &zones).unwrap();
                    assert!(report.all_ok());
                    logs.create_cim_for_zone(&data.pass_record(at(0), at(1)), writer, None, &data.output)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = (WRITERS * ROUNDS) as usize;
    let eecp_sink = logs.eecp().unwrap();
    let eecp = fs::read_to_string(eecp_sink.path()).unwrap();
    let rows: Vec<&str> = eecp.lines().skip(1).collect();
    assert_eq!(rows.len(), total);
    let l_column = 10;
    for row in &rows {
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), eecp_sink.columns().len());
        let writer: u32 = cells[3].trim_start_matches('W').parse().unwrap();
        let round: u32 = cells[4].trim_start_matches('R').parse().unwrap();
        assert_eq!(cells[5], writer.to_string());
        assert_eq!(cells[l_column], format!("{}.000", writer * 1000 + round));
    }

    let summary = fs::read_to_string(logs.eecp_summary().unwrap().path()).unwrap();
    assert_eq!(summary.lines().count(), total + 1);

    let validation = fs::read_to_string(logs.validation().unwrap().path()).unwrap();
    assert_eq!(validation.matches("\nSTART_TIME=").count(), total);
    assert_eq!(validation.matches("\n\n").count(), total);

    for writer in 1..=WRITERS {
        let cim = fs::read_to_string(tmp.path().join(format!("CIM/ZONE{writer}.dat"))).unwrap();
        assert_eq!(cim.matches("[CIM]").count(), 1);
        assert!(cim.contains(&format!("INNER_ID = R{}\n", ROUNDS - 1)));
    }
}

#[test]
fn background_writer_drains_parallel_submitters() {
    let tmp = tempfile::tempdir().unwrap();
    let logs = Arc::new(ResultLogs::with_date(
        common::config_under(tmp.path(), "F"),
        date(),
    ));
    let capacity = (WRITERS * ROUNDS) as usize;
    let (handle, join) = spawn_result_writer(Arc::clone(&logs), capacity).unwrap();

    let submitters: Vec<_> = (1..=WRITERS)
        .map(|writer| {
            let handle = handle.clone();
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let queued = handle
                        .submit(ResultJob::AllZones {
                            start: at(0),
                            end: at(1),
                            zones: BTreeMap::from([(writer, marked_pass(writer, round))]),
                        })
                        .unwrap();
                    assert!(queued);
                }
            })
        })
        .collect();
    for submitter in submitters {
        submitter.join().unwrap();
    }
    handle.shutdown();
    join.join().unwrap();

    assert_eq!(handle.dropped_jobs(), 0);
    assert_eq!(handle.failed_jobs(), 0);
    assert_eq!(handle.completed_jobs(), u64::from(WRITERS * ROUNDS));
    let eecp = fs::read_to_string(logs.eecp().unwrap().path()).unwrap();
    assert_eq!(eecp.lines().count(), capacity + 1);
}
