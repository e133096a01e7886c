//! Column generator: one ordered descriptor list per CSV schema.
//!
//! Header text and row text are both produced by walking the same
//! `Vec<Column>`, so a row can never disagree with its header about column
//! order or count. Traversal orders:
//!
//! - Normal EECP: pattern → WAD → field
//! - HVI EECP: zone → pattern → WAD → field
//! - IPVS EECP: point → WAD → field

use crate::record::format::{csv_text, format_measure, format_timestamp};
use crate::record::{IpvsOutput, Output, PassRecord, Pattern, PatternField};
use crate::schema::catalog::{
    IPVS_POINT_COUNT, PATTERN_COUNT, PATTERN_NAMES, WAD_COUNT, WAD_SUFFIXES, zone_suffix,
};

/// What the row key column identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Zone,
    Sequence,
}

impl KeyKind {
    /// Header text / INI key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Zone => "ZONE",
            Self::Sequence => "SEQUENCE",
        }
    }
}

/// How measurement cells are laid out across an EECP row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EecpLayout {
    /// One snapshot per row, keyed by zone.
    Normal,
    /// One row per sequence with a column group for every zone.
    Hvi { zone_count: usize },
}

impl EecpLayout {
    #[must_use]
    pub const fn key_kind(self) -> KeyKind {
        match self {
            Self::Normal => KeyKind::Zone,
            Self::Hvi { .. } => KeyKind::Sequence,
        }
    }
}

/// One column of a CSV schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    StartTime,
    EndTime,
    Tact,
    CellId,
    InnerId,
    Key(KeyKind),
    /// IPVS point selector; rows always cover every point.
    Point,
    /// Measurement field; `zone` is set only in the HVI layout.
    Cell {
        zone: Option<usize>,
        pattern: usize,
        wad: usize,
        field: PatternField,
    },
    IpvsCell {
        point: usize,
        wad: usize,
        field: PatternField,
    },
    SummaryData,
    ErrorName,
    Judgment,
    TotalPoint,
    CurPoint,
}

impl Column {
    /// Header text for this column.
    #[must_use]
    pub fn header(&self) -> String {
        match self {
            Self::StartTime => "START TIME".to_string(),
            Self::EndTime => "END TIME".to_string(),
            Self::Tact => "TACT".to_string(),
            Self::CellId => "CELL ID".to_string(),
            Self::InnerId => "INNER ID".to_string(),
            Self::Key(kind) => kind.label().to_string(),
            Self::Point => "POINT".to_string(),
            Self::Cell {
                zone,
                pattern,
                wad,
                field,
            } => {
                let zone = zone.map(zone_suffix).unwrap_or_default();
                format!(
                    "{}{}{zone}_{}",
                    PATTERN_NAMES[*pattern],
                    WAD_SUFFIXES[*wad],
                    field.name()
                )
            }
            Self::IpvsCell { point, wad, field } => {
                format!("W{}_{}_{}", WAD_SUFFIXES[*wad], field.name(), point + 1)
            }
            Self::SummaryData => "SUMMARY_DATA".to_string(),
            Self::ErrorName => "ERROR_NAME".to_string(),
            Self::Judgment => "JUDGMENT".to_string(),
            Self::TotalPoint => "TOTAL_POINT".to_string(),
            Self::CurPoint => "CUR_POINT".to_string(),
        }
    }
}

const EECP_TRAILER: [Column; 4] = [
    Column::ErrorName,
    Column::Judgment,
    Column::TotalPoint,
    Column::CurPoint,
];

fn push_cells(columns: &mut Vec<Column>, zone: Option<usize>) {
    for pattern in 0..PATTERN_COUNT {
        for wad in 0..WAD_COUNT {
            for field in PatternField::EECP {
                columns.push(Column::Cell {
                    zone,
                    pattern,
                    wad,
                    field,
                });
            }
        }
    }
}

/// EECP schema for `layout`.
#[must_use]
pub fn eecp_columns(layout: EecpLayout) -> Vec<Column> {
    let mut columns = vec![
        Column::StartTime,
        Column::EndTime,
        Column::Tact,
        Column::CellId,
        Column::InnerId,
        Column::Key(layout.key_kind()),
    ];
    match layout {
        EecpLayout::Normal => push_cells(&mut columns, None),
        EecpLayout::Hvi { zone_count } => {
            for zone in 0..zone_count {
                push_cells(&mut columns, Some(zone));
            }
        }
    }
    columns.extend(EECP_TRAILER);
    columns
}

/// EECP-SUMMARY schema; `extended` appends the judgment columns.
#[must_use]
pub fn summary_columns(key: KeyKind, extended: bool) -> Vec<Column> {
    let mut columns = vec![
        Column::StartTime,
        Column::EndTime,
        Column::CellId,
        Column::InnerId,
        Column::Key(key),
        Column::SummaryData,
    ];
    if extended {
        columns.extend([
            Column::Tact,
            Column::Judgment,
            Column::ErrorName,
            Column::TotalPoint,
            Column::CurPoint,
        ]);
    }
    columns
}

/// IPVS EECP schema.
#[must_use]
pub fn ipvs_eecp_columns() -> Vec<Column> {
    let mut columns = vec![
        Column::StartTime,
        Column::EndTime,
        Column::Tact,
        Column::CellId,
        Column::InnerId,
        Column::Key(KeyKind::Zone),
        Column::Point,
    ];
    for point in 0..IPVS_POINT_COUNT {
        for wad in 0..WAD_COUNT {
            for field in PatternField::IPVS {
                columns.push(Column::IpvsCell { point, wad, field });
            }
        }
    }
    columns
}

/// Header line (no trailing newline).
#[must_use]
pub fn header_line(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::header)
        .collect::<Vec<_>>()
        .join(",")
}

/// Snapshot data available to a row.
#[derive(Debug, Clone)]
pub enum Snapshots<'a> {
    None,
    Single(&'a Output),
    /// Indexed by zero-based zone; `None` marks a skipped group.
    PerZone(Vec<Option<&'a Output>>),
    Ipvs(&'a IpvsOutput),
}

impl Snapshots<'_> {
    fn cell(&self, zone: Option<usize>, wad: usize, pattern: usize) -> Pattern {
        match (self, zone) {
            (Self::Single(output), None) => output.cell(wad, pattern),
            (Self::PerZone(outputs), Some(zone)) => outputs
                .get(zone)
                .copied()
                .flatten()
                .map_or(Pattern::PLACEHOLDER, |output| output.cell(wad, pattern)),
            _ => Pattern::PLACEHOLDER,
        }
    }

    fn ipvs_cell(&self, wad: usize, point: usize) -> Pattern {
        match self {
            Self::Ipvs(output) => output.cell(wad, point),
            _ => Pattern::PLACEHOLDER,
        }
    }
}

/// Everything a row needs; rendered column by column.
#[derive(Debug, Clone)]
pub struct RowValues<'a> {
    pub pass: &'a PassRecord<'a>,
    /// Zone or sequence number written into the key column.
    pub key: u32,
    pub summary_data: &'a str,
    pub snapshots: Snapshots<'a>,
}

impl RowValues<'_> {
    /// Text for one column.
    #[must_use]
    pub fn value(&self, column: &Column) -> String {
        let pass = self.pass;
        match column {
            Column::StartTime => format_timestamp(&pass.start),
            Column::EndTime => format_timestamp(&pass.end),
            Column::Tact => format_measure(pass.tact()),
            Column::CellId => csv_text(pass.cell_id()).into_owned(),
            Column::InnerId => csv_text(pass.inner_id()).into_owned(),
            Column::Key(_) => self.key.to_string(),
            Column::Point => "ALL".to_string(),
            Column::Cell {
                zone,
                pattern,
                wad,
                field,
            } => self.snapshots.cell(*zone, *wad, *pattern).field_text(*field),
            Column::IpvsCell { point, wad, field } => {
                self.snapshots.ipvs_cell(*wad, *point).field_text(*field)
            }
            Column::SummaryData => csv_text(self.summary_data).into_owned(),
            Column::ErrorName => csv_text(&pass.result.error_name).into_owned(),
            Column::Judgment => csv_text(&pass.result.judgment).into_owned(),
            Column::TotalPoint => pass.input.total_point.to_string(),
            Column::CurPoint => pass.input.cur_point.to_string(),
        }
    }
}

/// Row line (no trailing newline) for `columns`.
#[must_use]
pub fn render_row(columns: &[Column], values: &RowValues<'_>) -> String {
    columns
        .iter()
        .map(|column| values.value(column))
        .collect::<Vec<_>>()
        .join(",")
}
