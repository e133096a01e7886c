//! Fixed naming tables and index arithmetic shared by every sink.
//!
//! A measurement snapshot is a `WAD_COUNT x PATTERN_COUNT` grid stored flat,
//! WAD-major: index `wad * PATTERN_COUNT + pattern`. HVI batches store one
//! snapshot per (zone, sequence), zone-major.

/// Number of viewing angles per snapshot.
pub const WAD_COUNT: usize = 7;

/// Number of stimulus patterns per viewing angle.
pub const PATTERN_COUNT: usize = 17;

/// Patterns per snapshot.
pub const OUTPUT_LEN: usize = WAD_COUNT * PATTERN_COUNT;

/// Column-name suffix for each WAD; index 0 is the base angle and has none.
pub const WAD_SUFFIXES: [&str; WAD_COUNT] = [
    "", "_WAD_30", "_WAD_45", "_WAD_60", "_WAD_15", "_WAD_A", "_WAD_B",
];

/// Key prefix for each WAD in CIM `.dat` files.
pub const WAD_LABELS: [&str; WAD_COUNT] = [
    "WAD_0", "WAD_30", "WAD_45", "WAD_60", "WAD_15", "WAD_A", "WAD_B",
];

/// Pattern names: white, the three primaries, then 13 gray steps.
pub const PATTERN_NAMES: [&str; PATTERN_COUNT] = [
    "W", "R", "G", "B", "WG", "WG2", "WG3", "WG4", "WG5", "WG6", "WG7", "WG8", "WG9", "WG10",
    "WG11", "WG12", "WG13",
];

/// Measurement points per WAD in an IPVS snapshot.
pub const IPVS_POINT_COUNT: usize = 10;

/// Patterns per IPVS snapshot.
pub const IPVS_OUTPUT_LEN: usize = WAD_COUNT * IPVS_POINT_COUNT;

/// HVI column suffix for zones 1..=8.
pub const ZONE_SUFFIXES: [&str; 8] = ["_1", "_2", "_3", "_4", "_5", "_6", "_7", "_8"];

/// Flat index of a (wad, pattern) cell.
#[must_use]
pub const fn flatten_index(wad: usize, pattern: usize) -> usize {
    wad * PATTERN_COUNT + pattern
}

/// Inverse of [`flatten_index`]: `(wad, pattern)`.
#[must_use]
pub const fn unflatten_index(index: usize) -> (usize, usize) {
    (index / PATTERN_COUNT, index % PATTERN_COUNT)
}

/// Flat index of a (zone, sequence) snapshot in a zone-major HVI batch.
///
/// `zone` and `sequence` are zero-based. Callers compare the result against
/// the batch length. `None` when the arithmetic overflows, which no batch
/// can satisfy either.
#[must_use]
pub const fn hvi_index(zone: usize, sequence: usize, sequence_count: usize) -> Option<usize> {
    match zone.checked_mul(sequence_count) {
        Some(base) => base.checked_add(sequence),
        None => None,
    }
}

/// Flat index of a (wad, point) cell in an IPVS snapshot.
#[must_use]
pub const fn ipvs_index(wad: usize, point: usize) -> usize {
    wad * IPVS_POINT_COUNT + point
}

/// HVI column suffix for a zero-based zone.
#[must_use]
pub fn zone_suffix(zone: usize) -> String {
    ZONE_SUFFIXES
        .get(zone)
        .map_or_else(|| format!("_Z{}", zone + 1), |s| (*s).to_string())
}
