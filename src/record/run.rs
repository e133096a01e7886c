//! Run metadata and judgments that accompany every snapshot.

#![allow(missing_docs)]

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::record::format::tact_seconds;
use crate::schema::catalog::WAD_COUNT;

/// Largest accepted `total_point`: one point per WAD.
pub const MAX_TOTAL_POINT: i32 = WAD_COUNT as i32;

/// Run identifiers and progress handed to the acquisition layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    pub cell_id: String,
    pub inner_id: String,
    /// Configured pattern count, capped at [`MAX_TOTAL_POINT`].
    #[serde(deserialize_with = "deserialize_total_point")]
    pub total_point: i32,
    /// Progress cursor.
    pub cur_point: i32,
}

impl Input {
    #[must_use]
    pub fn new(
        cell_id: impl Into<String>,
        inner_id: impl Into<String>,
        total_point: i32,
        cur_point: i32,
    ) -> Self {
        Self {
            cell_id: cell_id.into(),
            inner_id: inner_id.into(),
            total_point: total_point.min(MAX_TOTAL_POINT),
            cur_point,
        }
    }
}

fn deserialize_total_point<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(i32::deserialize(deserializer)?.min(MAX_TOTAL_POINT))
}

/// Optional per-axis judgments, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgmentAxis {
    Color,
    Luminance,
    Efficiency,
    Current,
    Pattern,
}

impl JudgmentAxis {
    pub const ALL: [Self; 5] = [
        Self::Color,
        Self::Luminance,
        Self::Efficiency,
        Self::Current,
        Self::Pattern,
    ];

    /// Key used in INI/DAT blocks.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Color => "COLOR_JUDGMENT",
            Self::Luminance => "LUMINANCE_JUDGMENT",
            Self::Efficiency => "EFFICIENCY_JUDGMENT",
            Self::Current => "CURRENT_JUDGMENT",
            Self::Pattern => "PATTERN_JUDGMENT",
        }
    }

    /// Short label used in summary text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Color => "COLOR",
            Self::Luminance => "LUMINANCE",
            Self::Efficiency => "EFFICIENCY",
            Self::Current => "CURRENT",
            Self::Pattern => "PATTERN",
        }
    }
}

/// Judgment bundle for one test pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTestResult {
    pub error_name: String,
    /// Elapsed seconds, `end - start`.
    pub tact: f64,
    /// Overall pass/fail token.
    pub judgment: String,
    pub color_judgment: Option<String>,
    pub luminance_judgment: Option<String>,
    pub efficiency_judgment: Option<String>,
    pub current_judgment: Option<String>,
    pub pattern_judgment: Option<String>,
}

impl ZoneTestResult {
    /// Judgment for the window `start..end`.
    #[must_use]
    pub fn new(
        error_name: impl Into<String>,
        judgment: impl Into<String>,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Self {
        Self {
            error_name: error_name.into(),
            tact: tact_seconds(start, end),
            judgment: judgment.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: JudgmentAxis, value: impl Into<String>) -> Self {
        *self.axis_slot(axis) = Some(value.into());
        self
    }

    /// Judgment for `axis` if present and non-empty.
    #[must_use]
    pub fn axis(&self, axis: JudgmentAxis) -> Option<&str> {
        let slot = match axis {
            JudgmentAxis::Color => &self.color_judgment,
            JudgmentAxis::Luminance => &self.luminance_judgment,
            JudgmentAxis::Efficiency => &self.efficiency_judgment,
            JudgmentAxis::Current => &self.current_judgment,
            JudgmentAxis::Pattern => &self.pattern_judgment,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Present axis judgments in fixed order.
    pub fn axis_judgments(&self) -> impl Iterator<Item = (JudgmentAxis, &str)> + '_ {
        JudgmentAxis::ALL
            .into_iter()
            .filter_map(|axis| self.axis(axis).map(|value| (axis, value)))
    }

    fn axis_slot(&mut self, axis: JudgmentAxis) -> &mut Option<String> {
        match axis {
            JudgmentAxis::Color => &mut self.color_judgment,
            JudgmentAxis::Luminance => &mut self.luminance_judgment,
            JudgmentAxis::Efficiency => &mut self.efficiency_judgment,
            JudgmentAxis::Current => &mut self.current_judgment,
            JudgmentAxis::Pattern => &mut self.pattern_judgment,
        }
    }
}

/// Context shared by every write for one test pass.
#[derive(Debug, Clone, Copy)]
pub struct PassRecord<'a> {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub input: &'a Input,
    pub result: &'a ZoneTestResult,
}

impl<'a> PassRecord<'a> {
    #[must_use]
    pub const fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        input: &'a Input,
        result: &'a ZoneTestResult,
    ) -> Self {
        Self {
            start,
            end,
            input,
            result,
        }
    }

    /// Elapsed seconds of this pass.
    #[must_use]
    pub fn tact(&self) -> f64 {
        tact_seconds(&self.start, &self.end)
    }

    #[must_use]
    pub fn cell_id(&self) -> &'a str {
        &self.input.cell_id
    }

    #[must_use]
    pub fn inner_id(&self) -> &'a str {
        &self.input.inner_id
    }
}
