//! A single optical/electrical measurement.

use serde::{Deserialize, Serialize};

use crate::record::format::format_measure;

/// Pass/fail discriminator carried by each [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Ng,
    /// Anything else: the pattern was not judged.
    NotApplicable,
}

impl Verdict {
    /// Map the raw acquisition flag: 0 → OK, 1 → NG, other → not applicable.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Ok,
            1 => Self::Ng,
            _ => Self::NotApplicable,
        }
    }

    /// On-disk token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Ng => "NG",
            Self::NotApplicable => "PTN",
        }
    }
}

/// One measured value of a [`Pattern`], in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternField {
    X,
    Y,
    U,
    V,
    L,
    Cur,
    Eff,
    Result,
}

impl PatternField {
    /// Fields written into EECP rows.
    pub const EECP: [Self; 7] = [
        Self::X,
        Self::Y,
        Self::U,
        Self::V,
        Self::L,
        Self::Cur,
        Self::Eff,
    ];

    /// Fields written into CIM blocks.
    pub const CIM: [Self; 8] = [
        Self::X,
        Self::Y,
        Self::U,
        Self::V,
        Self::L,
        Self::Cur,
        Self::Eff,
        Self::Result,
    ];

    /// Fields written into IPVS EECP rows.
    pub const IPVS: [Self; 5] = [Self::X, Self::Y, Self::L, Self::Cur, Self::Eff];

    /// Column/key name fragment.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::U => "u",
            Self::V => "v",
            Self::L => "L",
            Self::Cur => "CUR",
            Self::Eff => "EFF",
            Self::Result => "RESULT",
        }
    }
}

/// One measurement for a given (angle, pattern) combination.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pattern {
    /// CIE 1931 x.
    pub x: f64,
    /// CIE 1931 y.
    pub y: f64,
    /// CIE 1976 u'.
    pub u: f64,
    /// CIE 1976 v'.
    pub v: f64,
    /// Luminance, cd/m².
    #[serde(alias = "L")]
    pub l: f64,
    /// Current, mA.
    pub cur: f64,
    /// Efficiency, %.
    pub eff: f64,
    /// Raw verdict flag, see [`Verdict::from_raw`].
    pub result: i32,
}

impl Pattern {
    /// The all-zero record rendered for absent cells.
    pub const PLACEHOLDER: Self = Self {
        x: 0.0,
        y: 0.0,
        u: 0.0,
        v: 0.0,
        l: 0.0,
        cur: 0.0,
        eff: 0.0,
        result: 0,
    };

    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        Verdict::from_raw(self.result)
    }

    /// Render one field as it appears on disk.
    #[must_use]
    pub fn field_text(&self, field: PatternField) -> String {
        let value = match field {
            PatternField::X => self.x,
            PatternField::Y => self.y,
            PatternField::U => self.u,
            PatternField::V => self.v,
            PatternField::L => self.l,
            PatternField::Cur => self.cur,
            PatternField::Eff => self.eff,
            PatternField::Result => return self.verdict().token().to_string(),
        };
        format_measure(value)
    }

    /// The seven EECP cells, each followed by a comma.
    #[must_use]
    pub fn eecp_cells(&self) -> String {
        PatternField::EECP
            .iter()
            .map(|field| format!("{},", self.field_text(*field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pattern {
        Pattern {
            x: 0.3127,
            y: 0.3290,
            u: 0.1978,
            v: 0.4683,
            l: 120.456,
            cur: 5.123,
            eff: 23.571,
            result: 0,
        }
    }

    #[test]
    fn eecp_cells_render_three_decimals() {
        assert_eq!(
            sample().eecp_cells(),
            "0.313,0.329,0.198,0.468,120.456,5.123,23.571,"
        );
    }

    #[test]
    fn placeholder_renders_zeros() {
        assert_eq!(
            Pattern::PLACEHOLDER.eecp_cells(),
            "0.000,0.000,0.000,0.000,0.000,0.000,0.000,"
        );
    }

    #[test]
    fn result_tokens() {
        let mut p = sample();
        assert_eq!(p.field_text(PatternField::Result), "OK");
        p.result = 1;
        assert_eq!(p.field_text(PatternField::Result), "NG");
        p.result = 7;
        assert_eq!(p.field_text(PatternField::Result), "PTN");
        p.result = -1;
        assert_eq!(p.verdict(), Verdict::NotApplicable);
    }

    #[test]
    fn deserializes_capital_l() {
        let p: Pattern = serde_json::from_str(r#"{"x":0.1,"L":250.0,"result":1}"#).unwrap();
        assert!((p.l - 250.0).abs() < f64::EPSILON);
        assert_eq!(p.verdict(), Verdict::Ng);
        assert!(p.eff.abs() < f64::EPSILON);
    }
}
