//! Types for the sheet module.

use serde::{Deserialize, Serialize};

use super::error::SheetError;

/// A query together with its result slot.
///
/// The analysis writes the result exactly once; the source reads it after the
/// sheet has been handed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query<P> {
    /// Query parameter (threshold, volume or band).
    pub param: P,
    /// Area of the largest qualifying rectangle, once analyzed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<usize>,
}

impl<P> Query<P> {
    /// Creates an unanswered query.
    pub fn new(param: P) -> Self {
        Self {
            param,
            result: None,
        }
    }

    /// Writes the result slot.
    pub fn record(&mut self, area: usize) {
        debug_assert!(
            self.result.is_none(),
            "query result written twice (previous: {:?}, new: {})",
            self.result,
            area
        );
        self.result = Some(area);
    }

    /// The recorded area, if the query has been answered.
    pub fn result(&self) -> Option<usize> {
        self.result
    }

    /// Whether the query has been answered.
    pub fn is_answered(&self) -> bool {
        self.result.is_some()
    }
}

/// Inclusive thickness band used by min/max queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeRecord")]
pub struct ThicknessRange {
    lo: i32,
    hi: i32,
}

#[derive(Deserialize)]
struct RangeRecord {
    lo: i32,
    hi: i32,
}

impl TryFrom<RangeRecord> for ThicknessRange {
    type Error = SheetError;

    fn try_from(record: RangeRecord) -> Result<Self, Self::Error> {
        Self::new(record.lo, record.hi)
    }
}

impl ThicknessRange {
    /// Creates a band, rejecting `lo > hi`.
    pub fn new(lo: i32, hi: i32) -> Result<Self, SheetError> {
        if lo > hi {
            return Err(SheetError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    /// Whether `value` lies inside the band.
    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// One work item produced by a production line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SheetRecord")]
pub struct Sheet {
    id: u64,
    width: usize,
    length: usize,
    thickness: Vec<i32>,
    /// Relative-deviation queries.
    pub rel_dev: Vec<Query<f64>>,
    /// Volume queries.
    pub volume: Vec<Query<i64>>,
    /// Min/max band queries.
    pub min_max: Vec<Query<ThicknessRange>>,
}

/// Wire shape of a sheet, validated into [`Sheet`] on deserialization.
#[derive(Deserialize)]
struct SheetRecord {
    id: u64,
    width: usize,
    length: usize,
    thickness: Vec<i32>,
    #[serde(default)]
    rel_dev: Vec<Query<f64>>,
    #[serde(default)]
    volume: Vec<Query<i64>>,
    #[serde(default)]
    min_max: Vec<Query<ThicknessRange>>,
}

impl TryFrom<SheetRecord> for Sheet {
    type Error = SheetError;

    fn try_from(record: SheetRecord) -> Result<Self, Self::Error> {
        let mut sheet = Sheet::new(record.id, record.width, record.length, record.thickness)?;
        sheet.rel_dev = record.rel_dev;
        sheet.volume = record.volume;
        sheet.min_max = record.min_max;
        Ok(sheet)
    }
}

impl Sheet {
    /// Creates a sheet without queries.
    ///
    /// `thickness` is row-major: `length` rows of `width` values each.
    pub fn new(
        id: u64,
        width: usize,
        length: usize,
        thickness: Vec<i32>,
    ) -> Result<Self, SheetError> {
        if width == 0 || length == 0 {
            return Err(SheetError::EmptyGrid { id, width, length });
        }
        let expected = width
            .checked_mul(length)
            .ok_or(SheetError::GridTooLarge { id, width, length })?;
        if thickness.len() != expected {
            return Err(SheetError::DimensionMismatch {
                id,
                expected,
                actual: thickness.len(),
            });
        }

        Ok(Self {
            id,
            width,
            length,
            thickness,
            rel_dev: Vec::new(),
            volume: Vec::new(),
            min_max: Vec::new(),
        })
    }

    /// Adds a relative-deviation query.
    pub fn with_rel_dev(mut self, threshold: f64) -> Self {
        self.rel_dev.push(Query::new(threshold));
        self
    }

    /// Adds a volume query.
    pub fn with_volume(mut self, volume: i64) -> Self {
        self.volume.push(Query::new(volume));
        self
    }

    /// Adds a min/max band query.
    pub fn with_min_max(mut self, range: ThicknessRange) -> Self {
        self.min_max.push(Query::new(range));
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn thickness(&self) -> &[i32] {
        &self.thickness
    }

    /// Total number of queries across all kinds.
    pub fn query_count(&self) -> usize {
        self.rel_dev.len() + self.volume.len() + self.min_max.len()
    }

    /// True once every query carries a result.
    pub fn is_analyzed(&self) -> bool {
        self.rel_dev.iter().all(Query::is_answered)
            && self.volume.iter().all(Query::is_answered)
            && self.min_max.iter().all(Query::is_answered)
    }
}
