//! Effective-dated record collections.
//!
//! An [`EffectiveHistory`] keeps records that each start applying on a given
//! date, sorted by that date, and answers "which record applies on day X".

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::SalarySetting;

/// A record that starts applying on a given date.
pub trait EffectiveDated {
    /// Inclusive date from which the record applies.
    fn effective_from(&self) -> NaiveDate;
}

impl EffectiveDated for SalarySetting {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
}

/// A sorted history of effective-dated records for one subject.
///
/// Effective dates are unique within a history.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{EffectiveDated, EffectiveHistory};
/// use chrono::NaiveDate;
///
/// #[derive(Debug, Clone)]
/// struct Rate(NaiveDate, u32);
///
/// impl EffectiveDated for Rate {
///     fn effective_from(&self) -> NaiveDate {
///         self.0
///     }
/// }
///
/// let jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let jul = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let history = EffectiveHistory::from_records("rates", vec![Rate(jul, 2), Rate(jan, 1)]).unwrap();
///
/// let march = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// assert_eq!(history.resolve_at(march).map(|r| r.1), Some(1));
/// assert!(history.resolve_at(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct EffectiveHistory<T> {
    subject: String,
    records: Vec<T>,
}

impl<T: EffectiveDated> EffectiveHistory<T> {
    /// Creates an empty history for a subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            records: Vec::new(),
        }
    }

    /// Builds a history from unsorted records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateEffectiveDate`] if two records share
    /// an effective date.
    pub fn from_records(subject: impl Into<String>, records: Vec<T>) -> EngineResult<Self> {
        let mut history = Self::new(subject);
        for record in records {
            history.insert(record)?;
        }
        Ok(history)
    }

    /// The subject the records belong to.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Inserts a record, keeping the history sorted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateEffectiveDate`] if a record with the
    /// same effective date already exists. The history is left unchanged.
    pub fn insert(&mut self, record: T) -> EngineResult<()> {
        let date = record.effective_from();
        match self
            .records
            .binary_search_by_key(&date, EffectiveDated::effective_from)
        {
            Ok(_) => Err(EngineError::DuplicateEffectiveDate {
                subject: self.subject.clone(),
                effective_from: date,
            }),
            Err(position) => {
                self.records.insert(position, record);
                Ok(())
            }
        }
    }

    /// Returns the record in force on `date`: the one with the latest
    /// effective date on or before it.
    pub fn resolve_at(&self, date: NaiveDate) -> Option<&T> {
        let applicable = self
            .records
            .partition_point(|record| record.effective_from() <= date);
        applicable.checked_sub(1).map(|index| &self.records[index])
    }

    /// Records that took effect on or before `date`, most recent first.
    pub fn applicable_up_to(&self, date: NaiveDate) -> impl Iterator<Item = &T> {
        let applicable = self
            .records
            .partition_point(|record| record.effective_from() <= date);
        self.records[..applicable].iter().rev()
    }

    /// All records in ascending effective-date order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the history holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
