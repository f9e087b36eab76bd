//! Road closure registry.
//!
//! Closures are a query-time filter: a blocked pair hides the roads between
//! two intersections from every search without removing them from the
//! [`Graph`](crate::graph::Graph). Pairs are unordered, so blocking `A`-`B`
//! also blocks `B`-`A`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::IntersectionId;

/// Status text that marks a closure record as active.
pub const BLOCKED_STATUS: &str = "Blocked";

/// Status of a closure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureStatus {
    Blocked,
    /// Any other status string, kept verbatim so it survives a rewrite.
    Other(String),
}

impl ClosureStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, ClosureStatus::Blocked)
    }
}

impl FromStr for ClosureStatus {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed == BLOCKED_STATUS {
            Ok(ClosureStatus::Blocked)
        } else {
            Ok(ClosureStatus::Other(trimmed.to_string()))
        }
    }
}

impl fmt::Display for ClosureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosureStatus::Blocked => f.write_str(BLOCKED_STATUS),
            ClosureStatus::Other(status) => f.write_str(status),
        }
    }
}

/// A closure record for an unordered pair of intersections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadClosure {
    pub first: IntersectionId,
    pub second: IntersectionId,
    pub status: ClosureStatus,
}

impl RoadClosure {
    /// Whether this record refers to the pair, in either direction.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Registry of closure records, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ClosureRegistry {
    records: Vec<RoadClosure>,
    max_records: Option<usize>,
}

impl ClosureRegistry {
    pub fn with_limit(max_records: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            max_records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mark the pair as blocked.
    ///
    /// An existing record for the pair is switched to blocked in place;
    /// otherwise a new blocked record is appended.
    pub fn block(&mut self, a: &str, b: &str) -> Result<()> {
        if let Some(existing) = self.records.iter_mut().find(|record| record.matches(a, b)) {
            existing.status = ClosureStatus::Blocked;
            return Ok(());
        }
        self.push(a, b, ClosureStatus::Blocked)
    }

    /// Append a record as read from persisted closure data.
    pub fn record(&mut self, a: &str, b: &str, status: ClosureStatus) -> Result<()> {
        self.push(a, b, status)
    }

    /// Whether an active blocked record exists for the pair.
    pub fn is_blocked(&self, a: &str, b: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.status.is_blocked() && record.matches(a, b))
    }

    /// All records, including inactive ones.
    pub fn records(&self) -> &[RoadClosure] {
        &self.records
    }

    /// Records currently blocking a road.
    pub fn blocked(&self) -> impl Iterator<Item = &RoadClosure> {
        self.records.iter().filter(|record| record.status.is_blocked())
    }

    fn push(&mut self, a: &str, b: &str, status: ClosureStatus) -> Result<()> {
        if let Some(limit) = self.max_records {
            if self.records.len() >= limit {
                return Err(Error::CapacityExceeded {
                    what: "road closure",
                    limit,
                });
            }
        }
        self.records.push(RoadClosure {
            first: a.to_string(),
            second: b.to_string(),
            status,
        });
        Ok(())
    }
}
