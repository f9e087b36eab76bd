//! Traffic signals and the vehicles whose destinations load them.
//!
//! Signal green times double as the heuristic table for emergency routing,
//! see [`SignalBoard::heuristics`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::debug;

use crate::graph::{IntersectionId, TravelTime};
use crate::matrix::HeuristicTable;
use crate::records::{SignalRecord, VehicleRecord};

/// Default green-time reduction applied per vehicle of density.
pub const DEFAULT_GREEN_TIME_FACTOR: TravelTime = 2;

/// Signal state for one intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficSignal {
    pub intersection: IntersectionId,
    pub green_time: TravelTime,
    /// Number of vehicles heading to this intersection.
    pub density: usize,
}

/// A vehicle travelling between two intersections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub id: String,
    pub start: IntersectionId,
    pub end: IntersectionId,
}

impl From<VehicleRecord> for Vehicle {
    fn from(record: VehicleRecord) -> Self {
        Self {
            id: record.id,
            start: record.start,
            end: record.end,
        }
    }
}

/// Collection of traffic signals in load order.
#[derive(Debug, Clone, Default)]
pub struct SignalBoard {
    signals: Vec<TrafficSignal>,
}

impl SignalBoard {
    pub fn from_records(records: impl IntoIterator<Item = SignalRecord>) -> Self {
        let mut board = Self::default();
        for record in records {
            board.set_green_time(&record.intersection, record.green_time);
        }
        board
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn signals(&self) -> &[TrafficSignal] {
        &self.signals
    }

    pub fn get(&self, intersection: &str) -> Option<&TrafficSignal> {
        self.signals
            .iter()
            .find(|signal| signal.intersection == intersection)
    }

    /// Set the green time of a signal, adding the signal if it is new.
    pub fn set_green_time(&mut self, intersection: &str, green_time: TravelTime) {
        match self
            .signals
            .iter_mut()
            .find(|signal| signal.intersection == intersection)
        {
            Some(signal) => signal.green_time = green_time,
            None => self.signals.push(TrafficSignal {
                intersection: intersection.to_string(),
                green_time,
                density: 0,
            }),
        }
    }

    /// Recount densities from scratch: each vehicle adds one to the signal
    /// at its destination. Vehicles heading to unsignalled intersections are
    /// ignored.
    pub fn apply_vehicle_density<'a>(&mut self, vehicles: impl IntoIterator<Item = &'a Vehicle>) {
        for signal in &mut self.signals {
            signal.density = 0;
        }
        for vehicle in vehicles {
            if let Some(signal) = self
                .signals
                .iter_mut()
                .find(|signal| signal.intersection == vehicle.end)
            {
                signal.density += 1;
            }
        }
    }

    /// Shorten every green time by `density * factor`, clamped at zero.
    pub fn adjust_green_times(&mut self, factor: TravelTime) {
        for signal in &mut self.signals {
            let reduction = (signal.density as TravelTime).saturating_mul(factor);
            signal.green_time = signal.green_time.saturating_sub(reduction);
            debug!(
                intersection = %signal.intersection,
                green_time = signal.green_time,
                "adjusted green time"
            );
        }
    }

    /// Signals ordered by density, busiest first. Equal densities are ordered
    /// by intersection identifier.
    pub fn by_density(&self) -> Vec<&TrafficSignal> {
        let mut heap: BinaryHeap<DensityEntry<'_>> =
            self.signals.iter().map(DensityEntry).collect();
        let mut ordered = Vec::with_capacity(heap.len());
        while let Some(DensityEntry(signal)) = heap.pop() {
            ordered.push(signal);
        }
        ordered
    }

    /// Heuristic table built from the current green times.
    pub fn heuristics(&self) -> HeuristicTable {
        self.signals
            .iter()
            .map(|signal| (signal.intersection.clone(), signal.green_time))
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct DensityEntry<'a>(&'a TrafficSignal);

impl Ord for DensityEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .density
            .cmp(&other.0.density)
            .then_with(|| other.0.intersection.cmp(&self.0.intersection))
    }
}

impl PartialOrd for DensityEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
