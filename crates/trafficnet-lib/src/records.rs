//! Flat delimited record formats for the road network, closures, traffic
//! signals, and vehicles.
//!
//! Every file starts with a header row that is skipped; fields are read by
//! position. Rows with missing or unparsable fields are skipped and counted
//! in the returned [`LoadReport`].

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::{debug, warn};

use crate::closures::{ClosureRegistry, ClosureStatus};
use crate::error::Result;
use crate::graph::{Graph, IntersectionId, TravelTime, MAX_TRAVEL_TIME};
use crate::signals::Vehicle;

pub const ROAD_HEADER: [&str; 3] = ["Source", "Destination", "TravelTime"];
pub const CLOSURE_HEADER: [&str; 3] = ["Intersection1", "Intersection2", "Status"];
pub const VEHICLE_HEADER: [&str; 3] = ["VehicleID", "Start", "End"];

/// Road row: an undirected road between two intersections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadRecord {
    pub source: IntersectionId,
    pub destination: IntersectionId,
    pub travel_time: TravelTime,
}

/// Closure row: a pair of intersections and its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureRecord {
    pub first: IntersectionId,
    pub second: IntersectionId,
    pub status: ClosureStatus,
}

/// Signal row: green time of the signal at an intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRecord {
    pub intersection: IntersectionId,
    pub green_time: TravelTime,
}

/// Vehicle row: a vehicle travelling between two intersections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    pub id: String,
    pub start: IntersectionId,
    pub end: IntersectionId,
}

/// Summary of a record file read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

pub fn read_roads<R: Read>(reader: R) -> Result<(Vec<RoadRecord>, LoadReport)> {
    read_records(reader, "road", |record| {
        Some(RoadRecord {
            source: identifier(record, 0)?,
            destination: identifier(record, 1)?,
            travel_time: number(record, 2).filter(|time| *time <= MAX_TRAVEL_TIME)?,
        })
    })
}

pub fn read_closures<R: Read>(reader: R) -> Result<(Vec<ClosureRecord>, LoadReport)> {
    read_records(reader, "closure", |record| {
        let status = record.get(2).unwrap_or_default().parse().ok()?;
        Some(ClosureRecord {
            first: identifier(record, 0)?,
            second: identifier(record, 1)?,
            status,
        })
    })
}

pub fn read_signals<R: Read>(reader: R) -> Result<(Vec<SignalRecord>, LoadReport)> {
    read_records(reader, "signal", |record| {
        Some(SignalRecord {
            intersection: identifier(record, 0)?,
            green_time: number(record, 1)?,
        })
    })
}

pub fn read_vehicles<R: Read>(reader: R) -> Result<(Vec<VehicleRecord>, LoadReport)> {
    read_records(reader, "vehicle", |record| {
        Some(VehicleRecord {
            id: identifier(record, 0)?,
            start: identifier(record, 1)?,
            end: identifier(record, 2)?,
        })
    })
}

/// Write every undirected road once, ordered by source then destination.
pub fn write_roads<W: Write>(writer: W, graph: &Graph) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(ROAD_HEADER)?;
    for road in graph.roads() {
        csv_writer.write_record([
            road.source.as_str(),
            road.destination.as_str(),
            road.travel_time.to_string().as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write every closure record, active or not, in registry order.
pub fn write_closures<W: Write>(writer: W, closures: &ClosureRegistry) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(CLOSURE_HEADER)?;
    for closure in closures.records() {
        csv_writer.write_record([
            closure.first.as_str(),
            closure.second.as_str(),
            closure.status.to_string().as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_vehicles<W: Write>(writer: W, vehicles: &[Vehicle]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(VEHICLE_HEADER)?;
    for vehicle in vehicles {
        csv_writer.write_record([
            vehicle.id.as_str(),
            vehicle.start.as_str(),
            vehicle.end.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn read_records<R, T, F>(reader: R, kind: &'static str, parse: F) -> Result<(Vec<T>, LoadReport)>
where
    R: Read,
    F: Fn(&StringRecord) -> Option<T>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut report = LoadReport::default();
    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        match parse(&record) {
            Some(row) => {
                rows.push(row);
                report.loaded += 1;
            }
            None => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!(kind, line, "skipping malformed {} record", kind);
                report.skipped += 1;
            }
        }
    }

    debug!(kind, loaded = report.loaded, skipped = report.skipped, "records read");
    Ok((rows, report))
}

fn identifier(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn number(record: &StringRecord, index: usize) -> Option<TravelTime> {
    record.get(index)?.parse().ok()
}
