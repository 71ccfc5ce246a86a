#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hotspot clustering and severity aggregation for the road safety map.
//!
//! The map view draws one circle per cluster of nearby accidents. Records
//! are grouped by their coordinates rounded to three decimal places
//! (roughly 100 m), and each cluster's circle grows with the square root of
//! its size up to a fixed cap.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike as _, NaiveDate};
use road_safety_accident_models::{AccidentRecord, Severity};
use serde::Serialize;

/// Decimal places kept when grouping coordinates.
pub const CLUSTER_PRECISION: i32 = 3;

/// Circle radius per square root of the cluster size.
const RADIUS_METERS_PER_SQRT: f64 = 2000.0;

/// Largest circle drawn for any cluster.
pub const MAX_RADIUS_METERS: f64 = 20_000.0;

/// Accidents sharing the same rounded location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotCluster {
    /// Latitude of the first record in the cluster.
    pub latitude: f64,
    /// Longitude of the first record in the cluster.
    pub longitude: f64,
    /// Number of records in the cluster.
    pub count: u64,
    /// Distinct severities present.
    pub severities: BTreeSet<Severity>,
}

impl HotspotCluster {
    /// The worst severity in the cluster.
    #[must_use]
    pub fn most_severe(&self) -> Severity {
        self.severities
            .last()
            .copied()
            .unwrap_or(Severity::Slight)
    }

    /// Circle radius in metres.
    #[must_use]
    pub fn radius_meters(&self) -> f64 {
        radius_for_count(self.count)
    }

    /// Fill colour for the circle.
    #[must_use]
    pub fn color(&self) -> &'static str {
        self.most_severe().color()
    }
}

/// Circle radius, in metres, for a cluster of `count` accidents.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn radius_for_count(count: u64) -> f64 {
    ((count as f64).sqrt() * RADIUS_METERS_PER_SQRT).min(MAX_RADIUS_METERS)
}

#[allow(clippy::cast_possible_truncation)]
fn grid_key(value: f64) -> i64 {
    let scale = 10f64.powi(CLUSTER_PRECISION);
    (value * scale).round() as i64
}

/// Groups records by rounded coordinates, in order of first appearance.
///
/// Records with non-finite coordinates are skipped.
#[must_use]
pub fn cluster_hotspots(records: &[AccidentRecord]) -> Vec<HotspotCluster> {
    let mut index: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    let mut clusters: Vec<HotspotCluster> = Vec::new();

    for record in records {
        if !record.has_valid_coordinates() {
            log::warn!("Skipping hotspot {} with invalid coordinates", record.id);
            continue;
        }

        let key = (grid_key(record.latitude), grid_key(record.longitude));
        if let Some(&i) = index.get(&key) {
            let cluster = &mut clusters[i];
            cluster.count += 1;
            cluster.severities.insert(record.severity);
        } else {
            index.insert(key, clusters.len());
            clusters.push(HotspotCluster {
                latitude: record.latitude,
                longitude: record.longitude,
                count: 1,
                severities: BTreeSet::from([record.severity]),
            });
        }
    }

    clusters
}

/// South-west and north-east corners enclosing a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Smallest box containing every record, or `None` for an empty slice.
#[must_use]
pub fn bounds(records: &[AccidentRecord]) -> Option<Bounds> {
    records
        .iter()
        .filter(|r| r.has_valid_coordinates())
        .fold(None, |acc: Option<Bounds>, r| {
            Some(acc.map_or(
                Bounds {
                    south: r.latitude,
                    west: r.longitude,
                    north: r.latitude,
                    east: r.longitude,
                },
                |b| Bounds {
                    south: b.south.min(r.latitude),
                    west: b.west.min(r.longitude),
                    north: b.north.max(r.latitude),
                    east: b.east.max(r.longitude),
                },
            ))
        })
}

/// Number of records per severity. Every severity is present, possibly
/// with a zero count.
#[must_use]
pub fn severity_breakdown(records: &[AccidentRecord]) -> BTreeMap<Severity, u64> {
    let mut counts: BTreeMap<Severity, u64> =
        Severity::all().iter().map(|s| (*s, 0)).collect();
    for record in records {
        *counts.entry(record.severity).or_default() += 1;
    }
    counts
}

/// Accident counts per severity for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlySeverity {
    pub year: i32,
    /// Month of the year, 1-12.
    pub month: u32,
    pub slight: u64,
    pub serious: u64,
    pub fatal: u64,
}

impl MonthlySeverity {
    const fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            slight: 0,
            serious: 0,
            fatal: 0,
        }
    }

    #[must_use]
    pub const fn count_for(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Slight => self.slight,
            Severity::Serious => self.serious,
            Severity::Fatal => self.fatal,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.slight + self.serious + self.fatal
    }

    /// Short label such as `Mar 2026`.
    #[must_use]
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).map_or_else(
            || format!("{}-{:02}", self.year, self.month),
            |d| d.format("%b %Y").to_string(),
        )
    }
}

/// Severity counts grouped by the calendar month (UTC) of each record,
/// oldest month first. Months without records are omitted.
#[must_use]
pub fn monthly_breakdown(records: &[AccidentRecord]) -> Vec<MonthlySeverity> {
    let mut months: BTreeMap<(i32, u32), MonthlySeverity> = BTreeMap::new();

    for record in records {
        let key = (record.date.year(), record.date.month());
        let entry = months
            .entry(key)
            .or_insert_with(|| MonthlySeverity::empty(key.0, key.1));
        match record.severity {
            Severity::Slight => entry.slight += 1,
            Severity::Serious => entry.serious += 1,
            Severity::Fatal => entry.fatal += 1,
        }
    }

    months.into_values().collect()
}

/// The `limit` most recent records, newest first.
#[must_use]
pub fn most_recent(records: &[AccidentRecord], limit: usize) -> Vec<&AccidentRecord> {
    let mut sorted: Vec<&AccidentRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone as _, Utc};

    use super::*;

    fn record(id: u64, latitude: f64, longitude: f64, severity: Severity) -> AccidentRecord {
        AccidentRecord {
            id,
            latitude,
            longitude,
            severity,
            date: Utc::now() - Duration::days(i64::try_from(id).unwrap()),
            weather: "Clear".to_string(),
            road_type: "Local".to_string(),
        }
    }

    #[test]
    fn nearby_records_share_a_cluster() {
        let records = [
            record(1, 51.50741, -0.12781, Severity::Slight),
            record(2, 51.50738, -0.12779, Severity::Fatal),
            record(3, 51.52, -0.10, Severity::Serious),
        ];

        let clusters = cluster_hotspots(&records);
        assert_eq!(clusters.len(), 2);

        let first = &clusters[0];
        assert_eq!(first.count, 2);
        assert!((first.latitude - 51.50741).abs() < f64::EPSILON);
        assert_eq!(first.most_severe(), Severity::Fatal);
        assert_eq!(first.color(), "#dc3545");

        assert_eq!(clusters[1].count, 1);
        assert_eq!(clusters[1].most_severe(), Severity::Serious);
    }

    #[test]
    fn invalid_coordinates_are_skipped() {
        let records = [
            record(1, f64::NAN, 0.0, Severity::Slight),
            record(2, 1.0, f64::INFINITY, Severity::Slight),
        ];
        assert!(cluster_hotspots(&records).is_empty());
        assert_eq!(bounds(&records), None);
    }

    #[test]
    fn radius_grows_with_sqrt_and_caps() {
        assert!((radius_for_count(1) - 2000.0).abs() < 1e-9);
        assert!((radius_for_count(4) - 4000.0).abs() < 1e-9);
        assert!((radius_for_count(100) - MAX_RADIUS_METERS).abs() < 1e-9);
        assert!((radius_for_count(10_000) - MAX_RADIUS_METERS).abs() < 1e-9);
    }

    #[test]
    fn bounds_enclose_all_records() {
        assert_eq!(bounds(&[]), None);

        let records = [
            record(1, 51.5, -0.2, Severity::Slight),
            record(2, 51.6, -0.1, Severity::Slight),
            record(3, 51.4, -0.15, Severity::Slight),
        ];
        let b = bounds(&records).unwrap();
        assert!((b.south - 51.4).abs() < f64::EPSILON);
        assert!((b.north - 51.6).abs() < f64::EPSILON);
        assert!((b.west - -0.2).abs() < f64::EPSILON);
        assert!((b.east - -0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn breakdown_counts_every_severity() {
        let records = [
            record(1, 0.0, 0.0, Severity::Fatal),
            record(2, 0.0, 0.0, Severity::Fatal),
            record(3, 0.0, 0.0, Severity::Slight),
        ];
        let counts = severity_breakdown(&records);
        assert_eq!(counts[&Severity::Fatal], 2);
        assert_eq!(counts[&Severity::Serious], 0);
        assert_eq!(counts[&Severity::Slight], 1);
    }

    #[test]
    fn monthly_breakdown_groups_by_calendar_month() {
        let at = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        let mut records = vec![
            record(1, 0.0, 0.0, Severity::Fatal),
            record(2, 0.0, 0.0, Severity::Slight),
            record(3, 0.0, 0.0, Severity::Slight),
            record(4, 0.0, 0.0, Severity::Serious),
        ];
        records[0].date = at(2026, 3, 2);
        records[1].date = at(2026, 2, 28);
        records[2].date = at(2026, 3, 31);
        records[3].date = at(2025, 12, 15);

        let months = monthly_breakdown(&records);
        let labels: Vec<String> = months.iter().map(MonthlySeverity::label).collect();
        assert_eq!(labels, ["Dec 2025", "Feb 2026", "Mar 2026"]);

        let march = &months[2];
        assert_eq!(march.count_for(Severity::Fatal), 1);
        assert_eq!(march.count_for(Severity::Slight), 1);
        assert_eq!(march.total(), 2);
        assert_eq!(months.iter().map(MonthlySeverity::total).sum::<u64>(), 4);

        assert!(monthly_breakdown(&[]).is_empty());
    }

    #[test]
    fn most_recent_sorts_newest_first() {
        let records = [
            record(3, 0.0, 0.0, Severity::Slight),
            record(1, 0.0, 0.0, Severity::Slight),
            record(2, 0.0, 0.0, Severity::Slight),
        ];
        let ids: Vec<u64> = most_recent(&records, 2).iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2]);
    }
}
