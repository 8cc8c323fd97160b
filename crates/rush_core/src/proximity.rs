//! Nearest-station lookup.

use crate::math::{Fixed, Vec2Fixed};
use crate::stations::{StationId, StationTable};

/// Find the station closest to `position` within `radius`.
///
/// Only stations strictly inside the radius qualify. On equal distance the
/// earlier station in layout order wins.
#[must_use]
pub fn nearest_station(
    stations: &StationTable,
    position: Vec2Fixed,
    radius: Fixed,
) -> Option<StationId> {
    let radius_sq = radius * radius;
    let mut best: Option<(StationId, Fixed)> = None;

    for station in stations.iter() {
        let dist_sq = position.distance_squared(station.position);
        if dist_sq >= radius_sq {
            continue;
        }
        if best.map_or(true, |(_, d)| dist_sq < d) {
            best = Some((station.id, dist_sq));
        }
    }

    best.map(|(id, _)| id)
}
