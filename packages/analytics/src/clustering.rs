//! Radius-based density clustering of approved businesses.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use permit_analytics_models::{
    Cluster, ClusterBusiness, ClusterMode, ClusterParams, ClusterReport, ClusterStatistics,
};
use permit_compliance_models::Business;
use permit_geometry::{centroid_of, distance_meters};
use permit_geometry_models::Point;
use permit_zoning_models::BusinessCategory;

use crate::AnalyticsError;

/// Builds clustering rows from stored businesses.
///
/// Keeps approved businesses only and replaces category ids with category
/// names, falling back to the id when the category is not in `categories`.
#[must_use]
pub fn cluster_inputs(
    businesses: &[Business],
    categories: &[BusinessCategory],
) -> Vec<ClusterBusiness> {
    let names: BTreeMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    businesses
        .iter()
        .filter(|b| b.is_approved())
        .map(|b| ClusterBusiness {
            id: b.id.clone(),
            business_name: b.business_name.clone(),
            category: names
                .get(b.category_id.as_str())
                .map_or_else(|| b.category_id.clone(), |name| (*name).to_string()),
            barangay: b.barangay.clone(),
            location: b.location,
        })
        .collect()
}

/// Groups businesses into density clusters.
///
/// Two businesses are neighbours when their haversine distance is at most
/// `params.radius_meters`. Groups smaller than `params.min_points` are
/// dropped. Businesses with invalid locations are skipped.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParams`] if the radius is not a
/// positive finite number or `min_points` is zero.
pub fn analyze_clusters(
    businesses: &[ClusterBusiness],
    params: &ClusterParams,
) -> Result<ClusterReport, AnalyticsError> {
    if !params.radius_meters.is_finite() || params.radius_meters <= 0.0 {
        return Err(AnalyticsError::InvalidParams {
            message: format!("radius must be positive, got {}", params.radius_meters),
        });
    }
    if params.min_points == 0 {
        return Err(AnalyticsError::InvalidParams {
            message: "min_points must be at least 1".to_string(),
        });
    }

    let points: Vec<&ClusterBusiness> = businesses
        .iter()
        .filter(|b| b.location.is_valid())
        .collect();

    let skipped = businesses.len() - points.len();
    if skipped > 0 {
        log::warn!("Skipping {skipped} businesses with invalid locations");
    }

    let groups = match params.mode {
        ClusterMode::Legacy => legacy_groups(&points, params.radius_meters, params.min_points),
        ClusterMode::Connected => {
            connected_groups(&points, params.radius_meters, params.min_points)
        }
    };

    let clusters: Vec<Cluster> = groups
        .into_iter()
        .enumerate()
        .map(|(i, members)| build_cluster(i + 1, &points, &members))
        .collect();

    let statistics = statistics(&clusters, points.len());

    log::info!(
        "Found {} clusters covering {} of {} businesses ({:?} mode)",
        statistics.total_clusters,
        statistics.clustered_businesses,
        statistics.total_businesses,
        params.mode
    );

    Ok(ClusterReport {
        clusters,
        statistics,
    })
}

fn within(a: &ClusterBusiness, b: &ClusterBusiness, radius: f64) -> bool {
    distance_meters(a.location, b.location) <= radius
}

/// Single pass: the seed claims later unvisited points near itself.
/// Claimed points stay visited whether or not the group is kept.
fn legacy_groups(points: &[&ClusterBusiness], radius: f64, min_points: usize) -> Vec<Vec<usize>> {
    let mut visited = vec![false; points.len()];
    let mut groups = Vec::new();

    for seed in 0..points.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let mut members = vec![seed];
        for other in (seed + 1)..points.len() {
            if !visited[other] && within(points[seed], points[other], radius) {
                visited[other] = true;
                members.push(other);
            }
        }

        if members.len() >= min_points {
            groups.push(members);
        }
    }

    groups
}

/// Connected components of the radius graph, discovered breadth-first in
/// seed order. Components are disjoint, so a component that is too small
/// never shadows a point that could join a bigger one.
fn connected_groups(
    points: &[&ClusterBusiness],
    radius: f64,
    min_points: usize,
) -> Vec<Vec<usize>> {
    let mut explored = vec![false; points.len()];
    let mut groups = Vec::new();

    for seed in 0..points.len() {
        if explored[seed] {
            continue;
        }
        explored[seed] = true;

        let mut members = vec![seed];
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            for other in 0..points.len() {
                if !explored[other] && within(points[current], points[other], radius) {
                    explored[other] = true;
                    members.push(other);
                    queue.push_back(other);
                }
            }
        }

        if members.len() >= min_points {
            members.sort_unstable();
            groups.push(members);
        }
    }

    groups
}

fn build_cluster(id: usize, points: &[&ClusterBusiness], members: &[usize]) -> Cluster {
    let businesses: Vec<ClusterBusiness> = members.iter().map(|&m| points[m].clone()).collect();
    let locations: Vec<Point> = businesses.iter().map(|b| b.location).collect();

    let categories: BTreeSet<&str> = businesses.iter().map(|b| b.category.as_str()).collect();
    let barangays: BTreeSet<&str> = businesses
        .iter()
        .filter_map(|b| b.barangay.as_deref())
        .collect();

    Cluster {
        id,
        business_count: businesses.len(),
        center: centroid_of(&locations).unwrap_or_else(|| locations[0]),
        categories: categories.into_iter().map(str::to_string).collect(),
        barangays: barangays.into_iter().map(str::to_string).collect(),
        businesses,
    }
}

#[allow(clippy::cast_precision_loss)]
fn statistics(clusters: &[Cluster], total_businesses: usize) -> ClusterStatistics {
    let clustered_businesses: usize = clusters.iter().map(|c| c.business_count).sum();

    let average_cluster_size = if clusters.is_empty() {
        0.0
    } else {
        let mean = clustered_businesses as f64 / clusters.len() as f64;
        (mean * 100.0).round() / 100.0
    };

    ClusterStatistics {
        total_clusters: clusters.len(),
        total_businesses,
        clustered_businesses,
        average_cluster_size,
    }
}
