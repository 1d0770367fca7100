//! GeoJSON export of query results for map rendering.

use crate::error::{CragmapError, Result};
use cragmap_types::cluster::ClusteredLocations;
use cragmap_types::location::LocationWithDistance;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};

fn point_feature(longitude: f64, latitude: f64, properties: Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// One Point feature per cluster, placed at the centroid.
///
/// Properties: `clusterId`, `pointCount` and `names` (member names in
/// cluster order).
pub fn clusters_to_feature_collection(clustered: &ClusteredLocations) -> FeatureCollection {
    let features = clustered
        .clusters
        .iter()
        .map(|cluster| {
            let mut props = Map::new();
            props.insert("clusterId".to_string(), json!(cluster.cluster_id));
            props.insert("pointCount".to_string(), json!(cluster.point_count));
            props.insert(
                "names".to_string(),
                json!(
                    cluster
                        .locations
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                ),
            );
            point_feature(cluster.longitude, cluster.latitude, props)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// One Point feature per nearby result, in result order.
///
/// Properties: `id`, `name`, `type`, `difficulty`, `distance` (meters).
pub fn locations_to_feature_collection(results: &[LocationWithDistance]) -> FeatureCollection {
    let features = results
        .iter()
        .map(|hit| {
            let loc = &hit.location;
            let mut props = Map::new();
            props.insert("id".to_string(), json!(loc.id.to_string()));
            props.insert("name".to_string(), json!(loc.name));
            props.insert("type".to_string(), json!(loc.kind.as_str()));
            props.insert("difficulty".to_string(), json!(loc.difficulty));
            props.insert("distance".to_string(), json!(hit.distance));
            point_feature(loc.longitude, loc.latitude, props)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn clusters_to_geojson_string(clustered: &ClusteredLocations) -> Result<String> {
    serde_json::to_string(&clusters_to_feature_collection(clustered)).map_err(|e| {
        CragmapError::Serialization(format!("Failed to serialize clusters: {}", e))
    })
}

pub fn locations_to_geojson_string(results: &[LocationWithDistance]) -> Result<String> {
    serde_json::to_string(&locations_to_feature_collection(results)).map_err(|e| {
        CragmapError::Serialization(format!("Failed to serialize locations: {}", e))
    })
}
