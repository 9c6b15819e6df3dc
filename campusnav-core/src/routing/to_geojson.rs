use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::Route;
use crate::{
    Error,
    model::{CampusGraph, Node, Position},
};

impl Route {
    /// Outdoor part of the route as a `GeoJSON` `FeatureCollection`
    ///
    /// One `LineString` per leg whose endpoints are both outdoor, then one
    /// `Point` per outdoor route node. Indoor legs have no geographic
    /// coordinates and are left out.
    ///
    /// # Errors
    ///
    /// `Error::UnknownNode` when the route was computed on another graph
    /// that had nodes this one lacks.
    pub fn to_geojson(&self, graph: &CampusGraph) -> Result<FeatureCollection, Error> {
        let mut features = Vec::new();

        for (idx, leg) in self.legs.iter().enumerate() {
            let (Position::Outdoor(from), Position::Outdoor(to)) = (
                &lookup(graph, &leg.from)?.position,
                &lookup(graph, &leg.to)?.position,
            ) else {
                continue;
            };

            let line = LineString::from(vec![(from.lng, from.lat), (to.lng, to.lat)]);
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new(GeoJsonValue::from(&line)),
                "properties": {
                    "feature_type": "leg",
                    "leg_index": idx,
                    "from": leg.from,
                    "to": leg.to,
                    "distance": leg.distance,
                    "bearing": leg.bearing,
                }
            });
            features.push(to_feature(value)?);
        }

        for (order, id) in self.node_ids.iter().enumerate() {
            let node = lookup(graph, id)?;
            let Position::Outdoor(position) = &node.position else {
                continue;
            };
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new(GeoJsonValue::from(&position.point())),
                "properties": {
                    "feature_type": "node",
                    "order": order,
                    "id": node.id,
                    "name": node.name,
                    "category": node.category,
                    "icon": node.icon(),
                }
            });
            features.push(to_feature(value)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, graph: &CampusGraph) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(graph)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn lookup<'a>(graph: &'a CampusGraph, id: &str) -> Result<&'a Node, Error> {
    graph
        .node_by_id(id)
        .ok_or_else(|| Error::UnknownNode(id.to_string()))
}

fn to_feature(value: serde_json::Value) -> Result<Feature, Error> {
    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
