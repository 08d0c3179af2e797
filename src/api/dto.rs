//! Wire formats of the HTTP surface.

use crate::car::Car;
use crate::context::NetworkSetup;
use crate::junction::JunctionAttributes;
use crate::math::Point2d;
use crate::road::RoadAttributes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A 2-D point as a `[x, y]` pair.
pub type PointDto = [f64; 2];

fn to_points(points: &[PointDto]) -> Vec<Point2d> {
    points.iter().map(|[x, y]| Point2d::new(*x, *y)).collect()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JunctionDto {
    pub id: String,
    pub connected_roads_count: usize,
    pub connected_roads_ids: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub junction_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<PointDto>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoadDto {
    pub id: String,
    pub polyline: Vec<PointDto>,
    pub recommended_speed: f64,
    pub junction_start_id: String,
    pub junction_end_id: String,
}

/// The body of `POST /setup`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetupPayload {
    pub junctions: Vec<JunctionDto>,
    pub roads: Vec<RoadDto>,
    #[serde(default)]
    pub car_targets: HashMap<String, String>,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slowdown_zone: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slowdown_rate: Option<f64>,
}

/// A car's state as reported by the client. Unknown limits may be omitted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarDto {
    pub car_id: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    #[serde(default)]
    pub wheel_rotation: f64,
    pub rotation: f64,
    #[serde(default)]
    pub acceleration: f64,
    #[serde(default)]
    pub braking: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_road_id: Option<String>,
}

/// The body of `POST /dispatch`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatchPayload {
    pub algorithm_name: String,
    pub cars: Vec<CarDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_request_in_seconds: Option<f64>,
}

impl From<&JunctionDto> for JunctionAttributes {
    fn from(dto: &JunctionDto) -> Self {
        Self {
            id: dto.id.clone(),
            position: Point2d::new(dto.x, dto.y),
            junction_size: dto.junction_size,
            polygon: dto.polygon.as_deref().map(to_points),
            connected_roads_count: dto.connected_roads_count,
            connected_roads_ids: dto.connected_roads_ids.clone(),
        }
    }
}

impl From<&RoadDto> for RoadAttributes {
    fn from(dto: &RoadDto) -> Self {
        Self {
            id: dto.id.clone(),
            polyline: to_points(&dto.polyline),
            recommended_speed: dto.recommended_speed,
            junction_start_id: dto.junction_start_id.clone(),
            junction_end_id: dto.junction_end_id.clone(),
        }
    }
}

impl From<SetupPayload> for NetworkSetup {
    fn from(payload: SetupPayload) -> Self {
        Self {
            junctions: payload.junctions.iter().map(Into::into).collect(),
            roads: payload.roads.iter().map(Into::into).collect(),
            car_targets: payload.car_targets,
            overwrite: payload.overwrite,
            slowdown_zone: payload.slowdown_zone,
            slowdown_rate: payload.slowdown_rate,
        }
    }
}

impl From<CarDto> for Car {
    fn from(dto: CarDto) -> Self {
        Self {
            id: dto.car_id,
            position: Point2d::new(dto.x, dto.y),
            speed: dto.speed,
            wheel_rotation: dto.wheel_rotation,
            rotation: dto.rotation,
            acceleration: dto.acceleration,
            braking: dto.braking,
            target_road_id: dto.target_road_id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn setup_payload_defaults() {
        let payload: SetupPayload = serde_json::from_value(json!({
            "junctions": [{
                "id": "j", "connected_roads_count": 1, "connected_roads_ids": ["r"],
                "x": 1.0, "y": 2.0, "junction_size": 4.0,
                "polygon": [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]
            }],
            "roads": []
        }))
        .unwrap();
        assert!(!payload.overwrite);
        assert!(payload.car_targets.is_empty());

        let setup = NetworkSetup::from(payload);
        let junction = &setup.junctions[0];
        assert_eq!(junction.position, Point2d::new(1.0, 2.0));
        assert_eq!(
            junction.polygon.as_deref(),
            Some(&[Point2d::new(0.0, 0.0), Point2d::new(2.0, 0.0), Point2d::new(2.0, 2.0)][..])
        );
    }

    #[test]
    fn car_without_limits_or_target() {
        let dto: CarDto = serde_json::from_value(json!({
            "car_id": "c", "x": 3.0, "y": 4.0, "speed": 5.0, "rotation": 0.5
        }))
        .unwrap();
        let car = Car::from(dto);
        assert_eq!(car.id, "c");
        assert_eq!(car.braking, 0.0);
        assert_eq!(car.target_road_id, None);
    }
}
