//! Demo scene description.
//!
//! Floors and the demo character are described in JSON so scenes can be
//! tweaked without recompiling:
//!
//! ```json
//! {
//!   "gravity": -30.0,
//!   "floors": [
//!     { "x": -20.0, "y": 0.0, "width": 40.0, "height": 1.0 },
//!     { "x": 2.0, "y": 3.0, "width": 6.0, "height": 0.5, "layer": 10 }
//!   ],
//!   "character": { "x": -8.0, "y": 0.0, "jump_speed": 12.0 }
//! }
//! ```
//!
//! A floor's `(x, y)` is its top-left corner; the collider extends `height`
//! units down from there.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::shadow::DEFAULT_FLOOR_LAYER;

fn default_layer() -> u8 {
    DEFAULT_FLOOR_LAYER
}

fn default_gravity() -> f32 {
    -30.0
}

/// A static floor collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDesc {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_layer")]
    pub layer: u8,
}

/// The demo character and its pacing/jumping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterDesc {
    pub x: f32,
    pub y: f32,
    pub jump_speed: f32,
    pub walk_speed: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_wait: f32,
    pub max_wait: f32,
}

impl Default for CharacterDesc {
    fn default() -> Self {
        Self {
            x: -8.0,
            y: 0.0,
            jump_speed: 12.0,
            walk_speed: 3.0,
            min_x: -10.0,
            max_x: 10.0,
            min_wait: 0.3,
            max_wait: 1.5,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default)]
    pub floors: Vec<FloorDesc>,
    #[serde(default)]
    pub character: CharacterDesc,
}

impl Default for SceneDescription {
    /// A long ground floor with a raised platform in the middle of the
    /// character's pacing range.
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            floors: vec![
                FloorDesc {
                    x: -20.0,
                    y: 0.0,
                    width: 40.0,
                    height: 1.0,
                    layer: DEFAULT_FLOOR_LAYER,
                },
                FloorDesc {
                    x: 2.0,
                    y: 3.0,
                    width: 6.0,
                    height: 0.5,
                    layer: DEFAULT_FLOOR_LAYER,
                },
            ],
            character: CharacterDesc::default(),
        }
    }
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse scene: {}", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene {:?}: {}", path, e))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let scene = SceneDescription::from_json(
            r#"{ "floors": [ { "x": 0.0, "y": 1.0, "width": 5.0, "height": 1.0 } ],
                 "character": { "jump_speed": 20.0 } }"#,
        )
        .unwrap();
        assert_eq!(scene.gravity, -30.0);
        assert_eq!(scene.floors.len(), 1);
        assert_eq!(scene.floors[0].layer, DEFAULT_FLOOR_LAYER);
        assert_eq!(scene.character.jump_speed, 20.0);
        assert_eq!(scene.character.walk_speed, 3.0);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(SceneDescription::from_json("{ floors: nope }").is_err());
        assert!(SceneDescription::load("./no/such/scene.json").is_err());
    }
}
