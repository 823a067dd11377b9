//! Shadow and simulation settings resource.
//!
//! Loaded from an INI file at startup. Provides defaults for a safe start and
//! methods to load/save the configuration. Settings are read once when a
//! shadow is built and are not revalidated at runtime.
//!
//! # Configuration File Format
//!
//! ```ini
//! [shadow]
//! mode = floor
//! offset_x = 0.0
//! offset_y = 0.0
//! depth = 0.0
//! floor_depth = -0.08
//! floor_layer = 10
//! size_x = 1.0
//! size_y = 1.0
//! sorting_order = 0
//! scale_step = time_normalized
//! reference_hz = 50
//!
//! [simulation]
//! fixed_hz = 50
//! frames = 300
//! seed = 7
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

use crate::components::collisionlayer::MAX_LAYER;
use crate::components::shadow::{
    DEFAULT_FLOOR_DEPTH, DEFAULT_FLOOR_LAYER, DEFAULT_REFERENCE_HZ, ScaleStep, Shadow, ShadowMode,
};

const DEFAULT_FIXED_HZ: u32 = 50;
const DEFAULT_FRAMES: u32 = 300;
const DEFAULT_SEED: u64 = 7;
const DEFAULT_CONFIG_PATH: &str = "./shadow.ini";

/// Shadow configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct ShadowSettings {
    pub mode: ShadowMode,
    pub offset: Vec2,
    /// Depth used when stuck to the character.
    pub depth: f32,
    /// Depth used when projected on the floor.
    pub floor_depth: f32,
    pub floor_layer: u8,
    /// Full (grounded) scale.
    pub size: Vec2,
    pub sorting_order: i32,
    pub scale_step: ScaleStep,
    /// Fixed simulation rate in ticks per second.
    pub fixed_hz: u32,
    /// Ticks to simulate in the headless driver.
    pub frames: u32,
    /// Seed for the demo character's jump timings.
    pub seed: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowSettings {
    /// Create settings with safe default values.
    pub fn new() -> Self {
        Self {
            mode: ShadowMode::ProjectedOnFloor,
            offset: Vec2::ZERO,
            depth: 0.0,
            floor_depth: DEFAULT_FLOOR_DEPTH,
            floor_layer: DEFAULT_FLOOR_LAYER,
            size: Vec2::ONE,
            sorting_order: 0,
            scale_step: ScaleStep::default(),
            fixed_hz: DEFAULT_FIXED_HZ,
            frames: DEFAULT_FRAMES,
            seed: DEFAULT_SEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create settings with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Tick length in seconds.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.fixed_hz.max(1) as f32
    }

    /// Build a [`Shadow`] component for `character` from these settings.
    pub fn build_shadow(&self, character: Option<Entity>) -> Shadow {
        let mut shadow = Shadow {
            character,
            ..Default::default()
        }
        .with_mode(self.mode)
        .with_offset(self.offset)
        .with_depth(self.depth)
        .with_floor_depth(self.floor_depth)
        .with_floor_layer(self.floor_layer)
        .with_size(self.size)
        .with_sorting_order(self.sorting_order)
        .with_scale_step(self.scale_step);
        if character.is_none() {
            shadow = shadow.detached();
        }
        shadow
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or a value is malformed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config)?;

        info!(
            "Loaded shadow config: mode={}, size={:?}, offset={:?}, layer={}, step={:?}, {} Hz",
            self.mode, self.size, self.offset, self.floor_layer, self.scale_step, self.fixed_hz
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config)
    }

    fn apply_ini(&mut self, config: &Ini) -> Result<(), String> {
        // [shadow] section
        if let Some(mode) = config.get("shadow", "mode") {
            self.mode = mode.parse()?;
        }
        if let Some(x) = config.getfloat("shadow", "offset_x")? {
            self.offset.x = x as f32;
        }
        if let Some(y) = config.getfloat("shadow", "offset_y")? {
            self.offset.y = y as f32;
        }
        if let Some(depth) = config.getfloat("shadow", "depth")? {
            self.depth = depth as f32;
        }
        if let Some(depth) = config.getfloat("shadow", "floor_depth")? {
            self.floor_depth = depth as f32;
        }
        if let Some(layer) = config.getuint("shadow", "floor_layer")? {
            self.floor_layer = u8::try_from(layer)
                .ok()
                .filter(|layer| *layer <= MAX_LAYER)
                .ok_or_else(|| format!("floor_layer {} out of range 0..={}", layer, MAX_LAYER))?;
        }
        if let Some(x) = config.getfloat("shadow", "size_x")? {
            self.size.x = x as f32;
        }
        if let Some(y) = config.getfloat("shadow", "size_y")? {
            self.size.y = y as f32;
        }
        if let Some(order) = config.getint("shadow", "sorting_order")? {
            self.sorting_order = i32::try_from(order)
                .map_err(|_| format!("sorting_order {} out of range", order))?;
        }
        let reference_hz = config
            .getfloat("shadow", "reference_hz")?
            .map(|hz| hz as f32)
            .unwrap_or(DEFAULT_REFERENCE_HZ);
        if let Some(step) = config.get("shadow", "scale_step") {
            self.scale_step = match step.trim().to_ascii_lowercase().as_str() {
                "per_call" => ScaleStep::PerCall,
                "time_normalized" => ScaleStep::TimeNormalized { reference_hz },
                other => return Err(format!("unknown scale_step '{}'", other)),
            };
        } else if let ScaleStep::TimeNormalized { .. } = self.scale_step {
            self.scale_step = ScaleStep::TimeNormalized { reference_hz };
        }

        // [simulation] section
        if let Some(hz) = config.getuint("simulation", "fixed_hz")? {
            self.fixed_hz =
                u32::try_from(hz).map_err(|_| format!("fixed_hz {} out of range", hz))?;
        }
        if let Some(frames) = config.getuint("simulation", "frames")? {
            self.frames =
                u32::try_from(frames).map_err(|_| format!("frames {} out of range", frames))?;
        }
        if let Some(seed) = config.getuint("simulation", "seed")? {
            self.seed = seed;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [shadow] section
        config.set("shadow", "mode", Some(self.mode.to_string()));
        config.set("shadow", "offset_x", Some(self.offset.x.to_string()));
        config.set("shadow", "offset_y", Some(self.offset.y.to_string()));
        config.set("shadow", "depth", Some(self.depth.to_string()));
        config.set("shadow", "floor_depth", Some(self.floor_depth.to_string()));
        config.set("shadow", "floor_layer", Some(self.floor_layer.to_string()));
        config.set("shadow", "size_x", Some(self.size.x.to_string()));
        config.set("shadow", "size_y", Some(self.size.y.to_string()));
        config.set("shadow", "sorting_order", Some(self.sorting_order.to_string()));
        match self.scale_step {
            ScaleStep::PerCall => {
                config.set("shadow", "scale_step", Some("per_call".to_string()));
            }
            ScaleStep::TimeNormalized { reference_hz } => {
                config.set("shadow", "scale_step", Some("time_normalized".to_string()));
                config.set("shadow", "reference_hz", Some(reference_hz.to_string()));
            }
        }

        // [simulation] section
        config.set("simulation", "fixed_hz", Some(self.fixed_hz.to_string()));
        config.set("simulation", "frames", Some(self.frames.to_string()));
        config.set("simulation", "seed", Some(self.seed.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_project_on_floor_layer_ten() {
        let s = ShadowSettings::new();
        assert_eq!(s.mode, ShadowMode::ProjectedOnFloor);
        assert_eq!(s.floor_layer, 10);
        assert_eq!(s.floor_depth, -0.08);
        assert_eq!(s.fixed_hz, 50);
        assert!((s.fixed_dt() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn missing_values_keep_defaults() {
        let mut s = ShadowSettings::new();
        s.load_from_str("[shadow]\nmode = stuck\noffset_y = -0.5\n")
            .unwrap();
        assert_eq!(s.mode, ShadowMode::StuckToCharacter);
        assert_eq!(s.offset, Vec2::new(0.0, -0.5));
        assert_eq!(s.size, Vec2::ONE);
        assert_eq!(s.frames, 300);
    }

    #[test]
    fn scale_step_parses_both_kinds() {
        let mut s = ShadowSettings::new();
        s.load_from_str("[shadow]\nscale_step = per_call\n").unwrap();
        assert_eq!(s.scale_step, ScaleStep::PerCall);

        s.load_from_str("[shadow]\nscale_step = time_normalized\nreference_hz = 60\n")
            .unwrap();
        assert_eq!(s.scale_step, ScaleStep::TimeNormalized { reference_hz: 60.0 });
    }

    #[test]
    fn malformed_values_are_errors() {
        let mut s = ShadowSettings::new();
        assert!(s.load_from_str("[shadow]\nmode = sideways\n").is_err());
        assert!(s.load_from_str("[shadow]\nfloor_layer = 999\n").is_err());
        assert!(s.load_from_str("[shadow]\nsize_x = big\n").is_err());
    }

    #[test]
    fn out_of_range_numbers_are_errors() {
        let mut s = ShadowSettings::new();
        assert!(s.load_from_str("[shadow]\nfloor_layer = 32\n").is_err());
        assert!(s.load_from_str("[shadow]\nfloor_layer = 200\n").is_err());
        assert!(s.load_from_str("[shadow]\nsorting_order = 3000000000\n").is_err());
        assert!(s.load_from_str("[simulation]\nfixed_hz = 5000000000\n").is_err());
        assert!(s.load_from_str("[simulation]\nframes = 5000000000\n").is_err());

        let mut s = ShadowSettings::new();
        s.load_from_str("[shadow]\nfloor_layer = 31\nsorting_order = -7\n")
            .unwrap();
        assert_eq!(s.floor_layer, 31);
        assert_eq!(s.sorting_order, -7);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut s = ShadowSettings::with_path("./definitely/not/here.ini");
        assert!(s.load_from_file().is_err());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = std::env::temp_dir().join(format!("dropshadow-{}.ini", std::process::id()));
        let mut s = ShadowSettings::with_path(&path);
        s.mode = ShadowMode::StuckToCharacter;
        s.offset = Vec2::new(0.25, -1.5);
        s.floor_layer = 3;
        s.sorting_order = -2;
        s.scale_step = ScaleStep::PerCall;
        s.fixed_hz = 60;
        s.save_to_file().unwrap();

        let mut loaded = ShadowSettings::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.mode, ShadowMode::StuckToCharacter);
        assert_eq!(loaded.offset, Vec2::new(0.25, -1.5));
        assert_eq!(loaded.floor_layer, 3);
        assert_eq!(loaded.sorting_order, -2);
        assert_eq!(loaded.scale_step, ScaleStep::PerCall);
        assert_eq!(loaded.fixed_hz, 60);
    }

    #[test]
    fn build_shadow_copies_settings() {
        let mut world = World::new();
        let character = world.spawn_empty().id();
        let mut s = ShadowSettings::new();
        s.size = Vec2::new(2.0, 0.5);
        s.floor_layer = 4;
        let shadow = s.build_shadow(Some(character));
        assert_eq!(shadow.character, Some(character));
        assert_eq!(shadow.size, Vec2::new(2.0, 0.5));
        assert_eq!(shadow.floor_layer, 4);
        assert!(shadow.despawn_with_character);

        assert!(!s.build_shadow(None).despawn_with_character);
    }
}
