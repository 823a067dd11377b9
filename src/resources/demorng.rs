use bevy_ecs::prelude::Resource;

/// Seeded random source for the demo scene, so runs are reproducible.
#[derive(Resource, Debug, Clone)]
pub struct DemoRng(pub fastrand::Rng);

impl DemoRng {
    pub fn with_seed(seed: u64) -> Self {
        DemoRng(fastrand::Rng::with_seed(seed))
    }

    /// Uniform value in `[min, max)`; `min` when the range is empty.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.0.f32() * (max - min)
    }
}
