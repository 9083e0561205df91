use rand::Rng;

use crate::material::MaterialId;

/// Static point cloud.
///
/// Positions are generated once; the buffer is never written afterwards. The
/// update flag asks the renderer to re-upload the buffer on its next pass.
#[derive(Debug, Clone)]
pub struct Particles {
    /// Flat `x, y, z` triples.
    positions: Vec<f32>,
    pub material: MaterialId,
    needs_update: bool,
}

impl Particles {
    /// Scatters `count` points uniformly: x and z in `[-spread/2, spread/2)`,
    /// y in `(y_min, y_max]`.
    pub fn scatter<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        spread: f32,
        y_range: (f32, f32),
        material: MaterialId,
    ) -> Self {
        let (y_min, y_max) = y_range;
        let height = y_max - y_min;

        let mut positions = Vec::with_capacity(count * 3);
        for _ in 0..count {
            positions.push((rng.random::<f32>() - 0.5) * spread);
            positions.push(y_max - rng.random::<f32>() * height);
            positions.push((rng.random::<f32>() - 0.5) * spread);
        }

        Self { positions, material, needs_update: true }
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }

    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Returns the flag and clears it; called by the renderer after uploading.
    #[inline]
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::replace(&mut self.needs_update, false)
    }
}
