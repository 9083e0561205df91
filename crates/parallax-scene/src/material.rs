//! Materials and texture slots.
//!
//! Both live in small arenas owned by the scene and are referenced by copyable
//! handles, so several meshes can share one material without aliasing.

use std::path::PathBuf;

use crate::color::Color;

/// Handle into [`Materials`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle into [`Textures`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// An image asset referenced by materials. Pixels are loaded by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSlot {
    /// Path relative to the configured asset root.
    pub path: PathBuf,
    /// Magnification filter.
    pub filter: TextureFilter,
}

/// Cel-shaded material: diffuse lighting is quantized through a gradient map.
#[derive(Debug, Clone, PartialEq)]
pub struct ToonMaterial {
    pub color: Color,
    pub gradient_map: TextureId,
}

/// Sprite material for point clouds.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsMaterial {
    pub color: Color,
    /// Point size; world units when `size_attenuation` is set, pixels otherwise.
    pub size: f32,
    pub size_attenuation: bool,
    pub transparent: bool,
    /// Coverage mask sampled from the green channel.
    pub alpha_map: TextureId,
    pub depth_write: bool,
    pub depth_test: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Toon(ToonMaterial),
    Points(PointsMaterial),
}

impl Material {
    pub fn color(&self) -> Color {
        match self {
            Material::Toon(m) => m.color,
            Material::Points(m) => m.color,
        }
    }

    pub fn set_color(&mut self, color: Color) {
        match self {
            Material::Toon(m) => m.color = color,
            Material::Points(m) => m.color = color,
        }
    }

    pub fn as_toon(&self) -> Option<&ToonMaterial> {
        match self {
            Material::Toon(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&PointsMaterial> {
        match self {
            Material::Points(m) => Some(m),
            _ => None,
        }
    }
}

/// Material arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Materials {
    items: Vec<Material>,
}

impl Materials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.items.len() as u32);
        self.items.push(material);
        id
    }

    /// Handles are only minted by [`insert`](Self::insert) and materials are
    /// never removed, so lookups cannot miss.
    #[inline]
    pub fn get(&self, id: MaterialId) -> &Material {
        &self.items[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: MaterialId) -> &mut Material {
        &mut self.items[id.index()]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.items.iter().enumerate().map(|(i, m)| (MaterialId(i as u32), m))
    }
}

/// Texture slot arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Textures {
    slots: Vec<TextureSlot>,
}

impl Textures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: TextureSlot) -> TextureId {
        let id = TextureId(self.slots.len() as u32);
        self.slots.push(slot);
        id
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> &TextureSlot {
        &self.slots[id.index()]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &TextureSlot)> {
        self.slots.iter().enumerate().map(|(i, s)| (TextureId(i as u32), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(textures: &mut Textures) -> TextureId {
        textures.insert(TextureSlot {
            path: PathBuf::from("textures/gradients/5.jpg"),
            filter: TextureFilter::Nearest,
        })
    }

    #[test]
    fn handles_are_sequential() {
        let mut textures = Textures::new();
        let tex = gradient(&mut textures);
        let mut materials = Materials::new();
        let toon = |color| Material::Toon(ToonMaterial { color, gradient_map: tex });
        let a = materials.insert(toon(Color::WHITE));
        let b = materials.insert(toon(Color::BLACK));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(materials.len(), 2);
    }

    #[test]
    fn set_color_only_touches_color() {
        let mut textures = Textures::new();
        let tex = gradient(&mut textures);
        let mut m = Material::Points(PointsMaterial {
            color: Color::WHITE,
            size: 0.03,
            size_attenuation: true,
            transparent: true,
            alpha_map: tex,
            depth_write: false,
            depth_test: true,
        });
        let before = m.clone();
        m.set_color(Color::BLACK);

        let (Material::Points(after), Material::Points(before)) = (&m, &before) else {
            panic!("variant changed");
        };
        assert_eq!(after.color, Color::BLACK);
        assert_eq!(PointsMaterial { color: before.color, ..after.clone() }, *before);
    }
}
