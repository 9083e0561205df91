//! Debug parameter panel: one color control bound to the scene materials.
//!
//! The panel owns the parameter value and the list of materials it drives.
//! Every change is pushed synchronously into all bound materials; nothing else
//! about those materials is touched.

use glam::Vec2;

use crate::color::Color;
use crate::config::PanelConfig;
use crate::coords::{Rect, Viewport};
use crate::material::{MaterialId, Materials};
use crate::scene::Scene;

/// User-adjustable values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Parameters {
    pub material_color: Color,
}

/// A clickable preset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Swatch {
    pub rect: Rect,
    pub color: Color,
    pub selected: bool,
}

/// Screen-space layout of the panel for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub background: Rect,
    /// Bar showing the current value.
    pub current: Rect,
    pub swatches: Vec<Swatch>,
}

pub struct ParameterPanel {
    config: PanelConfig,
    params: Parameters,
    targets: Vec<MaterialId>,
    visible: bool,
}

impl ParameterPanel {
    pub fn new(
        config: PanelConfig,
        params: Parameters,
        targets: impl IntoIterator<Item = MaterialId>,
    ) -> Self {
        let visible = config.visible;
        Self {
            config,
            params,
            targets: targets.into_iter().collect(),
            visible,
        }
    }

    /// Binds the color control to the shared mesh material and the particle
    /// material, starting from the mesh material's current color.
    pub fn for_scene(config: PanelConfig, scene: &Scene) -> Self {
        let params = Parameters {
            material_color: scene.materials.get(scene.mesh_material()).color(),
        };
        Self::new(config, params, [scene.mesh_material(), scene.particle_material()])
    }

    #[inline]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn targets(&self) -> &[MaterialId] {
        &self.targets
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// Sets the color and writes it into every bound material.
    ///
    /// Returns `false` if the value did not change.
    pub fn set_material_color(&mut self, color: Color, materials: &mut Materials) -> bool {
        if self.params.material_color == color {
            return false;
        }
        self.params.material_color = color;
        for &id in &self.targets {
            materials.get_mut(id).set_color(color);
        }
        log::info!("materialColor = {color}");
        true
    }

    /// Rotates the hue by `steps` configured increments (negative goes back).
    pub fn nudge_hue(&mut self, steps: f32, materials: &mut Materials) -> bool {
        let color = self.params.material_color.rotate_hue(steps * self.config.hue_step);
        self.set_material_color(color, materials)
    }

    /// Panel geometry anchored to the viewport's top-right corner, or `None`
    /// while hidden.
    pub fn layout(&self, viewport: Viewport) -> Option<PanelLayout> {
        if !self.visible {
            return None;
        }

        let c = &self.config;
        let n = c.presets.len().max(1) as f32;
        let inner_w = n * c.swatch_size + (n - 1.0) * c.gap;
        let bg_w = inner_w + 2.0 * c.padding;
        let bg_h = 2.0 * c.swatch_size + c.gap + 2.0 * c.padding;

        let background = Rect::new(viewport.width - c.margin - bg_w, c.margin, bg_w, bg_h);
        let left = background.origin.x + c.padding;
        let top = background.origin.y + c.padding;

        let current = Rect::new(left, top, inner_w, c.swatch_size);
        let row_y = top + c.swatch_size + c.gap;
        let swatches = c
            .presets
            .iter()
            .enumerate()
            .map(|(i, &color)| Swatch {
                rect: Rect::new(
                    left + i as f32 * (c.swatch_size + c.gap),
                    row_y,
                    c.swatch_size,
                    c.swatch_size,
                ),
                color,
                selected: color == self.params.material_color,
            })
            .collect();

        Some(PanelLayout { background, current, swatches })
    }

    /// Handles a click in logical pixels.
    ///
    /// Returns `true` when the click landed on the panel, whether or not it
    /// changed the color.
    pub fn click(&mut self, pos: Vec2, viewport: Viewport, materials: &mut Materials) -> bool {
        let Some(layout) = self.layout(viewport) else { return false };
        if !layout.background.contains(pos) {
            return false;
        }
        if let Some(swatch) = layout.swatches.iter().find(|s| s.rect.contains(pos)) {
            self.set_material_color(swatch.color, materials);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::SceneConfig;
    use crate::material::Material;

    fn scene() -> Scene {
        Scene::build(&SceneConfig::default(), &mut StdRng::seed_from_u64(3))
    }

    fn vp() -> Viewport {
        Viewport::new(1024.0, 768.0)
    }

    // ── color changes ─────────────────────────────────────────────────────

    #[test]
    fn change_updates_both_materials_identically() {
        let mut s = scene();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        let pink = Color::from_hex("#ff6b6b").unwrap();

        assert!(panel.set_material_color(pink, &mut s.materials));
        assert_eq!(s.materials.get(s.mesh_material()).color(), pink);
        assert_eq!(s.materials.get(s.particle_material()).color(), pink);
        assert_eq!(panel.parameters().material_color, pink);
    }

    #[test]
    fn change_leaves_other_properties_alone() {
        let mut s = scene();
        let before: Vec<Material> = s.materials.iter().map(|(_, m)| m.clone()).collect();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        let new_color = Color::from_hex("#1982c4").unwrap();
        panel.set_material_color(new_color, &mut s.materials);

        for ((_, after), mut expected) in s.materials.iter().zip(before) {
            expected.set_color(new_color);
            assert_eq!(*after, expected);
        }
    }

    #[test]
    fn same_color_is_not_a_change() {
        let mut s = scene();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        let current = panel.parameters().material_color;
        assert!(!panel.set_material_color(current, &mut s.materials));
    }

    #[test]
    fn hue_nudge_moves_both_materials() {
        let mut s = scene();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        assert!(panel.nudge_hue(1.0, &mut s.materials));
        let c = panel.parameters().material_color;
        assert_ne!(c.to_hex(), "#009999");
        assert_eq!(s.materials.get(s.particle_material()).color(), c);

        panel.nudge_hue(-1.0, &mut s.materials);
        assert_eq!(panel.parameters().material_color.to_hex(), "#009999");
    }

    // ── layout + clicks ───────────────────────────────────────────────────

    #[test]
    fn layout_is_anchored_top_right() {
        let s = scene();
        let panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        let layout = panel.layout(vp()).unwrap();
        let max = layout.background.max();
        assert_eq!(max.x, 1024.0 - 12.0);
        assert_eq!(layout.background.origin.y, 12.0);
        assert_eq!(layout.swatches.len(), 8);
        assert!(layout.swatches[0].selected);
        assert!(layout.swatches[1..].iter().all(|s| !s.selected));
    }

    #[test]
    fn clicking_a_swatch_selects_it() {
        let mut s = scene();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        let swatch = panel.layout(vp()).unwrap().swatches[2];
        let center = swatch.rect.origin + swatch.rect.size * 0.5;

        assert!(panel.click(center, vp(), &mut s.materials));
        assert_eq!(panel.parameters().material_color, swatch.color);
        assert_eq!(s.materials.get(s.mesh_material()).color(), swatch.color);
    }

    #[test]
    fn clicks_outside_are_not_consumed() {
        let mut s = scene();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        assert!(!panel.click(Vec2::new(5.0, 700.0), vp(), &mut s.materials));
        assert_eq!(panel.parameters().material_color.to_hex(), "#009999");
    }

    #[test]
    fn hidden_panel_has_no_layout() {
        let mut s = scene();
        let mut panel = ParameterPanel::for_scene(PanelConfig::default(), &s);
        panel.toggle_visible();
        assert!(panel.layout(vp()).is_none());
        let any = Vec2::new(1000.0, 20.0);
        assert!(!panel.click(any, vp(), &mut s.materials));
    }
}
