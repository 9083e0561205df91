use std::path::Path;

use parallax_engine::render::TextureImage;
use parallax_scene::material::Textures;

/// Decodes every texture slot, in slot order, from `root`.
///
/// A slot that fails to load is logged and replaced by the placeholder, so
/// the returned list always lines up with `textures`.
pub fn load_textures(root: &Path, textures: &Textures) -> Vec<TextureImage> {
    textures
        .iter()
        .map(|(id, slot)| {
            let path = root.join(&slot.path);
            TextureImage::load(&path).unwrap_or_else(|err| {
                log::error!("texture {}: {err:#}; using placeholder", id.index());
                TextureImage::placeholder()
            })
        })
        .collect()
}
