use std::path::Path;

use anyhow::{Context, Result};
use parallax_scene::material::TextureFilter;

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, tightly packed RGBA.
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes an image file (format guessed from its contents) to RGBA8.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::ImageReader::open(path)
            .with_context(|| format!("failed to open texture {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("failed to read texture {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode texture {}", path.display()))?
            .to_rgba8();

        let (width, height) = img.dimensions();
        log::debug!("loaded {} ({width}x{height})", path.display());
        Self::from_rgba(width, height, img.into_raw())
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            rgba.len() == expected,
            "texture data is {} bytes, expected {expected} for {width}x{height}",
            rgba.len()
        );
        Ok(Self { width, height, rgba })
    }

    /// 2x2 magenta/black checker bound in place of an image that failed to load.
    pub fn placeholder() -> Self {
        const M: [u8; 4] = [255, 0, 255, 255];
        const K: [u8; 4] = [0, 0, 0, 255];
        Self {
            width: 2,
            height: 2,
            rgba: [M, K, K, M].concat(),
        }
    }
}

/// Uploaded texture with its view and sampler.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Uploads `image` as non-color data (`Rgba8Unorm`): the gradient and
    /// alpha maps are sampled as raw values.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        filter: TextureFilter,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let mag_filter = match filter {
            TextureFilter::Nearest => wgpu::FilterMode::Nearest,
            TextureFilter::Linear => wgpu::FilterMode::Linear,
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            _texture: texture,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_a_valid_image() {
        let p = TextureImage::placeholder();
        assert_eq!(TextureImage::from_rgba(p.width, p.height, p.rgba.clone()).unwrap(), p);
        assert_eq!(&p.rgba[0..4], &[255, 0, 255, 255]);
    }

    #[test]
    fn rejects_mismatched_data() {
        assert!(TextureImage::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(TextureImage::from_rgba(0, 2, vec![]).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TextureImage::load(Path::new("no/such/texture.png")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/texture.png"));
    }
}
