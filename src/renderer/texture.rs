use wgpu::util::DeviceExt;

use crate::sprite::Spritesheet;

/// GPU-resident tileset image: texture view + nearest-filter sampler.
///
/// The cell-grid math lives in [`Spritesheet`], which this type derives on
/// request so the pure UV layer stays GPU-free.
pub struct TilesetTexture {
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl TilesetTexture {
    pub fn from_png(device: &wgpu::Device, queue: &wgpu::Queue, png_bytes: &[u8]) -> Self {
        let img = image::load_from_memory(png_bytes)
            .expect("failed to load tileset PNG")
            .to_rgba8();
        let (width, height) = img.dimensions();

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("tileset"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &img,
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture_view, sampler, width, height }
    }

    /// Cell grid over this image for the given cell size.
    pub fn spritesheet(&self, cell_w: u32, cell_h: u32) -> Spritesheet {
        Spritesheet::from_image_size(self.width, self.height, cell_w, cell_h)
    }
}
