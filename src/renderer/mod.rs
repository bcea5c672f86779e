pub mod pipeline;
pub mod texture;

use wgpu::util::DeviceExt;

use pipeline::{TileMapPipeline, create_tilemap_pipeline, orthographic_projection};
use texture::TilesetTexture;

/// Frame-level GPU state shared by every tile layer: the render pipeline,
/// the projection uniform, and the tileset bind group.
///
/// One renderer serves any number of maps drawn with the same tileset.
/// Per frame: `set_projection` once, `bind` once at the top of the render
/// pass, then each layer issues its own indexed draw.
pub struct TileMapRenderer {
    pipeline: TileMapPipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    tileset_bind_group: wgpu::BindGroup,
}

impl TileMapRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        tileset: &TilesetTexture,
    ) -> Self {
        let pipeline = create_tilemap_pipeline(device, surface_format);

        // Identity-ish default: a 1×1-cell ortho, replaced by the first
        // set_projection call.
        let proj = orthographic_projection(1.0, 1.0);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tilemap_projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tilemap_projection_bg"),
            layout: &pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let tileset_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tilemap_tileset_bg"),
            layout: &pipeline.tileset_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&tileset.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&tileset.sampler),
                },
            ],
        });

        Self {
            pipeline,
            projection_buffer,
            projection_bind_group,
            tileset_bind_group,
        }
    }

    /// Upload a new projection matrix.  Call once per frame, before the
    /// render pass that draws the map.
    pub fn set_projection(&self, queue: &wgpu::Queue, projection: &glam::Mat4) {
        queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::cast_slice(&projection.to_cols_array()),
        );
    }

    /// Bind pipeline, projection, and tileset onto `pass`.  Layers drawn
    /// afterwards only need to set their own vertex/index buffers.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline.render_pipeline);
        pass.set_bind_group(0, &self.projection_bind_group, &[]);
        pass.set_bind_group(1, &self.tileset_bind_group, &[]);
    }
}
