use wgpu::util::DeviceExt;

use crate::catalog::TileCatalog;
use crate::map::MAX_DIMENSION;
use crate::renderer::pipeline::{StaticVertex, UvVertex};
use crate::tile::TileKind;

// ── Geometry builders (pure, GPU-free) ──────────────────────────────────────

/// Corner count per cell.  Each cell is an independent quad; corners are
/// not shared between neighbours because their UVs differ.
pub const CORNERS_PER_CELL: usize = 4;
/// Index count per cell: two triangles.
pub const INDICES_PER_CELL: usize = 6;

/// Static stream: for every cell in row-major order, the four corners
/// (top-left, top-right, bottom-left, bottom-right) at unit offsets with a
/// constant white tint.  Built once at layer init and never rewritten.
pub fn build_static_vertices(width: u32, height: u32) -> Vec<StaticVertex> {
    let mut verts = Vec::with_capacity((width * height) as usize * CORNERS_PER_CELL);
    for y in 0..height {
        for x in 0..width {
            let (fx, fy) = (x as f32, y as f32);
            let white = [1.0, 1.0, 1.0];
            verts.push(StaticVertex { position: [fx, fy], color: white });
            verts.push(StaticVertex { position: [fx + 1.0, fy], color: white });
            verts.push(StaticVertex { position: [fx, fy + 1.0], color: white });
            verts.push(StaticVertex { position: [fx + 1.0, fy + 1.0], color: white });
        }
    }
    verts
}

/// Dynamic stream: the current sprite's four UV corners for every cell, in
/// the same corner order as the static stream.  Rebuilt in full whenever
/// the catalog generation advances.
pub fn build_uv_vertices(tiles: &[TileKind], catalog: &TileCatalog) -> Vec<UvVertex> {
    let mut verts = Vec::with_capacity(tiles.len() * CORNERS_PER_CELL);
    for &kind in tiles {
        let sprite = catalog.tile(kind).current_sprite();
        verts.push(UvVertex { uv: sprite.top_left });
        verts.push(UvVertex { uv: sprite.top_right });
        verts.push(UvVertex { uv: sprite.bottom_left });
        verts.push(UvVertex { uv: sprite.bottom_right });
    }
    verts
}

/// Index stream: per cell, two counter-clockwise triangles sharing the
/// corner-1/corner-2 diagonal (0,1,2 and 1,2,3).
pub fn build_indices(width: u32, height: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((width * height) as usize * INDICES_PER_CELL);
    for cell in 0..width * height {
        let base = cell * CORNERS_PER_CELL as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 2, base + 3]);
    }
    indices
}

// ── TileLayer ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct LayerGpu {
    index_buffer: wgpu::Buffer,
    static_buffer: wgpu::Buffer,
    uv_buffer: wgpu::Buffer,
}

/// One depth plane of a tile map: a row-major grid of `TileKind` plus the
/// GPU geometry derived from it.
///
/// Lifecycle: construct (with or without tile data) → `init` → any number
/// of `update`/`draw` → `teardown`.  The layer exclusively owns its tile
/// grid and its buffer handles.
#[derive(Debug)]
pub struct TileLayer {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    /// Catalog generation this layer's UV buffer was last built against.
    synced_generation: u64,
    gpu: Option<LayerGpu>,
}

impl TileLayer {
    /// A layer prefilled with the placeholder pattern (`kind = index mod
    /// COUNT`), cycling through every kind in id order.  Deterministic,
    /// not random, so test scenes look the same on every run.  Dimensions
    /// clamp to [`MAX_DIMENSION`].
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.min(MAX_DIMENSION);
        let height = height.min(MAX_DIMENSION);
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            tiles: (0..cells).map(|i| TileKind::ALL[i % TileKind::COUNT]).collect(),
            synced_generation: 0,
            gpu: None,
        }
    }

    /// A layer over externally supplied tile data (e.g. loaded from a map
    /// file).  `tiles.len()` must equal `width * height`.
    pub fn with_tiles(width: u32, height: u32, tiles: Vec<TileKind>) -> Self {
        debug_assert_eq!(tiles.len(), (width * height) as usize);
        Self {
            width,
            height,
            tiles,
            synced_generation: 0,
            gpu: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Tile at `(x, y)`, or `None` when out of bounds.
    pub fn tile_at(&self, x: u32, y: u32) -> Option<TileKind> {
        if x < self.width && y < self.height {
            self.tiles.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }

    /// Build and upload the three geometry buffers.  Must be called before
    /// `update` or `draw`; the catalog must be the one later passed to
    /// `update`, so the initial UVs match its current animation frames.
    pub fn init(&mut self, device: &wgpu::Device, catalog: &TileCatalog) {
        let indices = build_indices(self.width, self.height);
        let statics = build_static_vertices(self.width, self.height);
        let uvs = build_uv_vertices(&self.tiles, catalog);

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tile_layer_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let static_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tile_layer_static_buffer"),
            contents: bytemuck::cast_slice(&statics),
            usage: wgpu::BufferUsages::VERTEX,
        });
        // COPY_DST: this is the only buffer rewritten after init.
        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tile_layer_uv_buffer"),
            contents: bytemuck::cast_slice(&uvs),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        self.synced_generation = catalog.generation();
        self.gpu = Some(LayerGpu { index_buffer, static_buffer, uv_buffer });
    }

    /// Pure resync step: when the catalog's generation has advanced past
    /// this layer's, returns the freshly built UV stream and records the
    /// new generation.  Returns `None` when nothing changed.
    ///
    /// Each layer tracks its own generation, so any number of layers can
    /// resync against the same catalog in any order without stealing each
    /// other's refresh.
    pub fn sync_animation(&mut self, catalog: &TileCatalog) -> Option<Vec<UvVertex>> {
        if self.synced_generation == catalog.generation() {
            return None;
        }
        self.synced_generation = catalog.generation();
        Some(build_uv_vertices(&self.tiles, catalog))
    }

    /// Refresh the UV buffer if any animated tile changed frames since the
    /// last sync.  The whole dynamic stream is rewritten from offset 0;
    /// the static and index buffers are never touched.
    pub fn update(&mut self, queue: &wgpu::Queue, catalog: &TileCatalog) {
        if let Some(uvs) = self.sync_animation(catalog)
            && let Some(gpu) = &self.gpu
        {
            queue.write_buffer(&gpu.uv_buffer, 0, bytemuck::cast_slice(&uvs));
        }
    }

    /// Issue this layer's single indexed draw call.  `TileMapRenderer::bind`
    /// must have run on `pass` first.  Does nothing before `init` or after
    /// `teardown`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(gpu) = &self.gpu else { return };
        pass.set_vertex_buffer(0, gpu.static_buffer.slice(..));
        pass.set_vertex_buffer(1, gpu.uv_buffer.slice(..));
        pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..(self.width * self.height * INDICES_PER_CELL as u32), 0, 0..1);
    }

    /// Release the GPU buffers immediately instead of waiting for the
    /// device to garbage-collect dropped handles.  Idempotent; the layer
    /// cannot be drawn afterwards.
    pub fn teardown(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.index_buffer.destroy();
            gpu.static_buffer.destroy();
            gpu.uv_buffer.destroy();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
