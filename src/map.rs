use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::catalog::TileCatalog;
use crate::layer::TileLayer;
use crate::tile::TileKind;

// ── MapError ────────────────────────────────────────────────────────────────

/// Recoverable failures while reading a map file.  Wrong token counts and
/// bad tokens are reported to the caller instead of producing garbage
/// grids.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("map file ended early while reading {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("invalid token '{token}' while reading {expected}")]
    BadToken { token: String, expected: &'static str },
    #[error("map dimensions {width}x{height} exceed the supported maximum ({MAX_DIMENSION})")]
    Oversized { width: u32, height: u32 },
}

/// Upper bound on map width/height.  Keeps every derived quantity (cell,
/// vertex, and index counts) comfortably inside `u32` and stops a bogus
/// header from allocating gigabytes before the token stream runs dry.
pub const MAX_DIMENSION: u32 = 4096;

// ── Token stream helpers ────────────────────────────────────────────────────

fn next_i64<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    expected: &'static str,
) -> Result<i64, MapError> {
    let token = tokens.next().ok_or(MapError::UnexpectedEof { expected })?;
    token.parse().map_err(|_| MapError::BadToken {
        token: token.to_string(),
        expected,
    })
}

fn next_u32<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    expected: &'static str,
) -> Result<u32, MapError> {
    let value = next_i64(tokens, expected)?;
    u32::try_from(value).map_err(|_| MapError::BadToken {
        token: value.to_string(),
        expected,
    })
}

// ── TileMap ─────────────────────────────────────────────────────────────────

/// An ordered stack of tile layers sharing one `width × height`, plus a
/// map-wide collision grid (walkability is terrain-level, not per-layer).
///
/// Layers render back-to-front in construction order: `layers[0]` is the
/// ground plane, later layers draw on top.
#[derive(Debug)]
pub struct TileMap {
    width: u32,
    height: u32,
    layers: Vec<TileLayer>,
    /// `collisions[y * width + x]`, `true` = blocked.
    collisions: Vec<bool>,
}

impl TileMap {
    /// Procedural constructor: `num_layers` placeholder-patterned layers
    /// over an all-walkable grid.  Dimensions clamp to [`MAX_DIMENSION`],
    /// same bound the file path enforces, so derived cell and index counts
    /// cannot overflow.
    pub fn generated(width: u32, height: u32, num_layers: u32) -> Self {
        let width = width.min(MAX_DIMENSION);
        let height = height.min(MAX_DIMENSION);
        let layers = (0..num_layers).map(|_| TileLayer::new(width, height)).collect();
        Self {
            width,
            height,
            layers,
            collisions: vec![false; (width * height) as usize],
        }
    }

    /// Deserialize the flat text format:
    ///
    /// ```text
    /// <width> <height> <numLayers>
    ///
    /// <width*height tile ids per layer, row-major, blank-line separated>
    ///
    /// <width*height collision flags (>0 = blocked)>
    /// ```
    ///
    /// Token counts are fixed by the header; the reader consumes exactly
    /// that many integers per section and is indifferent to line layout.
    /// Negative or out-of-range tile ids load as `NullEmpty` holes.
    pub fn from_text(text: &str) -> Result<Self, MapError> {
        let mut tokens = text.split_ascii_whitespace();

        let width = next_u32(&mut tokens, "map width")?;
        let height = next_u32(&mut tokens, "map height")?;
        let num_layers = next_u32(&mut tokens, "layer count")?;
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(MapError::Oversized { width, height });
        }
        let cells = (width * height) as usize;

        let mut layers = Vec::with_capacity(num_layers as usize);
        for _ in 0..num_layers {
            let mut tiles = Vec::with_capacity(cells);
            for _ in 0..cells {
                let id = next_i64(&mut tokens, "tile id")?;
                // Negative ids are deliberate holes; a too-large positive id
                // means the file is from a newer tileset.  Both load as empty.
                if id >= TileKind::COUNT as i64 {
                    eprintln!("map: tile id {id} out of range; loading as empty");
                }
                tiles.push(TileKind::from_id(id));
            }
            layers.push(TileLayer::with_tiles(width, height, tiles));
        }

        let mut collisions = Vec::with_capacity(cells);
        for _ in 0..cells {
            let value = next_i64(&mut tokens, "collision flag")?;
            collisions.push(value > 0);
        }

        Ok(Self { width, height, layers, collisions })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Serialize in the same layout `from_text` reads: header line, blank
    /// separator, one row of tile ids per grid row per layer (blank line
    /// after each layer), then the collision rows.
    pub fn to_string_repr(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {} {}", self.width, self.height, self.layers.len());
        let _ = writeln!(out);

        for layer in &self.layers {
            for y in 0..self.height {
                let row: Vec<String> = (0..self.width)
                    .map(|x| {
                        let kind = layer.tile_at(x, y).unwrap_or(TileKind::NullEmpty);
                        kind.id().to_string()
                    })
                    .collect();
                let _ = writeln!(out, "{}", row.join(" "));
            }
            let _ = writeln!(out);
        }

        for y in 0..self.height {
            let row: Vec<&str> = (0..self.width)
                .map(|x| {
                    if self.collisions[(y * self.width + x) as usize] { "1" } else { "0" }
                })
                .collect();
            let _ = writeln!(out, "{}", row.join(" "));
        }
        out
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        std::fs::write(path, self.to_string_repr())?;
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [TileLayer] {
        &mut self.layers
    }

    /// Terrain walkability at `(x, y)`.  Out-of-bounds cells are blocked,
    /// so movement code needs no separate bounds check.
    pub fn is_walkable(&self, x: u32, y: u32) -> bool {
        if x < self.width && y < self.height {
            !self.collisions[(y * self.width + x) as usize]
        } else {
            false
        }
    }

    pub fn set_collision(&mut self, x: u32, y: u32, blocked: bool) {
        if x < self.width && y < self.height {
            self.collisions[(y * self.width + x) as usize] = blocked;
        }
    }

    // ── Lifecycle fan-out ──────────────────────────────────────────────────

    /// Initialize every layer's GPU geometry.  Call once, before the first
    /// `update`/`render`.
    pub fn init(&mut self, device: &wgpu::Device, catalog: &TileCatalog) {
        for layer in &mut self.layers {
            layer.init(device, catalog);
        }
    }

    /// Refresh each layer's UV buffer against the catalog's current
    /// animation state.  Per-layer generation tracking means layer order
    /// here is irrelevant — every stale layer refreshes.
    pub fn update(&mut self, queue: &wgpu::Queue, catalog: &TileCatalog) {
        for layer in &mut self.layers {
            layer.update(queue, catalog);
        }
    }

    /// Draw all layers back-to-front (construction order), one indexed
    /// draw call each.  `TileMapRenderer::bind` must have run on `pass`.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        for layer in &self.layers {
            layer.draw(pass);
        }
    }

    /// Release every layer's GPU buffers.  The map itself (tile grids,
    /// collision grid) remains usable for serialization afterwards.
    pub fn teardown(&mut self) {
        for layer in &mut self.layers {
            layer.teardown();
        }
    }
}
