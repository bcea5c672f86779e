// ── Sprite ────────────────────────────────────────────────────────────────────

/// Texture coordinates for one quad: the four UV corners of a spritesheet
/// cell.  Corners are stored explicitly (rather than min/max) so animated
/// tiles can later flip or rotate individual frames without touching the
/// vertex builders.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub top_left: [f32; 2],
    pub top_right: [f32; 2],
    pub bottom_left: [f32; 2],
    pub bottom_right: [f32; 2],
}

impl Sprite {
    /// Build a sprite from an axis-aligned UV rectangle.
    pub fn from_rect(uv_min: [f32; 2], uv_max: [f32; 2]) -> Self {
        Self {
            top_left: uv_min,
            top_right: [uv_max[0], uv_min[1]],
            bottom_left: [uv_min[0], uv_max[1]],
            bottom_right: uv_max,
        }
    }

    /// True when every corner lies inside the sampled texture, i.e. all
    /// coordinates are within `[0, 1]`.  The empty/null tile deliberately
    /// fails this so the fragment shader can discard it.
    pub fn in_bounds(&self) -> bool {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
            .iter()
            .all(|c| (0.0..=1.0).contains(&c[0]) && (0.0..=1.0).contains(&c[1]))
    }
}

// ── Spritesheet ──────────────────────────────────────────────────────────────

/// Pure UV grid math over a spritesheet image of `cols × rows` cells, each
/// `cell_w × cell_h` pixels.  Holds no GPU state; the matching texture lives
/// in `renderer::texture::TilesetTexture`.
#[derive(Copy, Clone, Debug)]
pub struct Spritesheet {
    pub cols: u32,
    pub rows: u32,
    pub cell_w: u32,
    pub cell_h: u32,
}

impl Spritesheet {
    /// Derive the grid from full image dimensions.  Partial cells at the
    /// right/bottom edge are dropped.
    pub fn from_image_size(img_w: u32, img_h: u32, cell_w: u32, cell_h: u32) -> Self {
        Self {
            cols: img_w / cell_w,
            rows: img_h / cell_h,
            cell_w,
            cell_h,
        }
    }

    /// UV corners for the cell at `(col, row)`.
    ///
    /// Coordinates are signed on purpose: cropping a negative or
    /// out-of-range cell produces UVs outside `[0, 1]`, which the tile
    /// shader treats as "draw nothing".  `TileCatalog` uses `crop(-1, -1)`
    /// for the empty tile.
    pub fn crop(&self, col: i32, row: i32) -> Sprite {
        let total_w = (self.cols * self.cell_w) as f32;
        let total_h = (self.rows * self.cell_h) as f32;

        let u_min = (col * self.cell_w as i32) as f32 / total_w;
        let v_min = (row * self.cell_h as i32) as f32 / total_h;
        let u_max = ((col + 1) * self.cell_w as i32) as f32 / total_w;
        let v_max = ((row + 1) * self.cell_h as i32) as f32 / total_h;

        Sprite::from_rect([u_min, v_min], [u_max, v_max])
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
