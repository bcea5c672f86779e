use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::sprite::Spritesheet;
use crate::tile::{Tile, TileKind};

// ── CatalogError ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown tile kind '{0}' in catalog document")]
    UnknownTile(String),
    #[error("tile kind '{0}' is not registered in the catalog document")]
    Unregistered(&'static str),
    #[error("bad definition for tile kind '{kind}': {reason}")]
    BadDef { kind: &'static str, reason: &'static str },
}

// ── JSON document shape ──────────────────────────────────────────────────────

/// One entry of the catalog document.  Exactly one of `cell` / `frames`
/// must be present; `seconds_per_frame` accompanies `frames`.
#[derive(Deserialize)]
struct RawTileDef {
    cell: Option<[i32; 2]>,
    frames: Option<Vec<[i32; 2]>>,
    seconds_per_frame: Option<f32>,
}

// ── TileCatalog ──────────────────────────────────────────────────────────────

/// Owned, injected table of tile behaviors, one per `TileKind`.
///
/// This replaces a global registry: construct one catalog at startup, pass
/// it by reference to every layer and map.  Completeness is a construction
/// invariant — both constructors populate all `TileKind::COUNT` slots or
/// fail, so `tile()` is infallible and there is no "initialized twice" or
/// "looked up before init" state to guard against.
///
/// Animation state is shared per kind, not per placement: every cell of a
/// map showing the same animated kind renders the same frame.  One
/// `update_all` pass is O(COUNT), independent of map size.
#[derive(Debug)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
    generation: u64,
}

impl TileCatalog {
    /// The fixed tileset layout of the bundled spritesheet: water and lava
    /// animate through a 4-frame ping-pong at 0.75 s per frame, everything
    /// else is a single cell.  The empty tile crops cell (-1, -1) so its
    /// UVs land outside [0, 1] and the shader discards it.
    pub fn builtin(sheet: &Spritesheet) -> Self {
        let mut tiles = Vec::with_capacity(TileKind::COUNT);
        for kind in TileKind::ALL {
            let tile = match kind {
                TileKind::Grass => Tile::fixed(sheet.crop(0, 0)),
                TileKind::Sand => Tile::fixed(sheet.crop(1, 0)),
                TileKind::Brick => Tile::fixed(sheet.crop(2, 0)),
                TileKind::Water => Tile::animated(
                    vec![sheet.crop(3, 0), sheet.crop(4, 0), sheet.crop(5, 0), sheet.crop(4, 0)],
                    0.75,
                ),
                TileKind::Lava => Tile::animated(
                    vec![sheet.crop(6, 0), sheet.crop(7, 0), sheet.crop(8, 0), sheet.crop(7, 0)],
                    0.75,
                ),
                TileKind::Tree => Tile::fixed(sheet.crop(9, 0)),
                TileKind::Sun => Tile::fixed(sheet.crop(10, 0)),
                TileKind::Flower => Tile::fixed(sheet.crop(11, 0)),
                TileKind::HouseDoor => Tile::fixed(sheet.crop(12, 0)),
                TileKind::HouseWindow => Tile::fixed(sheet.crop(13, 0)),
                TileKind::HouseWall => Tile::fixed(sheet.crop(14, 0)),
                TileKind::BlueHouseUpperLeft => Tile::fixed(sheet.crop(12, 1)),
                TileKind::BlueHouseUpperMid => Tile::fixed(sheet.crop(13, 1)),
                TileKind::BlueHouseUpperRight => Tile::fixed(sheet.crop(14, 1)),
                TileKind::BlueHouseLowerLeft => Tile::fixed(sheet.crop(12, 2)),
                TileKind::BlueHouseLowerMid => Tile::fixed(sheet.crop(13, 2)),
                TileKind::BlueHouseLowerRight => Tile::fixed(sheet.crop(14, 2)),
                TileKind::WoodFloorboard => Tile::fixed(sheet.crop(15, 0)),
                TileKind::StoneBrick => Tile::fixed(sheet.crop(15, 1)),
                TileKind::NullEmpty => Tile::fixed(sheet.crop(-1, -1)),
            };
            tiles.push(tile);
        }
        Self { tiles, generation: 0 }
    }

    /// Build a catalog from a JSON document keyed by `TileKind` names:
    ///
    /// ```json
    /// {
    ///   "grass": { "cell": [0, 0] },
    ///   "water": { "frames": [[3,0],[4,0],[5,0],[4,0]], "seconds_per_frame": 0.75 },
    ///   "null_empty": { "cell": [-1, -1] }
    /// }
    /// ```
    ///
    /// Every kind must appear exactly once; a missing kind is
    /// `CatalogError::Unregistered`, an unknown key `UnknownTile`, and a
    /// definition with neither/both of `cell` and `frames`, an empty frame
    /// list, or a non-positive frame duration is `BadDef`.
    pub fn from_json(json: &str, sheet: &Spritesheet) -> Result<Self, CatalogError> {
        let raw: HashMap<String, RawTileDef> = serde_json::from_str(json)?;

        for key in raw.keys() {
            if TileKind::from_name(key).is_none() {
                return Err(CatalogError::UnknownTile(key.clone()));
            }
        }

        let mut tiles = Vec::with_capacity(TileKind::COUNT);
        for kind in TileKind::ALL {
            let def = raw
                .get(kind.name())
                .ok_or(CatalogError::Unregistered(kind.name()))?;
            tiles.push(Self::build_tile(kind, def, sheet)?);
        }
        Ok(Self { tiles, generation: 0 })
    }

    fn build_tile(
        kind: TileKind,
        def: &RawTileDef,
        sheet: &Spritesheet,
    ) -> Result<Tile, CatalogError> {
        match (&def.cell, &def.frames) {
            (Some(_), Some(_)) => Err(CatalogError::BadDef {
                kind: kind.name(),
                reason: "both 'cell' and 'frames' given",
            }),
            (None, None) => Err(CatalogError::BadDef {
                kind: kind.name(),
                reason: "needs either 'cell' or 'frames'",
            }),
            (Some([col, row]), None) => Ok(Tile::fixed(sheet.crop(*col, *row))),
            (None, Some(frames)) => {
                if frames.is_empty() {
                    return Err(CatalogError::BadDef {
                        kind: kind.name(),
                        reason: "'frames' is empty",
                    });
                }
                let spf = def.seconds_per_frame.unwrap_or(0.0);
                if spf <= 0.0 {
                    return Err(CatalogError::BadDef {
                        kind: kind.name(),
                        reason: "'seconds_per_frame' must be positive",
                    });
                }
                let sprites = frames.iter().map(|[c, r]| sheet.crop(*c, *r)).collect();
                Ok(Tile::animated(sprites, spf))
            }
        }
    }

    /// Advance every animated tile by `dt` seconds.  The generation counter
    /// is bumped once per pass in which at least one visible frame changed;
    /// consumers compare against their last-synced value to decide whether
    /// their UV geometry is stale.
    pub fn update_all(&mut self, dt: f32) {
        let mut changed = false;
        for tile in &mut self.tiles {
            if tile.advance(dt) {
                changed = true;
            }
        }
        if changed {
            self.generation += 1;
        }
    }

    /// O(1) access to the behavior for `kind`.  Always valid: the catalog
    /// is dense by construction.
    pub fn tile(&self, kind: TileKind) -> &Tile {
        &self.tiles[kind.id() as usize]
    }

    /// Monotonic animation-change counter.  Never decreases; increments
    /// exactly when some tile's visible frame changed during `update_all`.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
