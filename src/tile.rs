use crate::sprite::Sprite;

// ── TileKind ─────────────────────────────────────────────────────────────────

/// Dense terrain/decoration identifier.  Every `TileKind` doubles as an
/// array index into the catalog and into serialized map files, so the
/// discriminants are contiguous from zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    Grass = 0,
    Sand,
    Brick,
    Water,
    Lava,
    Tree,
    Sun,
    Flower,
    HouseDoor,
    HouseWindow,
    HouseWall,
    BlueHouseUpperLeft,
    BlueHouseUpperMid,
    BlueHouseUpperRight,
    BlueHouseLowerLeft,
    BlueHouseLowerMid,
    BlueHouseLowerRight,
    WoodFloorboard,
    StoneBrick,
    NullEmpty,
}

impl TileKind {
    pub const COUNT: usize = 20;

    /// All kinds in discriminant order.  `ALL[k as usize] == k`.
    pub const ALL: [TileKind; Self::COUNT] = [
        TileKind::Grass,
        TileKind::Sand,
        TileKind::Brick,
        TileKind::Water,
        TileKind::Lava,
        TileKind::Tree,
        TileKind::Sun,
        TileKind::Flower,
        TileKind::HouseDoor,
        TileKind::HouseWindow,
        TileKind::HouseWall,
        TileKind::BlueHouseUpperLeft,
        TileKind::BlueHouseUpperMid,
        TileKind::BlueHouseUpperRight,
        TileKind::BlueHouseLowerLeft,
        TileKind::BlueHouseLowerMid,
        TileKind::BlueHouseLowerRight,
        TileKind::WoodFloorboard,
        TileKind::StoneBrick,
        TileKind::NullEmpty,
    ];

    /// Map a raw id from a map file to a kind.  Negative and out-of-range
    /// ids are holes, not errors: they load as `NullEmpty`.
    pub fn from_id(id: i64) -> TileKind {
        if id < 0 {
            return TileKind::NullEmpty;
        }
        *Self::ALL
            .get(id as usize)
            .unwrap_or(&TileKind::NullEmpty)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Snake-case name used as the key in catalog JSON documents.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Sand => "sand",
            TileKind::Brick => "brick",
            TileKind::Water => "water",
            TileKind::Lava => "lava",
            TileKind::Tree => "tree",
            TileKind::Sun => "sun",
            TileKind::Flower => "flower",
            TileKind::HouseDoor => "house_door",
            TileKind::HouseWindow => "house_window",
            TileKind::HouseWall => "house_wall",
            TileKind::BlueHouseUpperLeft => "blue_house_upper_left",
            TileKind::BlueHouseUpperMid => "blue_house_upper_mid",
            TileKind::BlueHouseUpperRight => "blue_house_upper_right",
            TileKind::BlueHouseLowerLeft => "blue_house_lower_left",
            TileKind::BlueHouseLowerMid => "blue_house_lower_mid",
            TileKind::BlueHouseLowerRight => "blue_house_lower_right",
            TileKind::WoodFloorboard => "wood_floorboard",
            TileKind::StoneBrick => "stone_brick",
            TileKind::NullEmpty => "null_empty",
        }
    }

    pub fn from_name(name: &str) -> Option<TileKind> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

// ── Tile ─────────────────────────────────────────────────────────────────────

/// Rendering/animation behavior bound to one `TileKind`.
///
/// A single `Tile` value serves every placement of its kind, so two cells
/// showing water are always on the same frame.  Animation state lives here,
/// per kind, not per cell.
#[derive(Clone, Debug)]
pub enum Tile {
    Static {
        sprite: Sprite,
    },
    Animated {
        frames: Vec<Sprite>,
        seconds_per_frame: f32,
        elapsed: f32,
        frame_index: usize,
    },
}

impl Tile {
    pub fn fixed(sprite: Sprite) -> Self {
        Tile::Static { sprite }
    }

    /// `frames` must be non-empty and `seconds_per_frame` positive; the
    /// catalog constructors validate this before calling.
    pub fn animated(frames: Vec<Sprite>, seconds_per_frame: f32) -> Self {
        debug_assert!(!frames.is_empty());
        debug_assert!(seconds_per_frame > 0.0);
        Tile::Animated {
            frames,
            seconds_per_frame,
            elapsed: 0.0,
            frame_index: 0,
        }
    }

    /// Advance animation time by `dt` seconds.  Returns `true` only when
    /// the visible frame changed on this call.
    ///
    /// On a crossing the frame duration is subtracted rather than the
    /// clock reset, so overshoot carries into the next frame.  At most one
    /// frame advances per call.
    pub fn advance(&mut self, dt: f32) -> bool {
        match self {
            Tile::Static { .. } => false,
            Tile::Animated {
                frames,
                seconds_per_frame,
                elapsed,
                frame_index,
            } => {
                *elapsed += dt;
                if *elapsed >= *seconds_per_frame {
                    *elapsed -= *seconds_per_frame;
                    *frame_index = (*frame_index + 1) % frames.len();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// The sprite to render right now.
    pub fn current_sprite(&self) -> Sprite {
        match self {
            Tile::Static { sprite } => *sprite,
            Tile::Animated {
                frames, frame_index, ..
            } => frames[*frame_index],
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Spritesheet;

    fn sheet() -> Spritesheet {
        Spritesheet::from_image_size(256, 64, 16, 16)
    }

    #[test]
    fn all_array_matches_discriminants() {
        for (i, kind) in TileKind::ALL.iter().enumerate() {
            assert_eq!(kind.id() as usize, i);
        }
    }

    #[test]
    fn from_id_negative_is_null_empty() {
        assert_eq!(TileKind::from_id(-1), TileKind::NullEmpty);
        assert_eq!(TileKind::from_id(i64::MIN), TileKind::NullEmpty);
    }

    #[test]
    fn from_id_out_of_range_is_null_empty() {
        assert_eq!(TileKind::from_id(TileKind::COUNT as i64), TileKind::NullEmpty);
        assert_eq!(TileKind::from_id(9999), TileKind::NullEmpty);
    }

    #[test]
    fn from_name_round_trips_every_kind() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TileKind::from_name("bogus"), None);
    }

    #[test]
    fn static_tile_never_advances() {
        let mut tile = Tile::fixed(sheet().crop(0, 0));
        let before = tile.current_sprite();
        for _ in 0..10 {
            assert!(!tile.advance(100.0));
        }
        assert_eq!(tile.current_sprite(), before);
    }

    #[test]
    fn animated_tile_advances_on_each_exact_crossing() {
        let s = sheet();
        let frames = vec![s.crop(3, 0), s.crop(4, 0), s.crop(5, 0), s.crop(4, 0)];
        let mut tile = Tile::animated(frames.clone(), 0.75);

        // Four exact-duration steps walk the frame index 1 → 2 → 3 → 0,
        // signaling a change every time.
        for expected in [1usize, 2, 3, 0] {
            assert!(tile.advance(0.75));
            assert_eq!(tile.current_sprite(), frames[expected]);
        }
    }

    #[test]
    fn animated_tile_silent_below_threshold() {
        let s = sheet();
        let mut tile = Tile::animated(vec![s.crop(3, 0), s.crop(4, 0)], 0.75);
        assert!(!tile.advance(0.5));
        assert!(!tile.advance(0.2));
        // 0.7 accumulated — still under 0.75.
        assert_eq!(tile.current_sprite(), s.crop(3, 0));
        // The next 0.1 crosses.
        assert!(tile.advance(0.1));
        assert_eq!(tile.current_sprite(), s.crop(4, 0));
    }

    #[test]
    fn animated_tile_preserves_overshoot() {
        let s = sheet();
        let mut tile = Tile::animated(vec![s.crop(3, 0), s.crop(4, 0)], 0.75);
        assert!(tile.advance(1.0));
        // 0.25 carried over: another 0.5 step reaches exactly 0.75.
        assert!(tile.advance(0.5));
    }
}
