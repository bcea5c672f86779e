pub mod catalog;
pub mod layer;
pub mod map;
pub mod renderer;
pub mod sprite;
pub mod tile;

pub use catalog::{CatalogError, TileCatalog};
pub use layer::TileLayer;
pub use map::{MapError, TileMap};
pub use renderer::TileMapRenderer;
pub use renderer::texture::TilesetTexture;
pub use sprite::{Sprite, Spritesheet};
pub use tile::{Tile, TileKind};

/// Cell size of the bundled tileset layout in pixels.
pub const DEFAULT_CELL_W: u32 = 16;
pub const DEFAULT_CELL_H: u32 = 16;
