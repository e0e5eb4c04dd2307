//! Optional crash screen artwork.

use crate::font::GlyphAtlas;

/// Side length of a background tile in pixels
pub const BACKGROUND_TILE_SIZE: usize = 64;

/// Source of optional artwork; every capability defaults to absent
pub trait AssetProvider {
    /// A `BACKGROUND_TILE_SIZE` square RGBA5551 tile repeated behind the screen
    fn background_tile(&self) -> Option<&'static [u16]> {
        None
    }

    /// An alternate atlas for the banner label
    fn banner_atlas(&self) -> Option<&'static GlyphAtlas> {
        None
    }
}

/// Provider with no artwork
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetProvider for NoAssets {}

/// The background tile, if the provider has one of the full size
pub fn usable_background_tile(assets: &dyn AssetProvider) -> Option<&'static [u16]> {
    assets
        .background_tile()
        .filter(|tile| tile.len() >= BACKGROUND_TILE_SIZE * BACKGROUND_TILE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    static SHORT_TILE: [u16; 16] = [0x1234; 16];
    static FULL_TILE: [u16; BACKGROUND_TILE_SIZE * BACKGROUND_TILE_SIZE] =
        [0x4321; BACKGROUND_TILE_SIZE * BACKGROUND_TILE_SIZE];

    struct Tile(&'static [u16]);

    impl AssetProvider for Tile {
        fn background_tile(&self) -> Option<&'static [u16]> {
            Some(self.0)
        }
    }

    #[test]
    fn test_tile_capability_check() {
        assert!(usable_background_tile(&NoAssets).is_none());
        assert!(usable_background_tile(&Tile(&SHORT_TILE)).is_none());
        assert_eq!(usable_background_tile(&Tile(&FULL_TILE)).map(|t| t.len()), Some(4096));
        assert!(NoAssets.banner_atlas().is_none());
    }
}
