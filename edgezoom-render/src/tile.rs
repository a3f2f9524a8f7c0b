/// Edge length of a square tile. One tile of outcomes stays within L1.
pub const TILE_SIZE: u32 = 64;

/// A rectangular block of the pixel grid, evaluated as one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Row of the top-left pixel.
    pub row: u32,
    /// Column of the top-left pixel.
    pub col: u32,
    /// Width in pixels (narrower at the right edge).
    pub width: u32,
    /// Height in pixels (shorter at the bottom edge).
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Grid coordinates of every pixel in the tile, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.row..self.row + self.height)
            .flat_map(move |row| (self.col..self.col + self.width).map(move |col| (row, col)))
    }
}

/// Cut a `width`×`height` grid into row-major tiles of at most
/// [`TILE_SIZE`]×[`TILE_SIZE`].
pub fn build_tile_grid(width: u32, height: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut row = 0;
    while row < height {
        let th = TILE_SIZE.min(height - row);
        let mut col = 0;
        while col < width {
            let tw = TILE_SIZE.min(width - col);
            tiles.push(Tile {
                row,
                col,
                width: tw,
                height: th,
            });
            col += tw;
        }
        row += th;
    }
    tiles
}
