//! Staggered-row hex layout. Odd rows sit half a tile to the right of even
//! rows, so every conversion works on whole pixels with floor division.

use glam::IVec2;
use packets::types::Loc;

use crate::draw_map::DrawMap;

pub const HEX_WIDTH: i32 = 58;
pub const HEX_HEIGHT: i32 = 36;

/// Ticks spent between two path steps, and the denominator of every
/// interpolation.
pub const STEP_TICKS: u32 = 10;

fn row_shift(row: i32) -> i32 {
    if row.rem_euclid(2) == 1 { HEX_WIDTH / 2 } else { 0 }
}

/// Tile under a pixel. The row is found first; its parity decides the column
/// correction.
pub fn pixel_to_loc(pixel: IVec2) -> Loc {
    let y = pixel.y.div_euclid(HEX_HEIGHT);
    let x = (pixel.x - row_shift(y)).div_euclid(HEX_WIDTH);
    Loc::new(x, y)
}

/// Top-left pixel of a tile.
pub fn tile_pixel(loc: Loc) -> IVec2 {
    IVec2::new(loc.x * HEX_WIDTH + row_shift(loc.y), loc.y * HEX_HEIGHT)
}

pub fn tile_center(loc: Loc) -> IVec2 {
    tile_pixel(loc) + IVec2::new(HEX_WIDTH / 2, HEX_HEIGHT / 2)
}

/// Where a unit standing on `loc` has its feet: the tile center lowered by
/// the terrain's foot offset once draw metadata exists.
pub fn unit_anchor(loc: Loc, map: Option<&DrawMap>) -> IVec2 {
    let mut anchor = tile_center(loc);
    if let Some(offset) = map.and_then(|m| m.unit_y_offset(loc)) {
        anchor.y += offset;
    }
    anchor
}

/// `(end*t + start*(10-t)) / 10`, truncating.
pub fn lerp(start: IVec2, end: IVec2, t: u32) -> IVec2 {
    let t = t.min(STEP_TICKS) as i32;
    let span = STEP_TICKS as i32;
    (end * t + start * (span - t)) / span
}
