use grid_capture::image::{ImageRgb8, Rgb};

/// Side length of [`die_image`].
pub const DIE_SIZE: usize = 210;
/// Cell pitch of [`die_image`].
pub const DIE_PITCH: usize = 40;
/// First cell boundary of [`die_image`] on both axes.
pub const DIE_ORIGIN: usize = 20;

const MARGIN: u8 = 100;
const SCALE_BAR: u8 = 0;
const METAL: u8 = 160;
const VIA: u8 = 132;
const VOID: u8 = 60;
const RESIDUE: u8 = 110;
/// Row 2 levels: just above the fitted low threshold, just below it (inside
/// the aggressive margin) and plainly dark.
const FRINGE_HIGH: u8 = 99;
const FRINGE_LOW: u8 = 90;
const FRINGE: u8 = 75;

fn grey(v: u8) -> Rgb {
    [v, v, v]
}

fn die_cell(col: usize, row: usize) -> u8 {
    match (col, row) {
        (3, 1) => VIA,
        (_, 0 | 1) => METAL,
        (0, 2) => FRINGE_HIGH,
        (2, 2) => FRINGE_LOW,
        (_, 2) => FRINGE,
        (0 | 1 | 3, 4) => RESIDUE,
        _ => VOID,
    }
}

/// 210×210 greyscale die:
///
/// - rows 0 and 1 are metal, with a dimmer via at cell (3, 1);
/// - row 2 sits around the low threshold, (0, 2) just above it and (2, 2)
///   just below;
/// - rows 3 and 4 are void, with residue at (0, 4), (1, 4) and a stray
///   residue cell at (3, 4).
///
/// Cells are 40 px starting at x = y = 20. The top margin carries a dashed
/// scale bar over every other column; the left margin continues column 0.
/// Steps between cells of one row stay below the strong contrast-edge level,
/// so only the scale bar marks the columns.
pub fn die_image() -> ImageRgb8 {
    ImageRgb8::from_fn(DIE_SIZE, DIE_SIZE, |x, y| {
        if y < DIE_ORIGIN {
            let dashed = y % 4 == 2
                && y <= 14
                && x >= DIE_ORIGIN
                && ((x - DIE_ORIGIN) / DIE_PITCH) % 2 == 0;
            return grey(if dashed { SCALE_BAR } else { MARGIN });
        }
        let row = (y - DIE_ORIGIN) / DIE_PITCH;
        let col = x.saturating_sub(DIE_ORIGIN) / DIE_PITCH;
        grey(die_cell(col, row))
    })
}

/// Swap the axes of `img`.
pub fn transpose(img: &ImageRgb8) -> ImageRgb8 {
    ImageRgb8::from_fn(img.h, img.w, |x, y| img.get(y, x))
}

/// Checkerboard of `cell`-sized squares alternating between two greys.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> ImageRgb8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");
    ImageRgb8::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            grey(60)
        } else {
            grey(190)
        }
    })
}
