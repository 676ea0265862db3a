//! Colors for state codes and sensor lines
//!
//! Status registers are logged as bit strings. Two-bit codes and four-bit codes
//! each have a fixed color so the same state looks the same in every plot.
//! Colors are `[r, g, b, a]` byte arrays, converted to egui colors at the edge.

/// Color used for values that are not a recognized bit string
pub const FALLBACK_COLOR: [u8; 4] = rgb(0xf6, 0xff, 0xed);

/// Color for four-bit codes missing from the lookup tables
const UNLISTED_CODE_COLOR: [u8; 4] = rgb(0xd4, 0xed, 0xfa);

const fn rgb(r: u8, g: u8, b: u8) -> [u8; 4] {
    [r, g, b, 255]
}

const TWO_BIT_COLORS: &[(&str, [u8; 4])] = &[
    ("00", rgb(0xe6, 0xe6, 0xe6)),
    ("01", rgb(0xb3, 0xff, 0xd9)),
    ("10", rgb(0x99, 0xcf, 0xff)),
    ("11", rgb(0xff, 0x00, 0x00)),
];

const FOUR_BIT_LOW_COLORS: &[(&str, [u8; 4])] = &[
    ("0000", rgb(0xf2, 0xf2, 0xf2)),
    ("0001", rgb(0xd1, 0xff, 0xd6)),
    ("0010", rgb(0xcb, 0xe6, 0xff)),
    ("0011", rgb(0xff, 0xec, 0xc2)),
    ("0100", rgb(0xbf, 0xf2, 0xfa)),
    ("0101", rgb(0xc4, 0xf9, 0xcb)),
    ("0110", rgb(0xd6, 0xd8, 0xff)),
    ("0111", rgb(0xff, 0xfa, 0xcc)),
];

const FOUR_BIT_HIGH_COLORS: &[(&str, [u8; 4])] = &[
    ("1000", rgb(0xf2, 0xf2, 0xf2)),
    ("1001", rgb(0x44, 0xd1, 0x8d)),
    ("1010", rgb(0xff, 0xec, 0xc2)),
    ("1011", rgb(0xff, 0xec, 0xc2)),
    ("1100", rgb(0xff, 0xb3, 0xb3)),
    ("1101", rgb(0xff, 0x00, 0x00)),
    ("1110", rgb(0xff, 0xec, 0xc2)),
    ("1111", rgb(0xff, 0xec, 0xc2)),
];

fn lookup(table: &[(&str, [u8; 4])], code: &str) -> Option<[u8; 4]> {
    table.iter().find(|(k, _)| *k == code).map(|(_, c)| *c)
}

/// Trim whitespace and surrounding quotes from a raw state cell.
pub fn normalize_state(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// Background color for a state code.
pub fn state_color(raw: &str) -> [u8; 4] {
    let code = normalize_state(raw);
    if !code.chars().all(|c| c == '0' || c == '1') {
        return FALLBACK_COLOR;
    }
    match code.len() {
        2 => lookup(TWO_BIT_COLORS, code).unwrap_or(FALLBACK_COLOR),
        4 if code.starts_with('0') => {
            lookup(FOUR_BIT_LOW_COLORS, code).unwrap_or(UNLISTED_CODE_COLOR)
        }
        4 => lookup(FOUR_BIT_HIGH_COLORS, code).unwrap_or(UNLISTED_CODE_COLOR),
        _ => FALLBACK_COLOR,
    }
}

/// Map a two-bit AV status to a level: `11` is 1, `10` is 0, anything else -1.
pub fn av_level(raw: &str) -> i8 {
    match raw.trim() {
        "11" => 1,
        "10" => 0,
        _ => -1,
    }
}

/// Generate a distinct line color based on an index
///
/// Uses the golden ratio to spread hues evenly across the color wheel, with
/// medium saturation and value so lines read on light and dark themes.
pub fn series_color(index: usize) -> [u8; 4] {
    const GOLDEN_RATIO: f32 = 0.618_034;

    let hue = ((index as f32 * GOLDEN_RATIO) % 1.0) * 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.85);
    [r, g, b, 255]
}

/// Same color with a new alpha
pub fn with_alpha(color: [u8; 4], alpha: f32) -> [u8; 4] {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    [color[0], color[1], color[2], a]
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (u8, u8, u8) {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
