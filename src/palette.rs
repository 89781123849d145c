/// Colours shared by the SVG charts and the terminal dashboard.
pub type Rgb = (u8, u8, u8);

pub const FOCUS: Rgb = (0xe7, 0x4c, 0x3c);
pub const COMPETITOR: Rgb = (0x34, 0x98, 0xdb);
pub const MUTED: Rgb = (0x95, 0xa5, 0xa6);
pub const HIGHLIGHT: Rgb = (0xf3, 0x9c, 0x12);
pub const GROWTH: Rgb = (0x27, 0xae, 0x60);
pub const INK: Rgb = (0x2c, 0x3e, 0x50);
pub const BACKGROUND: Rgb = (0xf8, 0xf9, 0xfa);

const DISTINCT: [Rgb; 14] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
    (0xae, 0xc7, 0xe8),
    (0xff, 0xbb, 0x78),
    (0x98, 0xdf, 0x8a),
    (0xc5, 0xb0, 0xd5),
    (0xc4, 0x9c, 0x94),
];

/// Colour of the `idx`-th competitor; cycles past the end of the table.
pub fn distinct(idx: usize) -> Rgb {
    DISTINCT[idx % DISTINCT.len()]
}

/// One colour per bank: the focus bank in red, every other bank a distinct
/// colour in the order given.
pub fn bank_colours<'a>(
    banks: impl IntoIterator<Item = &'a str>,
    focus_bank: &str,
) -> Vec<(&'a str, Rgb)> {
    let mut next = 0;
    banks
        .into_iter()
        .map(|bank| {
            if bank == focus_bank {
                (bank, FOCUS)
            } else {
                next += 1;
                (bank, distinct(next - 1))
            }
        })
        .collect()
}

/// Yellow-orange-red ramp sampled at `t` in `[0, 1]`.
pub fn heat(t: f64) -> Rgb {
    const STOPS: [Rgb; 5] = [
        (0xff, 0xff, 0xcc),
        (0xfe, 0xd9, 0x76),
        (0xfd, 0x8d, 0x3c),
        (0xe3, 0x1a, 0x1c),
        (0x80, 0x00, 0x26),
    ];
    ramp(&STOPS, t)
}

/// Light-to-dark blue ramp.
pub fn blues(t: f64) -> Rgb {
    const STOPS: [Rgb; 3] = [(0xde, 0xeb, 0xf7), (0x6b, 0xae, 0xd6), (0x08, 0x30, 0x6b)];
    ramp(&STOPS, t)
}

fn ramp(stops: &[Rgb], t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (stops.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(stops.len() - 2);
    let frac = scaled - lo as f64;
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[lo], stops[lo + 1]);
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

pub fn to_hex((r, g, b): Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn from_hex(raw: &str) -> Option<Rgb> {
    let digits = raw.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_hits_both_ends() {
        assert_eq!(heat(0.0), (0xff, 0xff, 0xcc));
        assert_eq!(heat(1.0), (0x80, 0x00, 0x26));
        assert_eq!(heat(f64::NAN), heat(0.0));
        assert_eq!(blues(2.0), (0x08, 0x30, 0x6b));
    }

    #[test]
    fn hex_round_trips() {
        assert_eq!(to_hex(FOCUS), "#e74c3c");
        assert_eq!(from_hex("#e74c3c"), Some(FOCUS));
        assert_eq!(from_hex("e74c3c"), None);
        assert_eq!(from_hex("#zz0000"), None);
    }

    #[test]
    fn distinct_colours_cycle() {
        assert_eq!(distinct(0), distinct(14));
        assert_ne!(distinct(0), distinct(1));
    }

    #[test]
    fn focus_bank_is_always_red() {
        let colours = bank_colours(["A", "Focus", "B"], "Focus");
        assert_eq!(colours[0], ("A", distinct(0)));
        assert_eq!(colours[1], ("Focus", FOCUS));
        assert_eq!(colours[2], ("B", distinct(1)));
    }
}
