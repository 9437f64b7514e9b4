use std::f64::consts::PI;

/// ColorBrewer YlOrRd, 9 classes.
const YLORRD_9: [(u8, u8, u8); 9] = [
    (0xff, 0xff, 0xcc),
    (0xff, 0xed, 0xa0),
    (0xfe, 0xd9, 0x76),
    (0xfe, 0xb2, 0x4c),
    (0xfd, 0x8d, 0x3c),
    (0xfc, 0x4e, 0x2a),
    (0xe3, 0x1a, 0x1c),
    (0xbd, 0x00, 0x26),
    (0x80, 0x00, 0x26),
];

pub fn to_hex(r: f64, g: f64, b: f64) -> String {
    let channel = |v: f64| (v.clamp(0., 1.) * 255.).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// `n` evenly spaced colours of the classic "rainbow" colormap, purple to red.
pub fn rainbow_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }

    (0..n)
        .map(|i| {
            let x = if n == 1 { 0. } else { i as f64 / (n - 1) as f64 };
            to_hex(
                (2. * x - 0.5).abs(),
                (x * PI).sin(),
                (x * PI / 2.).cos(),
            )
        })
        .collect()
}

/// Linear YlOrRd ramp scaled to `[min, max]`, values outside are clamped.
pub fn ylorrd_color(value: f64, min: f64, max: f64) -> String {
    let t = if max > min {
        ((value - min) / (max - min)).clamp(0., 1.)
    } else {
        0.
    };

    let scaled = t * (YLORRD_9.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(YLORRD_9.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac) / 255.;
    let (a, b) = (YLORRD_9[lower], YLORRD_9[upper]);
    to_hex(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Colour of a segment on the overview map, given how many segments are shown.
pub fn segment_color(segment: u32, shown: usize) -> String {
    let n = shown.max(1);
    ylorrd_color((segment as usize % n) as f64, 1., n as f64)
}
