//! Packed `0xRRGGBB` color helpers used by the tint and blend strategies.

#[inline]
pub fn split(color: u32) -> (u32, u32, u32) {
    ((color >> 16) & 0xff, (color >> 8) & 0xff, color & 0xff)
}

#[inline]
pub fn pack(r: u32, g: u32, b: u32) -> u32 {
    ((r & 0xff) << 16) | ((g & 0xff) << 8) | (b & 0xff)
}

/// Blend two colors channel by channel. `percent` is clamped to [0, 1].
pub fn blend(from: u32, to: u32, percent: f32) -> u32 {
    let t = percent.clamp(0.0, 1.0);
    let (r1, g1, b1) = split(from);
    let (r2, g2, b2) = split(to);
    let channel = |a: u32, b: u32| -> u32 {
        let v = a as f32 + (b as f32 - a as f32) * t;
        v.round().clamp(0.0, 255.0) as u32
    };
    pack(channel(r1, r2), channel(g1, g2), channel(b1, b2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_pack_are_inverse() {
        let (r, g, b) = split(0x12ab9f);
        assert_eq!((r, g, b), (0x12, 0xab, 0x9f));
        assert_eq!(pack(r, g, b), 0x12ab9f);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xff0000, 0x0000ff, 0.0), 0xff0000);
        assert_eq!(blend(0xff0000, 0x0000ff, 1.0), 0x0000ff);
    }

    #[test]
    fn blend_channels_independently() {
        let mid = blend(0x000000, 0xfe80fe, 0.5);
        assert_eq!(split(mid), (0x7f, 0x40, 0x7f));
    }
}
