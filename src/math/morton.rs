//! Morton encoding (Z-order curve) for 2D grid keys

/// Spread the 32 bits of `x` into the even bits of a 64-bit integer
fn spread_bits(x: u32) -> u64 {
    let mut x = x as u64;
    x = (x | (x << 16)) & 0x0000_ffff_0000_ffff;
    x = (x | (x << 8)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555;
    x
}

/// Compact the even bits of a 64-bit integer into a 32-bit integer
fn compact_bits(x: u64) -> u32 {
    let mut x = x & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x >> 4)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x >> 8)) & 0x0000_ffff_0000_ffff;
    x = (x | (x >> 16)) & 0x0000_0000_ffff_ffff;
    x as u32
}

/// Encode two 32-bit coordinates into a 64-bit Morton code.
///
/// Every bit of both inputs survives, so the mapping is a bijection
/// between `(u32, u32)` and `u64`.
pub fn encode_morton_2d(x: u32, z: u32) -> u64 {
    spread_bits(x) | (spread_bits(z) << 1)
}

/// Decode a Morton code back to its two coordinates
pub fn decode_morton_2d(code: u64) -> (u32, u32) {
    (compact_bits(code), compact_bits(code >> 1))
}
