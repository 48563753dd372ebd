/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Typed samples and how whole pixels are loaded from and stored to bytes
//!
//! Buffers handed to the engine are plain bytes with no alignment
//! guarantee, so every load and store goes through `from_ne_bytes`.
use half::f16;

/// A 10 bit sample, one field of a packed `RGB_U10` pixel
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct U10(pub u16);

impl U10 {
    pub const MAX: U10 = U10(1023);
}

/// A numeric sample type the engine can read and write
pub trait Sample: Copy + Default {
    /// Full intensity, used for synthesized alpha
    const MAX: Self;

    /// Average of three samples computed in this type, integers truncate
    fn average(r: Self, g: Self, b: Self) -> Self;

    /// Load the first `channels` samples of a pixel
    fn load_pixel(bytes: &[u8], channels: usize) -> [Self; 4];

    /// Store the first `channels` samples of `pixel`
    fn store_pixel(pixel: &[Self; 4], bytes: &mut [u8], channels: usize);
}

macro_rules! ne_sample {
    ($t:ty, $width:expr, $max:expr, |$r:ident, $g:ident, $b:ident| $avg:expr) => {
        impl Sample for $t {
            const MAX: Self = $max;

            #[inline(always)]
            fn average($r: Self, $g: Self, $b: Self) -> Self {
                $avg
            }

            #[inline(always)]
            fn load_pixel(bytes: &[u8], channels: usize) -> [Self; 4] {
                let mut pixel = [<$t>::default(); 4];
                for (value, chunk) in pixel
                    .iter_mut()
                    .zip(bytes.chunks_exact($width))
                    .take(channels)
                {
                    let mut raw = [0; $width];
                    raw.copy_from_slice(chunk);
                    *value = <$t>::from_ne_bytes(raw);
                }
                pixel
            }

            #[inline(always)]
            fn store_pixel(pixel: &[Self; 4], bytes: &mut [u8], channels: usize) {
                for (value, chunk) in pixel
                    .iter()
                    .zip(bytes.chunks_exact_mut($width))
                    .take(channels)
                {
                    chunk.copy_from_slice(&value.to_ne_bytes());
                }
            }
        }
    };
}

ne_sample!(u8, 1, u8::MAX, |r, g, b| {
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
});
ne_sample!(u16, 2, u16::MAX, |r, g, b| {
    ((u32::from(r) + u32::from(g) + u32::from(b)) / 3) as u16
});
ne_sample!(u32, 4, u32::MAX, |r, g, b| {
    ((u64::from(r) + u64::from(g) + u64::from(b)) / 3) as u32
});
ne_sample!(f32, 4, 1.0, |r, g, b| (r + g + b) / 3.0);
ne_sample!(f16, 2, f16::ONE, |r, g, b| {
    f16::from_f32((r.to_f32() + g.to_f32() + b.to_f32()) / 3.0)
});

impl Sample for U10 {
    const MAX: Self = U10::MAX;

    #[inline(always)]
    fn average(r: Self, g: Self, b: Self) -> Self {
        U10((r.0 + g.0 + b.0) / 3)
    }

    /// A packed pixel is a single native `u32`, `r << 22 | g << 12 | b << 2`
    #[inline(always)]
    fn load_pixel(bytes: &[u8], _: usize) -> [Self; 4] {
        let word = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        [
            U10(((word >> 22) & 0x3ff) as u16),
            U10(((word >> 12) & 0x3ff) as u16),
            U10(((word >> 2) & 0x3ff) as u16),
            U10::MAX
        ]
    }

    #[inline(always)]
    fn store_pixel(pixel: &[Self; 4], bytes: &mut [u8], _: usize) {
        let word = (u32::from(pixel[0].0 & 0x3ff) << 22)
            | (u32::from(pixel[1].0 & 0x3ff) << 12)
            | (u32::from(pixel[2].0 & 0x3ff) << 2);
        bytes[..4].copy_from_slice(&word.to_ne_bytes());
    }
}

/// Pack three 10 bit values into an `RGB_U10` word
pub const fn pack_u10(r: u16, g: u16, b: u16) -> u32 {
    ((r as u32 & 0x3ff) << 22) | ((g as u32 & 0x3ff) << 12) | ((b as u32 & 0x3ff) << 2)
}

/// Split an `RGB_U10` word into its three 10 bit values
pub const fn unpack_u10(word: u32) -> [u16; 3] {
    [
        ((word >> 22) & 0x3ff) as u16,
        ((word >> 12) & 0x3ff) as u16,
        ((word >> 2) & 0x3ff) as u16
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout() {
        let word = pack_u10(1023, 512, 1);
        assert_eq!(word, 0xFFE0_0004);
        assert_eq!(unpack_u10(word), [1023, 512, 1]);

        let bytes = word.to_ne_bytes();
        let pixel = U10::load_pixel(&bytes, 3);
        assert_eq!([pixel[0].0, pixel[1].0, pixel[2].0], [1023, 512, 1]);
    }

    #[test]
    fn averages_truncate_and_never_overflow() {
        assert_eq!(u8::average(255, 128, 0), 127);
        assert_eq!(u32::average(u32::MAX, u32::MAX, u32::MAX), u32::MAX);
        assert_eq!(U10::average(U10(1023), U10(1023), U10(1022)), U10(1022));
    }
}
