/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Sample rescaling between every pair of sample types
//!
//! - Widening integer conversions use tables built at compile time, a
//!   left shift would not map the source maximum onto the destination
//!   maximum (`255 << 2 == 1020`, not 1023).
//! - Narrowing integer conversions are right shifts and truncate.
//! - Integer to float divides by the integer maximum, float to integer
//!   multiplies, rounds and clamps.
//! - Float to float is a plain cast.
use half::f16;

use crate::sample::{Sample, U10};

/// Convert a sample of this type into a sample of type `D`
pub trait Rescale<D: Sample>: Sample {
    fn rescale(self) -> D;
}

/// `round(i * dst_max / src_max)` for every `i` in `0..=src_max`
const fn widen_u16<const N: usize>(src_max: u64, dst_max: u64) -> [u16; N] {
    let mut table = [0_u16; N];
    let mut i = 0;
    while i < N {
        table[i] = ((i as u64 * dst_max * 2 + src_max) / (src_max * 2)) as u16;
        i += 1;
    }
    table
}

const fn widen_u32<const N: usize>(src_max: u64, dst_max: u64) -> [u32; N] {
    let mut table = [0_u32; N];
    let mut i = 0;
    while i < N {
        table[i] = ((i as u64 * dst_max * 2 + src_max) / (src_max * 2)) as u32;
        i += 1;
    }
    table
}

pub(crate) static U8_TO_U10: [u16; 256] = widen_u16::<256>(255, 1023);
pub(crate) static U8_TO_U16: [u16; 256] = widen_u16::<256>(255, 65535);
pub(crate) static U8_TO_U32: [u32; 256] = widen_u32::<256>(255, 4294967295);
pub(crate) static U10_TO_U16: [u16; 1024] = widen_u16::<1024>(1023, 65535);
pub(crate) static U10_TO_U32: [u32; 1024] = widen_u32::<1024>(1023, 4294967295);

/// 65535 * 65537 == u32::MAX, so for 16 to 32 bits the rounded
/// interpolation is an exact multiply and needs no table
const U16_TO_U32_FACTOR: u32 = 65537;

/// `clamp(round(value * max), 0, max)`, NaN maps to zero
#[inline(always)]
fn quantize(value: f64, max: f64) -> f64 {
    let scaled = value * max;
    if !(scaled > 0.0) {
        0.0
    } else if scaled >= max {
        max
    } else {
        // positive, so truncating after adding a half rounds to nearest
        ((scaled + 0.5) as u64) as f64
    }
}

macro_rules! rescale {
    ($src:ty => $dst:ty, |$v:ident| $body:expr) => {
        impl Rescale<$dst> for $src {
            #[inline(always)]
            fn rescale(self) -> $dst {
                let $v = self;
                $body
            }
        }
    };
}

// 8 bit source
rescale!(u8 => u8, |v| v);
rescale!(u8 => U10, |v| U10(U8_TO_U10[usize::from(v)]));
rescale!(u8 => u16, |v| U8_TO_U16[usize::from(v)]);
rescale!(u8 => u32, |v| U8_TO_U32[usize::from(v)]);
rescale!(u8 => f16, |v| f16::from_f32(f32::from(v) / 255.0));
rescale!(u8 => f32, |v| f32::from(v) / 255.0);

// 10 bit source
rescale!(U10 => u8, |v| (v.0 >> 2) as u8);
rescale!(U10 => U10, |v| v);
rescale!(U10 => u16, |v| U10_TO_U16[usize::from(v.0 & 0x3ff)]);
rescale!(U10 => u32, |v| U10_TO_U32[usize::from(v.0 & 0x3ff)]);
rescale!(U10 => f16, |v| f16::from_f32(f32::from(v.0) / 1023.0));
rescale!(U10 => f32, |v| f32::from(v.0) / 1023.0);

// 16 bit source
rescale!(u16 => u8, |v| (v >> 8) as u8);
rescale!(u16 => U10, |v| U10(v >> 6));
rescale!(u16 => u16, |v| v);
rescale!(u16 => u32, |v| u32::from(v) * U16_TO_U32_FACTOR);
rescale!(u16 => f16, |v| f16::from_f32(f32::from(v) / 65535.0));
rescale!(u16 => f32, |v| f32::from(v) / 65535.0);

// 32 bit source
rescale!(u32 => u8, |v| (v >> 24) as u8);
rescale!(u32 => U10, |v| U10((v >> 22) as u16));
rescale!(u32 => u16, |v| (v >> 16) as u16);
rescale!(u32 => u32, |v| v);
rescale!(u32 => f16, |v| f16::from_f64(f64::from(v) / 4294967295.0));
rescale!(u32 => f32, |v| (f64::from(v) / 4294967295.0) as f32);

// half float source
rescale!(f16 => u8, |v| quantize(f64::from(v.to_f32()), 255.0) as u8);
rescale!(f16 => U10, |v| U10(quantize(f64::from(v.to_f32()), 1023.0) as u16));
rescale!(f16 => u16, |v| quantize(f64::from(v.to_f32()), 65535.0) as u16);
rescale!(f16 => u32, |v| quantize(f64::from(v.to_f32()), 4294967295.0) as u32);
rescale!(f16 => f16, |v| v);
rescale!(f16 => f32, |v| v.to_f32());

// float source
rescale!(f32 => u8, |v| quantize(f64::from(v), 255.0) as u8);
rescale!(f32 => U10, |v| U10(quantize(f64::from(v), 1023.0) as u16));
rescale!(f32 => u16, |v| quantize(f64::from(v), 65535.0) as u16);
rescale!(f32 => u32, |v| quantize(f64::from(v), 4294967295.0) as u32);
rescale!(f32 => f16, |v| f16::from_f32(v));
rescale!(f32 => f32, |v| v);

#[cfg(test)]
mod tests {
    use half::f16;

    use super::*;

    #[test]
    fn widening_tables_hit_both_ends() {
        assert_eq!((U8_TO_U10[0], U8_TO_U10[255]), (0, 1023));
        assert_eq!((U8_TO_U16[0], U8_TO_U16[255]), (0, 65535));
        assert_eq!((U8_TO_U32[0], U8_TO_U32[255]), (0, u32::MAX));
        assert_eq!((U10_TO_U16[0], U10_TO_U16[1023]), (0, 65535));
        assert_eq!((U10_TO_U32[0], U10_TO_U32[1023]), (0, u32::MAX));
        assert_eq!(Rescale::<u32>::rescale(u16::MAX), u32::MAX);
        assert_eq!(Rescale::<u32>::rescale(0_u16), 0);
    }

    #[test]
    fn widening_tables_are_monotonic() {
        assert!(U8_TO_U10.windows(2).all(|w| w[0] < w[1]));
        assert!(U10_TO_U16.windows(2).all(|w| w[0] < w[1]));
        // 128 / 255 * 1023 = 513.5..
        assert_eq!(U8_TO_U10[128], 514);
    }

    #[test]
    fn narrowing_truncates() {
        assert_eq!(Rescale::<u8>::rescale(0x01ff_u16), 0x01);
        assert_eq!(Rescale::<u8>::rescale(U10(1023)), 255);
        assert_eq!(Rescale::<U10>::rescale(u16::MAX), U10(1023));
        assert_eq!(Rescale::<u16>::rescale(0xABCD_1234_u32), 0xABCD);
    }

    #[test]
    fn float_round_trips_and_clamps() {
        assert_eq!(Rescale::<u8>::rescale(0.5_f32), 128);
        assert_eq!(Rescale::<u8>::rescale(2.0_f32), 255);
        assert_eq!(Rescale::<u8>::rescale(-1.0_f32), 0);
        assert_eq!(Rescale::<u16>::rescale(f32::NAN), 0);
        assert_eq!(Rescale::<u32>::rescale(1.0_f32), u32::MAX);
        assert_eq!(Rescale::<u8>::rescale(f16::ONE), 255);

        for v in 0..=255_u8 {
            let float: f32 = v.rescale();
            assert_eq!(Rescale::<u8>::rescale(float), v);
        }
    }
}
