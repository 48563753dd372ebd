/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Pixel format conversion for the kino image crates
//!
//! [`convert`] turns `pixel_count` pixels of any [`PixelFormat`] into any other,
//! the entry point every decoder output goes through before an image
//! reaches its canonical layout.
//!
//! # Example
//! ```
//! use kino_convert::convert;
//! use kino_core::pixel::PixelFormat;
//!
//! let mut out = [0_u8; 4];
//! convert(&[200], PixelFormat::L_U8, &mut out, PixelFormat::RGBA_U8, 1, 1, false);
//! assert_eq!(out, [200, 200, 200, 255]);
//! ```
//!
//! Conversion never fails, buffers too small for `pixel_count` pixels
//! simply convert as many pixels as fit.
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use half::f16;
use kino_core::pixel::{PixelFormat, PixelType};

pub use crate::image::{convert_image, flip_columns, flip_rows, interleave_planes, proxy_size};
pub use crate::rescale::Rescale;
pub use crate::sample::{pack_u10, unpack_u10, Sample, U10};

mod image;
mod rescale;
mod sample;

/// Channel arrangement of a format, the half of the dispatch key
/// that decides how channels are mapped
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Channels {
    L,
    LA,
    Rgb,
    Rgba
}

impl Channels {
    fn of(format: PixelFormat) -> Channels {
        match format.channels() {
            1 => Channels::L,
            2 => Channels::LA,
            3 => Channels::Rgb,
            _ => Channels::Rgba
        }
    }
    const fn count(self) -> usize {
        match self {
            Channels::L => 1,
            Channels::LA => 2,
            Channels::Rgb => 3,
            Channels::Rgba => 4
        }
    }
}

/// Geometry of one conversion call, shared by every typed routine
#[derive(Copy, Clone)]
struct Plan {
    src:        Channels,
    dst:        Channels,
    src_width:  usize,
    dst_width:  usize,
    src_step:   usize,
    count:      usize,
    swap_rb:    bool
}

/// Convert `pixel_count` pixels from `src_format` to `dst_format`
///
/// Every source pixel is read `src_stride` pixels after the previous one,
/// destination pixels are always contiguous. A stride of zero is treated
/// as one. With `bgr` set, red and blue of a three or four channel source
/// are read swapped, alpha is never touched.
///
/// Samples are native endian and interleaved on both sides.
pub fn convert(
    src: &[u8], src_format: PixelFormat, dst: &mut [u8], dst_format: PixelFormat,
    pixel_count: usize, src_stride: usize, bgr: bool
) {
    let src_width = src_format.byte_width();
    let dst_width = dst_format.byte_width();
    let stride = src_stride.max(1);

    let src_fits = if src.len() < src_width {
        0
    } else {
        (src.len() - src_width) / (src_width * stride) + 1
    };
    let count = pixel_count.min(src_fits).min(dst.len() / dst_width);

    if count == 0 {
        return;
    }
    if src_format == dst_format && stride == 1 && !bgr {
        let bytes = count * dst_width;
        dst[..bytes].copy_from_slice(&src[..bytes]);
        return;
    }
    let plan = Plan {
        src: Channels::of(src_format),
        dst: Channels::of(dst_format),
        src_width,
        dst_width,
        src_step: src_width * stride,
        count,
        swap_rb: bgr && src_format.channels() >= 3
    };

    use PixelType as P;
    match (src_format.pixel_type(), dst_format.pixel_type()) {
        (P::U8, P::U8) => typed::<u8, u8>(src, dst, plan),
        (P::U8, P::U10) => typed::<u8, U10>(src, dst, plan),
        (P::U8, P::U16) => typed::<u8, u16>(src, dst, plan),
        (P::U8, P::U32) => typed::<u8, u32>(src, dst, plan),
        (P::U8, P::F16) => typed::<u8, f16>(src, dst, plan),
        (P::U8, P::F32) => typed::<u8, f32>(src, dst, plan),

        (P::U10, P::U8) => typed::<U10, u8>(src, dst, plan),
        (P::U10, P::U10) => typed::<U10, U10>(src, dst, plan),
        (P::U10, P::U16) => typed::<U10, u16>(src, dst, plan),
        (P::U10, P::U32) => typed::<U10, u32>(src, dst, plan),
        (P::U10, P::F16) => typed::<U10, f16>(src, dst, plan),
        (P::U10, P::F32) => typed::<U10, f32>(src, dst, plan),

        (P::U16, P::U8) => typed::<u16, u8>(src, dst, plan),
        (P::U16, P::U10) => typed::<u16, U10>(src, dst, plan),
        (P::U16, P::U16) => typed::<u16, u16>(src, dst, plan),
        (P::U16, P::U32) => typed::<u16, u32>(src, dst, plan),
        (P::U16, P::F16) => typed::<u16, f16>(src, dst, plan),
        (P::U16, P::F32) => typed::<u16, f32>(src, dst, plan),

        (P::U32, P::U8) => typed::<u32, u8>(src, dst, plan),
        (P::U32, P::U10) => typed::<u32, U10>(src, dst, plan),
        (P::U32, P::U16) => typed::<u32, u16>(src, dst, plan),
        (P::U32, P::U32) => typed::<u32, u32>(src, dst, plan),
        (P::U32, P::F16) => typed::<u32, f16>(src, dst, plan),
        (P::U32, P::F32) => typed::<u32, f32>(src, dst, plan),

        (P::F16, P::U8) => typed::<f16, u8>(src, dst, plan),
        (P::F16, P::U10) => typed::<f16, U10>(src, dst, plan),
        (P::F16, P::U16) => typed::<f16, u16>(src, dst, plan),
        (P::F16, P::U32) => typed::<f16, u32>(src, dst, plan),
        (P::F16, P::F16) => typed::<f16, f16>(src, dst, plan),
        (P::F16, P::F32) => typed::<f16, f32>(src, dst, plan),

        (P::F32, P::U8) => typed::<f32, u8>(src, dst, plan),
        (P::F32, P::U10) => typed::<f32, U10>(src, dst, plan),
        (P::F32, P::U16) => typed::<f32, u16>(src, dst, plan),
        (P::F32, P::U32) => typed::<f32, u32>(src, dst, plan),
        (P::F32, P::F16) => typed::<f32, f16>(src, dst, plan),
        (P::F32, P::F32) => typed::<f32, f32>(src, dst, plan)
    }
}

/// Pick the channel mapping once, then run it over every pixel
fn typed<S, D>(src: &[u8], dst: &mut [u8], plan: Plan)
where
    S: Rescale<D>,
    D: Sample
{
    use Channels::*;

    let max = D::MAX;
    let zero = D::default();
    let r = |v: S| -> D { v.rescale() };

    match (plan.src, plan.dst) {
        (L, L) | (LA, L) => map(src, dst, plan, |p: [S; 4]| [r(p[0]), zero, zero, zero]),
        (L, LA) => map(src, dst, plan, |p: [S; 4]| [r(p[0]), max, zero, zero]),
        (L, Rgb) | (LA, Rgb) => map(src, dst, plan, |p: [S; 4]| {
            let l = r(p[0]);
            [l, l, l, zero]
        }),
        (L, Rgba) => map(src, dst, plan, |p: [S; 4]| {
            let l = r(p[0]);
            [l, l, l, max]
        }),
        (LA, LA) => map(src, dst, plan, |p: [S; 4]| [r(p[0]), r(p[1]), zero, zero]),
        (LA, Rgba) => map(src, dst, plan, |p: [S; 4]| {
            let l = r(p[0]);
            [l, l, l, r(p[1])]
        }),
        (Rgb, L) | (Rgba, L) => map(src, dst, plan, |p: [S; 4]| {
            [r(S::average(p[0], p[1], p[2])), zero, zero, zero]
        }),
        (Rgb, LA) => map(src, dst, plan, |p: [S; 4]| {
            [r(S::average(p[0], p[1], p[2])), max, zero, zero]
        }),
        (Rgba, LA) => map(src, dst, plan, |p: [S; 4]| {
            [r(S::average(p[0], p[1], p[2])), r(p[3]), zero, zero]
        }),
        (Rgb, Rgb) | (Rgba, Rgb) => {
            map(src, dst, plan, |p: [S; 4]| [r(p[0]), r(p[1]), r(p[2]), zero])
        }
        (Rgb, Rgba) => map(src, dst, plan, |p: [S; 4]| [r(p[0]), r(p[1]), r(p[2]), max]),
        (Rgba, Rgba) => map(src, dst, plan, |p: [S; 4]| [r(p[0]), r(p[1]), r(p[2]), r(p[3])])
    }
}

#[inline(always)]
fn map<S, D, F>(src: &[u8], dst: &mut [u8], plan: Plan, pixel_fn: F)
where
    S: Sample,
    D: Sample,
    F: Fn([S; 4]) -> [D; 4]
{
    let src_channels = plan.src.count();
    let dst_channels = plan.dst.count();

    for (i, out) in dst
        .chunks_exact_mut(plan.dst_width)
        .take(plan.count)
        .enumerate()
    {
        let offset = i * plan.src_step;
        let mut pixel = S::load_pixel(&src[offset..offset + plan.src_width], src_channels);
        if plan.swap_rb {
            pixel.swap(0, 2);
        }
        D::store_pixel(&pixel_fn(pixel), out, dst_channels);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use half::f16;
    use kino_core::pixel::PixelFormat;
    use nanorand::{Rng, WyRand};

    use crate::{convert, pack_u10, unpack_u10};

    fn one(src: &[u8], from: PixelFormat, to: PixelFormat) -> Vec<u8> {
        let mut out = vec![0; to.byte_width()];
        convert(src, from, &mut out, to, 1, 1, false);
        out
    }

    #[test]
    fn rgb_to_luminance_truncates() {
        assert_eq!(one(&[255, 128, 0], PixelFormat::RGB_U8, PixelFormat::L_U8), [127]);
    }

    #[test]
    fn luminance_expands_with_opaque_alpha() {
        assert_eq!(
            one(&[200], PixelFormat::L_U8, PixelFormat::RGBA_U8),
            [200, 200, 200, 255]
        );
        assert_eq!(one(&[9], PixelFormat::L_U8, PixelFormat::LA_U8), [9, 255]);
    }

    #[test]
    fn identity_is_a_byte_copy() {
        let mut rng = WyRand::new_seed(21);
        for format in PixelFormat::ALL {
            let mut src = vec![0_u8; 17 * format.byte_width()];
            rng.fill(&mut src);
            let mut dst = vec![0_u8; src.len()];
            convert(&src, format, &mut dst, format, 17, 1, false);
            assert_eq!(src, dst, "{format}");
        }
    }

    #[test]
    fn integer_identity_through_the_typed_path() {
        // a stride of one with bgr on twice restores the data
        let src = [1_u8, 2, 3, 4, 5, 6, 7, 8];
        let mut swapped = [0_u8; 8];
        let mut back = [0_u8; 8];
        convert(&src, PixelFormat::RGBA_U8, &mut swapped, PixelFormat::RGBA_U8, 2, 1, true);
        assert_eq!(swapped, [3, 2, 1, 4, 7, 6, 5, 8]);
        convert(&swapped, PixelFormat::RGBA_U8, &mut back, PixelFormat::RGBA_U8, 2, 1, true);
        assert_eq!(back, src);
    }

    #[test]
    fn every_pair_is_handled() {
        // full intensity white stays full intensity white in every format
        let mut white = Vec::new();
        for from in PixelFormat::ALL {
            white.clear();
            for _ in 0..from.channels() {
                match from.pixel_type() {
                    kino_core::pixel::PixelType::U8 => white.push(255),
                    kino_core::pixel::PixelType::U16 => white.extend(u16::MAX.to_ne_bytes()),
                    kino_core::pixel::PixelType::U32 => white.extend(u32::MAX.to_ne_bytes()),
                    kino_core::pixel::PixelType::F16 => white.extend(f16::ONE.to_ne_bytes()),
                    kino_core::pixel::PixelType::F32 => white.extend(1.0_f32.to_ne_bytes()),
                    kino_core::pixel::PixelType::U10 => {}
                }
            }
            if from == PixelFormat::RGB_U10 {
                white.extend(pack_u10(1023, 1023, 1023).to_ne_bytes());
            }
            for to in PixelFormat::ALL {
                let out = one(&white, from, to);
                let back = one(&out, to, from);
                assert_eq!(back, white, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn ten_bit_rows() {
        let word = one(&[255, 0, 128], PixelFormat::RGB_U8, PixelFormat::RGB_U10);
        let word = u32::from_ne_bytes([word[0], word[1], word[2], word[3]]);
        assert_eq!(unpack_u10(word), [1023, 0, 514]);

        let rgba = one(&word.to_ne_bytes(), PixelFormat::RGB_U10, PixelFormat::RGBA_U16);
        let rgba: Vec<u16> = rgba
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(rgba[0], 65535);
        assert_eq!(rgba[1], 0);
        assert_eq!(rgba[3], 65535);
    }

    #[test]
    fn bgr_swap_never_touches_alpha() {
        let out = one(&[10, 20, 30, 40], PixelFormat::RGBA_U8, PixelFormat::RGBA_U8);
        assert_eq!(out, [10, 20, 30, 40]);

        let mut out = [0_u8; 4];
        convert(&[10, 20, 30], PixelFormat::RGB_U8, &mut out, PixelFormat::RGBA_U8, 1, 1, true);
        assert_eq!(out, [30, 20, 10, 255]);

        let mut out = [0_u8; 2];
        convert(&[10, 20, 30, 40], PixelFormat::RGBA_U8, &mut out, PixelFormat::LA_U8, 1, 1, true);
        assert_eq!(out, [20, 40]);
    }

    #[test]
    fn stride_subsamples_and_short_buffers_are_clamped() {
        let src: Vec<u8> = (0..16).collect();
        let mut out = [0_u8; 8];
        convert(&src, PixelFormat::L_U8, &mut out, PixelFormat::L_U8, 8, 2, false);
        assert_eq!(out, [0, 2, 4, 6, 8, 10, 12, 14]);

        let mut out = [0xAA_u8; 8];
        convert(&src[..3], PixelFormat::L_U8, &mut out, PixelFormat::L_U8, 8, 2, false);
        assert_eq!(out, [0, 2, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn float_and_integer_meet_in_the_middle() {
        let out = one(&0.5_f32.to_ne_bytes(), PixelFormat::L_F32, PixelFormat::L_U8);
        assert_eq!(out, [128]);

        let out = one(&[51], PixelFormat::L_U8, PixelFormat::L_F32);
        let value = f32::from_ne_bytes([out[0], out[1], out[2], out[3]]);
        assert!((value - 0.2).abs() < 1e-6);

        let out = one(&f16::from_f32(0.25).to_ne_bytes(), PixelFormat::L_F16, PixelFormat::L_F32);
        assert_eq!(f32::from_ne_bytes([out[0], out[1], out[2], out[3]]), 0.25);
    }
}
