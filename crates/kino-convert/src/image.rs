/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Whole image helpers built on top of [`convert`](crate::convert)
use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use kino_core::bytestream::swap_samples;
use kino_core::info::LayerInfo;
use kino_core::pixel::{Interleave, PixelFormat, Proxy};

use crate::convert;

/// Dimensions of an image after a proxy scale is applied
pub const fn proxy_size(width: usize, height: usize, proxy: Proxy) -> (usize, usize) {
    (proxy.scale(width), proxy.scale(height))
}

/// Reverse the order of the rows in `data`
pub fn flip_rows(data: &mut [u8], row_bytes: usize) {
    if row_bytes == 0 {
        return;
    }
    let rows = data.len() / row_bytes;

    for y in 0..rows / 2 {
        let (top, bottom) = data.split_at_mut((rows - 1 - y) * row_bytes);
        top[y * row_bytes..(y + 1) * row_bytes].swap_with_slice(&mut bottom[..row_bytes]);
    }
}

/// Reverse the order of the pixels within every row of `data`
pub fn flip_columns(data: &mut [u8], row_bytes: usize, pixel_bytes: usize) {
    if row_bytes == 0 || pixel_bytes == 0 {
        return;
    }
    for row in data.chunks_exact_mut(row_bytes) {
        let pixels = row.len() / pixel_bytes;

        for x in 0..pixels / 2 {
            let (left, right) = row.split_at_mut((pixels - 1 - x) * pixel_bytes);
            left[x * pixel_bytes..(x + 1) * pixel_bytes]
                .swap_with_slice(&mut right[..pixel_bytes]);
        }
    }
}

/// Turn channel planes (`RRR..GGG..BBB..`) into interleaved pixels
///
/// Missing trailing planes are left as zeros.
pub fn interleave_planes(
    src: &[u8], width: usize, height: usize, channels: usize, sample_bytes: usize
) -> Vec<u8> {
    let plane_bytes = width * height * sample_bytes;
    let mut out = vec![0; plane_bytes * channels];

    if sample_bytes == 0 {
        return out;
    }
    for c in 0..channels {
        let Some(plane) = src.get(c * plane_bytes..(c + 1) * plane_bytes) else {
            break;
        };
        for (i, sample) in plane.chunks_exact(sample_bytes).enumerate() {
            let offset = (i * channels + c) * sample_bytes;
            out[offset..offset + sample_bytes].copy_from_slice(sample);
        }
    }
    out
}

/// Bring decoded pixels of `layer` into canonical layout and `dst_format`
///
/// Applies everything the layer's layout records: byte order, planar
/// storage, blue first channel order and mirroring, then subsamples by
/// `proxy`. The result is native endian, interleaved, RGB ordered,
/// with rows bottom to top.
pub fn convert_image(
    layer: &LayerInfo, src: &[u8], dst_format: PixelFormat, proxy: Proxy
) -> Vec<u8> {
    let layout = layer.layout;
    let format = layer.format;
    let mut pixels = Cow::Borrowed(src);

    if layout.endian.needs_swap() && format.sample_byte_width() > 1 {
        swap_samples(pixels.to_mut(), format.sample_byte_width());
    }
    if layout.interleave == Interleave::Planar
        && format.channels() > 1
        && format != PixelFormat::RGB_U10
    {
        pixels = Cow::Owned(interleave_planes(
            &pixels,
            layer.width,
            layer.height,
            format.channels(),
            format.sample_byte_width()
        ));
    }
    let (width, height) = proxy_size(layer.width, layer.height, proxy);
    let step = proxy.divisor();
    let src_row = layer.width * format.byte_width();
    let dst_row = width * dst_format.byte_width();

    let mut out = vec![0; dst_row * height];
    // subsampled columns are picked from the unmirrored row
    let flip_source = layout.mirror.x && step > 1;
    let mut scratch = Vec::new();

    for y in 0..height {
        let start = y * step * src_row;
        let Some(mut row) = pixels.get(start..(start + src_row).min(pixels.len())) else {
            break;
        };
        if flip_source {
            scratch.clear();
            scratch.extend_from_slice(row);
            flip_columns(&mut scratch, src_row, format.byte_width());
            row = scratch.as_slice();
        }
        let dst_y = if layout.mirror.y { height - 1 - y } else { y };

        convert(
            row,
            format,
            &mut out[dst_y * dst_row..(dst_y + 1) * dst_row],
            dst_format,
            width,
            step,
            layout.bgr
        );
    }
    if layout.mirror.x && !flip_source {
        flip_columns(&mut out, dst_row, dst_format.byte_width());
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kino_core::bytestream::ByteEndian;
    use kino_core::info::LayerInfo;
    use kino_core::pixel::{Interleave, Mirror, PixelFormat, Proxy};

    use crate::image::{convert_image, flip_columns, flip_rows, interleave_planes};

    #[test]
    fn flips() {
        let mut data = [1, 2, 3, 4, 5, 6];
        flip_rows(&mut data, 2);
        assert_eq!(data, [5, 6, 3, 4, 1, 2]);
        flip_columns(&mut data, 2, 1);
        assert_eq!(data, [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn planes_to_pixels() {
        let planes = [1, 2, 3, 4, 10, 20, 30, 40];
        let out = interleave_planes(&planes, 2, 2, 2, 1);
        assert_eq!(out, [1, 10, 2, 20, 3, 30, 4, 40]);
    }

    #[test]
    fn normalize_bgr_mirrored_image() {
        // 2x2 BGR image stored top to bottom
        let mut layer = LayerInfo::new(2, 2, PixelFormat::RGB_U8);
        layer.layout.bgr = true;
        layer.layout.mirror = Mirror { x: false, y: true };
        let src = [3, 2, 1, 6, 5, 4, 9, 8, 7, 12, 11, 10];

        let out = convert_image(&layer, &src, PixelFormat::RGB_U8, Proxy::None);
        assert_eq!(out, [7, 8, 9, 10, 11, 12, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn proxy_and_foreign_endian() {
        let mut layer = LayerInfo::new(4, 2, PixelFormat::L_U16);
        let foreign = match ByteEndian::native() {
            ByteEndian::LE => ByteEndian::BE,
            ByteEndian::BE => ByteEndian::LE
        };
        layer.layout.endian = foreign;
        let src: Vec<u8> = (0..8_u16)
            .flat_map(|v| match foreign {
                ByteEndian::BE => (v << 8).to_be_bytes(),
                ByteEndian::LE => (v << 8).to_le_bytes()
            })
            .collect();
        let out = convert_image(&layer, &src, PixelFormat::L_U8, Proxy::Half);
        // 2x1 result, samples 0 and 2 of row 0, high byte kept
        assert_eq!(out, [0, 2]);
    }

    #[test]
    fn proxy_of_mirrored_odd_width() {
        // stored right to left, unmirrored the row reads 1 2 3 4 5
        let mut layer = LayerInfo::new(5, 1, PixelFormat::L_U8);
        layer.layout.mirror = Mirror { x: true, y: false };
        let out = convert_image(&layer, &[5, 4, 3, 2, 1], PixelFormat::L_U8, Proxy::Half);
        assert_eq!(out, [1, 3]);

        let plain = LayerInfo::new(5, 1, PixelFormat::L_U8);
        let same = convert_image(&plain, &[1, 2, 3, 4, 5], PixelFormat::L_U8, Proxy::Half);
        assert_eq!(out, same);
    }

    #[test]
    fn mirrored_columns_without_proxy() {
        let mut layer = LayerInfo::new(3, 1, PixelFormat::L_U8);
        layer.layout.mirror = Mirror { x: true, y: false };
        let out = convert_image(&layer, &[3, 2, 1], PixelFormat::L_U8, Proxy::None);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn planar_layout() {
        let mut layer = LayerInfo::new(2, 1, PixelFormat::LA_U8);
        layer.layout.interleave = Interleave::Planar;
        let out = convert_image(&layer, &[1, 2, 100, 200], PixelFormat::LA_U8, Proxy::None);
        assert_eq!(out, [1, 100, 2, 200]);
    }
}
