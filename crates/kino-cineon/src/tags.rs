/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Moving header fields to and from image tags
//!
//! Only defined fields become tags. Tags that do not parse leave the
//! matching field undefined.
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kino_core::info::{tag_names, ImageInfo, Speed, Tags};

use crate::constants::MIN_FRAME_RATE;
use crate::header::{is_valid_f32, is_valid_i32, is_valid_u32, is_valid_u8, CineonHeader};

fn set_text(info: &mut ImageInfo, key: &str, value: &str) {
    if !value.is_empty() {
        info.set_tag(key, value);
    }
}

/// Copy the defined header fields into `info`'s tags
pub(crate) fn read_tags(header: &CineonHeader, info: &mut ImageInfo) {
    let source = &header.source;
    let film = &header.film;

    set_text(info, tag_names::TIME, &header.file.time);

    if source.offset.iter().all(|v| is_valid_i32(*v)) {
        info.set_tag(
            tag_names::SOURCE_OFFSET,
            format!("{} {}", source.offset[0], source.offset[1])
        );
    }
    set_text(info, tag_names::SOURCE_FILE, &source.file);
    set_text(info, tag_names::SOURCE_TIME, &source.time);
    set_text(info, tag_names::SOURCE_INPUT_DEVICE, &source.input_device);
    set_text(info, tag_names::SOURCE_INPUT_MODEL, &source.input_model);
    set_text(info, tag_names::SOURCE_INPUT_SERIAL, &source.input_serial);

    if source.input_pitch.iter().all(|v| is_valid_f32(*v)) {
        info.set_tag(
            tag_names::SOURCE_INPUT_PITCH,
            format!("{} {}", source.input_pitch[0], source.input_pitch[1])
        );
    }
    if is_valid_f32(source.gamma) {
        info.set_tag(tag_names::SOURCE_GAMMA, format!("{}", source.gamma));
    }

    if is_valid_u8(film.id)
        && is_valid_u8(film.kind)
        && is_valid_u8(film.offset)
        && is_valid_u32(film.prefix)
        && is_valid_u32(film.count)
    {
        info.set_tag(
            tag_names::KEYCODE,
            format!(
                "{}:{}:{}:{}:{}",
                film.id, film.kind, film.prefix, film.count, film.offset
            )
        );
    }
    set_text(info, tag_names::FILM_FORMAT, &film.format);

    if is_valid_u32(film.frame) {
        info.set_tag(tag_names::FILM_FRAME, format!("{}", film.frame));
    }
    if is_valid_f32(film.frame_rate) && film.frame_rate >= MIN_FRAME_RATE {
        info.set_tag(tag_names::FILM_FRAME_RATE, format!("{}", film.frame_rate));
        info.sequence.speed = Speed::from_fps(f64::from(film.frame_rate));
    }
    set_text(info, tag_names::FILM_FRAME_ID, &film.frame_id);
    set_text(info, tag_names::FILM_SLATE, &film.slate);
}

/// Parse `count` whitespace separated numbers, all or nothing
fn numbers<N: core::str::FromStr + Copy, const C: usize>(value: &str) -> Option<[N; C]> {
    let parsed: Vec<N> = value
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    parsed.try_into().ok()
}

fn text(tags: &Tags, key: &str) -> String {
    tags.get(key).cloned().unwrap_or_default()
}

/// Fill header fields from `tags`
pub(crate) fn write_tags(tags: &Tags, header: &mut CineonHeader) {
    let get = |key: &str| tags.get(key).map(String::as_str);

    header.file.time = text(tags, tag_names::TIME);

    if let Some([x, y]) = get(tag_names::SOURCE_OFFSET).and_then(numbers::<i32, 2>) {
        header.source.offset = [x, y];
    }
    header.source.file = text(tags, tag_names::SOURCE_FILE);
    header.source.time = text(tags, tag_names::SOURCE_TIME);
    header.source.input_device = text(tags, tag_names::SOURCE_INPUT_DEVICE);
    header.source.input_model = text(tags, tag_names::SOURCE_INPUT_MODEL);
    header.source.input_serial = text(tags, tag_names::SOURCE_INPUT_SERIAL);

    if let Some(pitch) = get(tag_names::SOURCE_INPUT_PITCH).and_then(numbers::<f32, 2>) {
        header.source.input_pitch = pitch;
    }
    if let Some([gamma]) = get(tag_names::SOURCE_GAMMA).and_then(numbers::<f32, 1>) {
        header.source.gamma = gamma;
    }

    if let Some(keycode) = get(tag_names::KEYCODE) {
        let fields: Vec<&str> = keycode.split(':').collect();

        if let [id, kind, prefix, count, offset] = fields[..] {
            let small = |v: &str| v.trim().parse::<u8>().ok();
            let large = |v: &str| v.trim().parse::<u32>().ok();

            if let (Some(id), Some(kind), Some(prefix), Some(count), Some(offset)) =
                (small(id), small(kind), large(prefix), large(count), small(offset))
            {
                header.film.id = id;
                header.film.kind = kind;
                header.film.prefix = prefix;
                header.film.count = count;
                header.film.offset = offset;
            }
        }
    }
    header.film.format = text(tags, tag_names::FILM_FORMAT);

    if let Some([frame]) = get(tag_names::FILM_FRAME).and_then(numbers::<u32, 1>) {
        header.film.frame = frame;
    }
    if let Some([rate]) = get(tag_names::FILM_FRAME_RATE).and_then(numbers::<f32, 1>) {
        header.film.frame_rate = rate;
    }
    header.film.frame_id = text(tags, tag_names::FILM_FRAME_ID);
    header.film.slate = text(tags, tag_names::FILM_SLATE);
}

#[cfg(test)]
mod tests {
    use kino_core::info::{tag_names, ImageInfo, Speed};

    use crate::header::CineonHeader;
    use crate::tags::{read_tags, write_tags};

    #[test]
    fn undefined_fields_produce_no_tags() {
        let mut info = ImageInfo::default();
        read_tags(&CineonHeader::undefined(), &mut info);
        assert!(info.tags.is_empty());
    }

    #[test]
    fn tags_survive_a_header() {
        let mut info = ImageInfo::default();
        for (key, value) in [
            (tag_names::TIME, "2023:01:01:12:00:00"),
            (tag_names::SOURCE_OFFSET, "10 -20"),
            (tag_names::SOURCE_INPUT_PITCH, "1.5 2"),
            (tag_names::SOURCE_GAMMA, "2.2"),
            (tag_names::KEYCODE, "1:2:300:4000:5"),
            (tag_names::FILM_FRAME, "86400"),
            (tag_names::FILM_FRAME_RATE, "24"),
            (tag_names::FILM_SLATE, "take 3")
        ] {
            info.set_tag(key, value);
        }
        let mut header = CineonHeader::undefined();
        write_tags(&info.tags, &mut header);

        assert_eq!(header.source.offset, [10, -20]);
        assert_eq!(header.source.input_pitch, [1.5, 2.0]);
        assert_eq!(header.film.prefix, 300);
        assert_eq!(header.film.offset, 5);

        let mut read = ImageInfo::default();
        read_tags(&header, &mut read);
        assert_eq!(read.tags, info.tags);
        assert_eq!(read.sequence.speed, Speed::new(24, 1));
    }

    #[test]
    fn malformed_tags_stay_undefined() {
        let mut info = ImageInfo::default();
        info.set_tag(tag_names::SOURCE_OFFSET, "10");
        info.set_tag(tag_names::KEYCODE, "1:2:3");
        info.set_tag(tag_names::FILM_FRAME, "many");

        let mut header = CineonHeader::undefined();
        write_tags(&info.tags, &mut header);

        let undefined = CineonHeader::undefined();
        assert_eq!(header.source.offset, undefined.source.offset);
        assert_eq!(header.film.id, undefined.film.id);
        assert_eq!(header.film.frame, undefined.film.frame);
    }

    #[test]
    fn tiny_frame_rates_are_ignored() {
        let mut header = CineonHeader::undefined();
        header.film.frame_rate = 0.0;
        let mut info = ImageInfo::default();
        read_tags(&header, &mut info);
        assert!(info.tag(tag_names::FILM_FRAME_RATE).is_none());
    }
}
