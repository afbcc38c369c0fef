// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use exif::Rational;
use geotag::{GeotagError, dms_to_degrees, read_geotag_from};
use std::io::Cursor;

fn rational(num: u32, denom: u32) -> Rational {
    Rational { num, denom }
}

fn put_entry(buf: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: [u8; 4]) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&field_type.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value);
}

fn put_rationals(buf: &mut Vec<u8>, rationals: &[(u32, u32)]) {
    for (num, denom) in rationals {
        buf.extend_from_slice(&num.to_le_bytes());
        buf.extend_from_slice(&denom.to_le_bytes());
    }
}

/// A little-endian TIFF whose GPS directory holds 47°15'36" N, 11°24'0" W.
fn geotagged_tiff() -> Vec<u8> {
    let mut buf = Vec::new();
    // Header, IFD0 at offset 8.
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());
    // IFD0: a single entry pointing at the GPS directory at offset 26.
    buf.extend_from_slice(&1u16.to_le_bytes());
    put_entry(&mut buf, 0x8825, 4, 1, 26u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    // GPS directory: refs inline, coordinates at offsets 80 and 104.
    buf.extend_from_slice(&4u16.to_le_bytes());
    put_entry(&mut buf, 0x0001, 2, 2, *b"N\0\0\0");
    put_entry(&mut buf, 0x0002, 5, 3, 80u32.to_le_bytes());
    put_entry(&mut buf, 0x0003, 2, 2, *b"W\0\0\0");
    put_entry(&mut buf, 0x0004, 5, 3, 104u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    put_rationals(&mut buf, &[(47, 1), (15, 1), (36, 1)]);
    put_rationals(&mut buf, &[(11, 1), (24, 1), (0, 1)]);
    buf
}

/// A little-endian TIFF with metadata but no GPS directory.
fn untagged_tiff() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    // ImageWidth = 1, nothing location related.
    put_entry(&mut buf, 0x0100, 3, 1, [1, 0, 0, 0]);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf
}

#[test]
pub fn geotag_extracted_with_hemisphere_signs() {
    let position = read_geotag_from(&mut Cursor::new(geotagged_tiff()))
        .unwrap()
        .expect("The fixture carries a geotag");
    assert!((position.latitude - 47.26).abs() < 1e-9);
    assert!((position.longitude - -11.4).abs() < 1e-9);
}

#[test]
pub fn image_without_gps_directory_has_no_geotag() {
    let position = read_geotag_from(&mut Cursor::new(untagged_tiff())).unwrap();
    assert_eq!(position, None);
}

#[test]
pub fn image_without_exif_data_has_no_geotag() {
    // A bare JPEG: start of image, end of image, no APP1 segment.
    let jpeg: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];
    let position = read_geotag_from(&mut Cursor::new(jpeg)).unwrap();
    assert_eq!(position, None);
}

#[test]
pub fn unparsable_file_is_an_error() {
    let result = read_geotag_from(&mut Cursor::new(b"plain text, not an image".as_slice()));
    assert!(matches!(result, Err(GeotagError::Metadata(_))));
}

#[test]
pub fn dms_converted_to_decimal_degrees() {
    let dms = [rational(47, 1), rational(15, 1), rational(36, 1)];
    let degrees = dms_to_degrees(&dms).unwrap();
    assert!((degrees - 47.26).abs() < 1e-9);
}

#[test]
pub fn fractional_rationals_are_honored() {
    // 11° 24' 45.54" stored as 4554/100 seconds.
    let dms = [rational(11, 1), rational(24, 1), rational(4554, 100)];
    let degrees = dms_to_degrees(&dms).unwrap();
    assert!((degrees - (11.0 + 24.0 / 60.0 + 45.54 / 3600.0)).abs() < 1e-9);
}

#[test]
pub fn degrees_only_geotag_converts() {
    let dms = [rational(47, 1)];
    assert_eq!(dms_to_degrees(&dms), Some(47.0));
}

#[test]
pub fn empty_dms_yields_none() {
    assert_eq!(dms_to_degrees(&[]), None);
}
