// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Geotag extraction for the mock location injector
//!
//! Reads the GPS directory of an image's EXIF metadata and hands the
//! injection core a [`Position`], or `None` when the image carries no
//! geotag. The coordinate is passed through as parsed, without range
//! validation.

use common::position::Position;
use exif::{Exif, In, Rational, Tag, Value};
use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};
use thiserror::Error;
use tracing::debug;

/// Errors reported while reading an image's geotag.
///
/// A missing geotag is not an error; it is the `Ok(None)` case.
#[derive(Debug, Error)]
pub enum GeotagError {
    /// The image file could not be opened or read.
    #[error("failed to read the image file")]
    Io(#[from] std::io::Error),

    /// The file is no image format the EXIF parser understands, or its
    /// metadata is malformed.
    #[error("failed to parse the image metadata")]
    Metadata(#[from] exif::Error),
}

/// Reads the geotag of the image at `path`.
///
/// # Returns
///
/// * `Ok(Some(position))` – The image carries a GPS latitude and longitude.
/// * `Ok(None)` – The image has no EXIF data or no usable GPS directory.
/// * `Err(_)` – The file could not be read or is not a parsable image.
pub fn read_geotag(path: &Path) -> Result<Option<Position>, GeotagError> {
    let file = File::open(path)?;
    read_geotag_from(&mut BufReader::new(file))
}

/// Reads the geotag from an already opened image stream.
///
/// See [`read_geotag`] for the result contract.
pub fn read_geotag_from<R: BufRead + Seek>(reader: &mut R) -> Result<Option<Position>, GeotagError> {
    let exif = match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            debug!("Image carries no EXIF data");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let Some(latitude) = axis_degrees(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S') else {
        return Ok(None);
    };
    let Some(longitude) = axis_degrees(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W') else {
        return Ok(None);
    };
    Ok(Some(Position::new(&latitude, &longitude)))
}

/// Resolves one GPS axis to signed decimal degrees.
///
/// Returns `None` when the value or reference tag is missing or not of
/// the expected type, which callers treat as "no geotag".
fn axis_degrees(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let Value::Rational(ref dms) = field.value else {
        return None;
    };
    let degrees = dms_to_degrees(dms)?;
    let reference = exif.get_field(ref_tag, In::PRIMARY)?;
    let Value::Ascii(ref refs) = reference.value else {
        return None;
    };
    let hemisphere = refs.first()?.first().copied()?;
    if hemisphere.eq_ignore_ascii_case(&negative_ref) {
        Some(-degrees)
    } else {
        Some(degrees)
    }
}

/// Converts an EXIF degrees/minutes/seconds triple to decimal degrees.
///
/// Missing minutes or seconds count as zero; an empty slice yields
/// `None`. The rationals are taken as stored, so a zero denominator
/// propagates as a non-finite value.
pub fn dms_to_degrees(dms: &[Rational]) -> Option<f64> {
    let degrees = dms.first()?.to_f64();
    let minutes = dms.get(1).map_or(0.0, |r| r.to_f64());
    let seconds = dms.get(2).map_or(0.0, |r| r.to_f64());
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}
