//! Native GeoTIFF codec built on the `tiff` crate.
//!
//! Supports the subset the pipeline needs: single-band images, f32 sample
//! storage, ModelPixelScaleTag/ModelTiepointTag georeferencing.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

/// Read a GeoTIFF file into a raster.
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let mut decoder =
        Decoder::new(file).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;
    let (rows, cols) = (height as usize, width as usize);

    let image = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match image {
        DecodingResult::F32(buf) => cast_buffer(&buf),
        DecodingResult::F64(buf) => cast_buffer(&buf),
        DecodingResult::U8(buf) => cast_buffer(&buf),
        DecodingResult::U16(buf) => cast_buffer(&buf),
        DecodingResult::U32(buf) => cast_buffer(&buf),
        DecodingResult::I16(buf) => cast_buffer(&buf),
        DecodingResult::I32(buf) => cast_buffer(&buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;
    if let Ok(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    Ok(raster)
}

fn cast_buffer<S, T>(buf: &[S]) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Recover a north-up geotransform from ModelPixelScale + ModelTiepoint.
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| Error::Other("No pixel scale tag".into()))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| Error::Other("No tiepoint tag".into()))?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(Error::Other("Cannot determine geotransform".into()));
    }

    // tiepoint: [I, J, K, X, Y, Z]; scale: [Sx, Sy, Sz]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Ok(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// Write a raster to a GeoTIFF file.
///
/// Samples are written as 32-bit floats regardless of `T`.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(file).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();
    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();
    let scale = vec![gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, scale.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;

    let tiepoint = vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, tiepoint.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

    // Minimal GeoKey directory: GTModelTypeGeoKey=2 (geographic),
    // GTRasterTypeGeoKey=1 (pixel-is-area).
    let geokeys: Vec<u16> = vec![
        1, 1, 0, 2, //
        1024, 0, 1, 2, //
        1025, 0, 1, 1, //
    ];
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, geokeys.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roundtrip_f64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.tif");

        let mut raster: Raster<f64> = Raster::new(8, 6);
        raster.set_transform(GeoTransform::new(78.58, 29.62, 0.001, -0.001));
        for row in 0..8 {
            for col in 0..6 {
                raster.set(row, col, (row * 6 + col) as f64 * 0.25).unwrap();
            }
        }

        write_geotiff(&raster, &path).unwrap();
        let back: Raster<f64> = read_geotiff(&path).unwrap();

        assert_eq!(back.shape(), (8, 6));
        assert_relative_eq!(back.get(3, 2).unwrap(), 5.0, epsilon = 1e-6);
        assert_relative_eq!(back.transform().origin_x, 78.58, epsilon = 1e-9);
        assert_relative_eq!(back.transform().pixel_height, -0.001, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip_class_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classified.tif");

        let mut raster: Raster<u8> = Raster::new(4, 4);
        raster.set(0, 0, 3).unwrap();
        raster.set(2, 2, 255).unwrap();

        write_geotiff(&raster, &path).unwrap();
        let back: Raster<u8> = read_geotiff(&path).unwrap();

        // Small integers survive the f32 representation exactly
        assert_eq!(back.get(0, 0).unwrap(), 3);
        assert_eq!(back.get(2, 2).unwrap(), 255);
        assert_eq!(back.get(1, 1).unwrap(), 0);
    }
}
