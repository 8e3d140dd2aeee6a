//! Chapter PDFs: one page per image, each page the size of its image.
//!
//! Nothing is re-encoded lossily. JPEG data goes into the PDF as-is
//! (`DCTDecode`); any other format is decoded and its pixels stored
//! Flate-compressed, with transparency kept as a soft mask.

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use tracing::instrument;

const IMAGE_NAME: &str = "Im0";

/// An image ready to be placed on a page.
struct Embedded {
    width: u32,
    height: u32,
    image: Stream,
    mask: Option<Stream>,
}

/// Writes `images` to `output` as a PDF, one page per image, in order.
///
/// Returns the number of pages.
#[instrument(skip(images, output), fields(output = %output.display(), pages = images.len()))]
pub fn package<P: AsRef<Path>>(images: &[P], output: &Path) -> Result<usize> {
    if images.is_empty() {
        exn::bail!(ErrorKind::NoPages);
    }
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(images.len());
    for image in images {
        let page = embed(image.as_ref())?;
        kids.push(add_page(&mut doc, pages_id, page, output)?.into());
    }
    let count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => count as i64 }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).or_raise(|| ErrorKind::Write(parent.to_path_buf()))?;
    }
    let file = File::create(output).or_raise(|| ErrorKind::Write(output.to_path_buf()))?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer).map_err(|e| pdf_error(output, e))?;
    writer.flush().or_raise(|| ErrorKind::Write(output.to_path_buf()))?;
    tracing::info!(pages = count, "Chapter PDF written");
    Ok(count)
}

fn pdf_error(output: &Path, e: impl std::fmt::Display) -> Error {
    tracing::error!(error = %e, "PDF writer failed");
    Error::from(ErrorKind::Pdf(output.to_path_buf()))
}

fn add_page(doc: &mut Document, parent: ObjectId, page: Embedded, output: &Path) -> Result<ObjectId> {
    let (width, height) = (i64::from(page.width), i64::from(page.height));
    let mut image = page.image;
    if let Some(mask) = page.mask {
        let mask_id = doc.add_object(mask);
        image.dict.set("SMask", mask_id);
    }
    let image_id = doc.add_object(image);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content = content.encode().map_err(|e| pdf_error(output, e))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
    let media_box = vec![Object::Integer(0), Object::Integer(0), Object::Integer(width), Object::Integer(height)];
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => media_box,
        "Resources" => dictionary! { "XObject" => dictionary! { IMAGE_NAME => image_id } },
        "Contents" => content_id
    }))
}

/// Reads the image at `path` into an image XObject.
fn embed(path: &Path) -> Result<Embedded> {
    let bytes = fs::read(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let format = image::guess_format(&bytes).or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
    if format == ImageFormat::Jpeg
        && let Some(page) = passthrough(&bytes)
    {
        return Ok(page);
    }
    tracing::debug!(path = %path.display(), format = ?format, "Embedding decoded pixels");
    let image =
        image::load_from_memory_with_format(&bytes, format).or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
    raster(image).or_raise(|| ErrorKind::Encode(path.to_path_buf()))
}

/// Wraps JPEG data as-is. `None` for JPEGs a PDF reader can't take verbatim
/// (CMYK, for one), which are decoded instead.
fn passthrough(bytes: &[u8]) -> Option<Embedded> {
    let decoder = JpegDecoder::new(Cursor::new(bytes)).ok()?;
    let (width, height) = decoder.dimensions();
    let color_space = match decoder.original_color_type() {
        ExtendedColorType::L8 => "DeviceGray",
        ExtendedColorType::Rgb8 => "DeviceRGB",
        _ => return None,
    };
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8_i64,
        "Filter" => "DCTDecode"
    };
    let image = Stream::new(dict, bytes.to_vec()).with_compression(false);
    Some(Embedded { width, height, image, mask: None })
}

/// Stores decoded pixels losslessly, splitting off any alpha channel.
fn raster(image: DynamicImage) -> std::io::Result<Embedded> {
    let (width, height) = (image.width(), image.height());
    let (gray, alpha, bits, samples) = match image {
        DynamicImage::ImageLuma8(i) => (true, false, 8, i.into_raw()),
        DynamicImage::ImageLumaA8(i) => (true, true, 8, i.into_raw()),
        DynamicImage::ImageRgb8(i) => (false, false, 8, i.into_raw()),
        DynamicImage::ImageRgba8(i) => (false, true, 8, i.into_raw()),
        DynamicImage::ImageLuma16(i) => (true, false, 16, big_endian(i.as_raw())),
        DynamicImage::ImageLumaA16(i) => (true, true, 16, big_endian(i.as_raw())),
        DynamicImage::ImageRgb16(i) => (false, false, 16, big_endian(i.as_raw())),
        DynamicImage::ImageRgba16(i) => (false, true, 16, big_endian(i.as_raw())),
        other => (false, true, 16, big_endian(other.to_rgba16().as_raw())),
    };
    let channels = if gray { 1 } else { 3 };
    let (color, mask) = split_alpha(&samples, channels, bits / 8, alpha);
    let color_space = if gray { "DeviceGray" } else { "DeviceRGB" };
    let image = flate_image(width, height, color_space, bits, &color)?;
    let mask = match mask.filter(|m| m.iter().any(|&b| b != u8::MAX)) {
        Some(mask) => Some(flate_image(width, height, "DeviceGray", bits, &mask)?),
        None => None,
    };
    Ok(Embedded { width, height, image, mask })
}

fn big_endian(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

/// Separates interleaved samples into colour and alpha planes.
fn split_alpha(samples: &[u8], channels: usize, sample_bytes: usize, alpha: bool) -> (Vec<u8>, Option<Vec<u8>>) {
    if !alpha {
        return (samples.to_vec(), None);
    }
    let color_bytes = channels * sample_bytes;
    let pixel_bytes = color_bytes + sample_bytes;
    let pixels = samples.len() / pixel_bytes;
    let mut color = Vec::with_capacity(pixels * color_bytes);
    let mut mask = Vec::with_capacity(pixels * sample_bytes);
    for pixel in samples.chunks_exact(pixel_bytes) {
        color.extend_from_slice(&pixel[..color_bytes]);
        mask.extend_from_slice(&pixel[color_bytes..]);
    }
    (color, Some(mask))
}

fn flate_image(width: u32, height: u32, color_space: &str, bits: usize, data: &[u8]) -> std::io::Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let data = encoder.finish()?;
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => bits as i64,
        "Filter" => "FlateDecode"
    };
    Ok(Stream::new(dict, data).with_compression(false))
}
