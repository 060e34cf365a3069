use std::panic::{self, AssertUnwindSafe};

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;
use tracing::debug;

/// Page width used when a page carries no readable MediaBox (US Letter).
const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

const POINTS_PER_INCH: f32 = 72.0;

/// Largest bitmap handed to OCR, in pixels (A4 at 1200 DPI is about 140M).
const MAX_RASTER_PIXELS: u64 = 160_000_000;

/// Bound on `Parent` hops when resolving inherited page attributes.
const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to load PDF for rasterization: {0}")]
    Load(String),
    #[error("Page {0} does not exist")]
    PageOutOfRange(usize),
    #[error("Failed to decode page image: {0}")]
    Decode(String),
    #[error("Page image of {width}x{height} exceeds the rasterization budget")]
    TooLarge { width: u64, height: u64 },
    #[error("PDF parser panicked during rasterization")]
    Panicked,
}

/// Produce a bitmap of one page (zero-based index) at no less than `dpi`.
/// `Ok(None)` means the page has nothing to rasterize.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(
        &self,
        pdf: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<Option<DynamicImage>, RasterError>;
}

/// Rasterizes scanned pages by lifting the page's largest embedded image
/// XObject, which for scanner output is the whole page. JPEG streams are
/// decoded directly; raw or Flate-compressed 8-bit gray/RGB samples are
/// rebuilt from the image dictionary.
pub struct EmbeddedImageRasterizer;

impl PageRasterizer for EmbeddedImageRasterizer {
    fn rasterize(
        &self,
        pdf: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<Option<DynamicImage>, RasterError> {
        panic::catch_unwind(AssertUnwindSafe(|| rasterize_page(pdf, page_index, dpi)))
            .unwrap_or(Err(RasterError::Panicked))
    }
}

fn rasterize_page(
    pdf: &[u8],
    page_index: usize,
    dpi: u32,
) -> Result<Option<DynamicImage>, RasterError> {
    let doc = Document::load_mem(pdf).map_err(|e| RasterError::Load(e.to_string()))?;
    let page_number =
        u32::try_from(page_index + 1).map_err(|_| RasterError::PageOutOfRange(page_index))?;
    let page_id = *doc
        .get_pages()
        .get(&page_number)
        .ok_or(RasterError::PageOutOfRange(page_index))?;

    let mut best: Option<DynamicImage> = None;
    for stream in page_images(&doc, page_id) {
        match decode_image(stream) {
            Ok(Some(img)) => {
                let area = u64::from(img.width()) * u64::from(img.height());
                let best_area = best
                    .as_ref()
                    .map_or(0, |b| u64::from(b.width()) * u64::from(b.height()));
                if area > best_area {
                    best = Some(img);
                }
            }
            Ok(None) => debug!(page = page_index, "skipping unsupported image encoding"),
            Err(e) => debug!(page = page_index, error = %e, "skipping undecodable image"),
        }
    }

    let Some(image) = best else {
        return Ok(None);
    };
    let width_pt = inherited(&doc, page_id, b"MediaBox")
        .and_then(|o| media_box_width(&doc, o))
        .unwrap_or(DEFAULT_PAGE_WIDTH_PT);
    scale_to_dpi(image, width_pt, dpi).map(Some)
}

/// Look up a page attribute, walking up the page tree for inherited values.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    doc.dereference(obj).ok()?.1.as_dict().ok()
}

fn page_images<'a>(doc: &'a Document, page_id: ObjectId) -> Vec<&'a Stream> {
    let Some(resources) = inherited(doc, page_id, b"Resources").and_then(|o| resolve_dict(doc, o))
    else {
        return Vec::new();
    };
    let Some(xobjects) = resources.get(b"XObject").ok().and_then(|o| resolve_dict(doc, o)) else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(_, obj)| doc.dereference(obj).ok())
        .filter_map(|(_, obj)| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|name| name == b"Image")
                .unwrap_or(false)
        })
        .collect()
}

fn filter_names(dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(<[u8]>::to_vec)
            .collect(),
        _ => Vec::new(),
    }
}

fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .and_then(Object::as_i64)
        .ok()
        .and_then(|v| u32::try_from(v).ok())
}

fn decode_image(stream: &Stream) -> Result<Option<DynamicImage>, RasterError> {
    let filters = filter_names(&stream.dict);
    if filters.iter().any(|f| f == b"DCTDecode") {
        return image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
            .map(Some)
            .map_err(|e| RasterError::Decode(e.to_string()));
    }
    // JBIG2 / CCITT / JPEG2000 scans need decoders we do not carry.
    if filters.iter().any(|f| f != b"FlateDecode") {
        return Ok(None);
    }

    let width = dict_u32(&stream.dict, b"Width");
    let height = dict_u32(&stream.dict, b"Height");
    let (Some(width), Some(height)) = (width, height) else {
        return Ok(None);
    };
    if dict_u32(&stream.dict, b"BitsPerComponent").unwrap_or(8) != 8 {
        return Ok(None);
    }

    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream
            .decompressed_content()
            .map_err(|e| RasterError::Decode(e.to_string()))?
    };

    let pixels = width as usize * height as usize;
    if pixels == 0 {
        return Ok(None);
    }
    let image = match samples.len() / pixels {
        1 => GrayImage::from_raw(width, height, samples[..pixels].to_vec())
            .map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, samples[..pixels * 3].to_vec())
            .map(DynamicImage::ImageRgb8),
        _ => None,
    };
    Ok(image)
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn media_box_width(doc: &Document, obj: &Object) -> Option<f32> {
    let (_, resolved) = doc.dereference(obj).ok()?;
    let values: Vec<f32> = resolved.as_array().ok()?.iter().filter_map(as_number).collect();
    match values.as_slice() {
        [x0, _, x1, _] => Some((x1 - x0).abs()).filter(|w| *w > 0.0),
        _ => None,
    }
}

/// Upsample so the page renders at `dpi` or better. Never downsamples: a scan
/// already above the target resolution is passed through untouched. A target
/// beyond `MAX_RASTER_PIXELS` is refused before anything is allocated.
fn scale_to_dpi(
    image: DynamicImage,
    page_width_pt: f32,
    dpi: u32,
) -> Result<DynamicImage, RasterError> {
    let target = (f64::from(page_width_pt) / f64::from(POINTS_PER_INCH) * f64::from(dpi)).round();
    if image.width() == 0 || !target.is_finite() || target <= f64::from(image.width()) {
        return Ok(image);
    }

    let (width, height) = (u64::from(image.width()), u64::from(image.height()));
    let budget_width = (MAX_RASTER_PIXELS / height.max(1)).min(u64::from(u32::MAX));
    if target > budget_width as f64 {
        let target_width = target.min(u64::MAX as f64) as u64;
        let target_height = height.saturating_mul(target_width) / width;
        return Err(RasterError::TooLarge { width: target_width, height: target_height });
    }

    let target_width = target as u64;
    let target_height = (height * target_width / width).max(1);
    if target_width.saturating_mul(target_height) > MAX_RASTER_PIXELS {
        return Err(RasterError::TooLarge { width: target_width, height: target_height });
    }
    // Both dimensions fit the budget, which is below u32::MAX.
    Ok(image.resize_exact(target_width as u32, target_height as u32, FilterType::CatmullRom))
}
