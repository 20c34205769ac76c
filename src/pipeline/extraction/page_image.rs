//! Scanned-page image extraction with lopdf.
//!
//! A scanned PDF page is normally a single image XObject drawn over the
//! whole page. The largest image on the page is handed to OCR as-is, so only
//! encodings Tesseract reads directly are accepted (JPEG streams, or streams
//! that decompress to a PNG/TIFF/JPEG file).

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::format::{detect_category, FileCategory};
use super::types::PdfPageRenderer;
use super::ExtractionError;

pub struct LopdfImageExtractor;

impl PdfPageRenderer for LopdfImageExtractor {
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(format!("Failed to parse PDF: {e}")))?;

        let pages = doc.get_pages();
        let page_id = *pages.values().nth(page_index).ok_or_else(|| {
            ExtractionError::PdfParsing(format!(
                "Page {} not found (PDF has {} pages)",
                page_index + 1,
                pages.len()
            ))
        })?;

        let image = largest_page_image(&doc, page_id)?;
        tracing::debug!(page = page_index + 1, size = image.len(), "Extracted scan image");
        Ok(image)
    }
}

fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| ExtractionError::PdfParsing(format!("Page object error: {e}")))?;

    let resources = resolve_dict(doc, page, b"Resources")?;
    let xobjects = resolve_dict(doc, resources, b"XObject")?;

    let mut largest: Option<Vec<u8>> = None;
    let mut last_error = None;

    for (_name, entry) in xobjects.iter() {
        let Object::Stream(stream) = resolve(doc, entry) else {
            continue;
        };
        if !has_name(&stream.dict, b"Subtype", b"Image") {
            continue;
        }
        match image_bytes(stream) {
            Ok(bytes) => {
                if largest.as_ref().map_or(true, |prev| bytes.len() > prev.len()) {
                    largest = Some(bytes);
                }
            }
            Err(e) => last_error = Some(e),
        }
    }

    largest.ok_or_else(|| {
        last_error.unwrap_or_else(|| {
            ExtractionError::ImageProcessing("no image XObject on this page".into())
        })
    })
}

/// JPEG streams are the image file already. Anything else must decompress
/// to a complete image file; raw pixel buffers are rejected.
fn image_bytes(stream: &Stream) -> Result<Vec<u8>, ExtractionError> {
    if has_name(&stream.dict, b"Filter", b"DCTDecode") {
        return Ok(stream.content.clone());
    }

    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    match detect_category(&content) {
        FileCategory::Image => Ok(content),
        _ => Err(ExtractionError::ImageProcessing(
            "raw pixel image streams are not supported".into(),
        )),
    }
}

/// True when `key` is the name `value`, or an array containing it.
fn has_name(dict: &Dictionary, key: &[u8], value: &[u8]) -> bool {
    match dict.get(key) {
        Ok(Object::Name(n)) => n == value,
        Ok(Object::Array(items)) => items
            .iter()
            .any(|o| matches!(o, Object::Name(n) if n == value)),
        _ => false,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn resolve_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Result<&'a Dictionary, ExtractionError> {
    let name = String::from_utf8_lossy(key);
    let obj = dict
        .get(key)
        .map_err(|_| ExtractionError::ImageProcessing(format!("page has no /{name}")))?;
    resolve(doc, obj)
        .as_dict()
        .map_err(|_| ExtractionError::PdfParsing(format!("/{name} is not a dictionary")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Stand-in JPEG payload: the SOI marker is all OCR mocks and format
    /// detection look at.
    pub(crate) const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    /// One page per entry; each page draws its image bytes full-page and has
    /// no text layer.
    pub(crate) fn make_scanned_pdf(images: &[&[u8]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for image in images {
            let mut img = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => Object::Integer(200),
                    "Height" => Object::Integer(300),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => Object::Integer(8),
                    "Filter" => "DCTDecode",
                },
                image.to_vec(),
            );
            img.allows_compression = false;
            let img_id = doc.add_object(img);

            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                b"q 612 0 0 792 0 0 cm /Img1 Do Q".to_vec(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Img1" => img_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LopdfImageExtractor>();
    }

    #[test]
    fn jpeg_scan_is_returned_verbatim() {
        let pdf = make_scanned_pdf(&[FAKE_JPEG]);
        let image = LopdfImageExtractor.render_page(&pdf, 0).unwrap();
        assert_eq!(image, FAKE_JPEG);
    }

    #[test]
    fn second_page_is_addressed_by_index() {
        let other: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE1, 0x01, 0x02];
        let pdf = make_scanned_pdf(&[FAKE_JPEG, other]);
        assert_eq!(LopdfImageExtractor.render_page(&pdf, 1).unwrap(), other);
    }

    #[test]
    fn page_out_of_range_is_an_error() {
        let pdf = make_scanned_pdf(&[FAKE_JPEG]);
        let err = LopdfImageExtractor.render_page(&pdf, 3).unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }

    #[test]
    fn text_only_page_has_no_image() {
        let pdf = crate::pipeline::extraction::pdf::tests::make_test_pdf(&[&["DRG 470"]]);
        let err = LopdfImageExtractor.render_page(&pdf, 0).unwrap_err();
        assert!(matches!(err, ExtractionError::ImageProcessing(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let err = LopdfImageExtractor.render_page(b"%PDF-1.4 scanned", 0).unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }
}
