use super::types::{PageExtraction, PdfExtractor};
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Reads the embedded text layer of digital PDFs; scanned pages come back empty.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        let page_texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        let pages = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let confidence = if text.trim().len() > 10 { 0.95 } else { 0.0 };
                PageExtraction {
                    page_number: i + 1,
                    text,
                    confidence,
                }
            })
            .collect();

        Ok(pages)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a one-page PDF per entry of `lines`, each page carrying its text
    /// as separate text-show operations so line breaks survive extraction.
    pub(crate) fn make_test_pdf(pages: &[&[&str]]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for lines in pages {
            let mut content = String::from("BT /F1 12 Tf 72 720 Td 14 TL ");
            for line in lines.iter() {
                content.push_str(&format!("({line}) Tj T* "));
            }
            content.push_str("ET");

            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
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
    fn extract_text_from_digital_pdf() {
        let pdf_bytes = make_test_pdf(&[&["Explanation of Benefits", "DRG Code: 470"]]);
        let pages = PdfTextExtractor.extract_text(&pdf_bytes).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(
            pages[0].text.contains("DRG Code") || pages[0].text.contains("470"),
            "Expected EOB text, got: {}",
            pages[0].text
        );
    }

    #[test]
    fn pages_are_numbered_from_one() {
        let pdf_bytes = make_test_pdf(&[&["Page one text content"], &["Page two text content"]]);
        let pages = PdfTextExtractor.extract_text(&pdf_bytes).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let result = PdfTextExtractor.extract_text(b"not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn confidence_high_for_pages_with_text() {
        let pdf_bytes = make_test_pdf(&[&["Patient arrived by ambulance with chest pain"]]);
        let pages = PdfTextExtractor.extract_text(&pdf_bytes).unwrap();
        for page in &pages {
            if page.text.trim().len() > 10 {
                assert!(page.confidence > 0.90);
            }
        }
    }
}
