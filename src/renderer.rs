use std::sync::Arc;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use hayro::{render, Pdf, RenderSettings};
use hayro_interpret::InterpreterSettings;

use crate::error::{Result, ViewerError};

/// The native size of a page, in PDF points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageSize {
    /// Width of the page.
    pub width: f32,
    /// Height of the page.
    pub height: f32,
}

impl PageSize {
    /// The pixel size of a surface showing this page at `scale`.
    ///
    /// Fractional pixels are truncated, the same way a canvas truncates a
    /// fractional width or height.
    pub fn scaled(&self, scale: f32) -> (u32, u32) {
        ((self.width * scale) as u32, (self.height * scale) as u32)
    }
}

/// A loaded document, as provided by an external rendering library.
///
/// Pages are numbered from 1.
pub trait Document {
    /// The number of pages in the document.
    fn page_count(&self) -> u32;

    /// The native size of `page`.
    fn page_size(&self, page: u32) -> Result<PageSize>;

    /// Draw `page` at `scale` into `target`, which has already been sized
    /// with [`PageSize::scaled`].
    fn render_page(&self, page: u32, scale: f32, target: &mut Pixmap) -> Result<()>;
}

/// A document backed by hayro (pure Rust).
pub struct HayroDocument {
    pdf: Pdf,
    interpreter_settings: InterpreterSettings,
}

impl HayroDocument {
    /// Parse a PDF file from its raw bytes.
    pub fn from_bytes(buf: Vec<u8>) -> Result<Self> {
        let data = Arc::new(buf);
        let pdf = Pdf::new(data)
            .map_err(|e| ViewerError::Load(format!("failed to parse PDF: {:?}", e)))?;

        Ok(Self {
            pdf,
            interpreter_settings: InterpreterSettings::default(),
        })
    }

    fn page_index(&self, page: u32) -> Result<usize> {
        let last = self.page_count();
        if page == 0 || page > last {
            return Err(ViewerError::OutOfRange { page, last });
        }

        Ok(page as usize - 1)
    }
}

impl Document for HayroDocument {
    fn page_count(&self) -> u32 {
        self.pdf.pages().len() as u32
    }

    fn page_size(&self, page: u32) -> Result<PageSize> {
        let index = self.page_index(page)?;
        let (width, height) = self.pdf.pages()[index].render_dimensions();
        Ok(PageSize { width, height })
    }

    fn render_page(&self, page: u32, scale: f32, target: &mut Pixmap) -> Result<()> {
        let render_settings = RenderSettings {
            x_scale: scale,
            y_scale: scale,
            ..Default::default()
        };

        let index = self.page_index(page)?;
        let rendered = render(
            &self.pdf.pages()[index],
            &self.interpreter_settings,
            &render_settings,
        );
        let png_data = rendered.take_png();
        let decoded = Pixmap::decode_png(&png_data)
            .map_err(|_| ViewerError::render(page, "unable to generate pixmap"))?;

        if decoded.width() != target.width() || decoded.height() != target.height() {
            log::debug!(
                "page {} rendered at {}x{}, surface is {}x{}",
                page,
                decoded.width(),
                decoded.height(),
                target.width(),
                target.height()
            );
        }

        target.draw_pixmap(
            0,
            0,
            decoded.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// An in-memory document that records every page it was asked to draw.
    pub struct FakeDocument {
        pub sizes: Vec<PageSize>,
        pub renders: RefCell<Vec<(u32, f32)>>,
        pub failing_page: Option<u32>,
        /// Only fail `failing_page` at this scale; any scale if `None`.
        pub failing_scale: Option<f32>,
    }

    impl FakeDocument {
        pub fn new(sizes: &[(f32, f32)]) -> Self {
            Self {
                sizes: sizes
                    .iter()
                    .map(|&(width, height)| PageSize { width, height })
                    .collect(),
                renders: RefCell::new(vec![]),
                failing_page: None,
                failing_scale: None,
            }
        }

        /// A document with `count` letter-sized pages.
        pub fn uniform(count: usize) -> Self {
            Self::new(&vec![(612.0, 792.0); count])
        }

        pub fn rendered_pages(&self) -> Vec<u32> {
            self.renders.borrow().iter().map(|(page, _)| *page).collect()
        }
    }

    impl Document for FakeDocument {
        fn page_count(&self) -> u32 {
            self.sizes.len() as u32
        }

        fn page_size(&self, page: u32) -> Result<PageSize> {
            let last = self.page_count();
            page.checked_sub(1)
                .and_then(|index| self.sizes.get(index as usize))
                .copied()
                .ok_or(ViewerError::OutOfRange { page, last })
        }

        fn render_page(&self, page: u32, scale: f32, target: &mut Pixmap) -> Result<()> {
            let scale_matches = self.failing_scale.map_or(true, |failing| failing == scale);
            if self.failing_page == Some(page) && scale_matches {
                return Err(ViewerError::render(page, "broken content stream"));
            }

            target.fill(tiny_skia::Color::WHITE);
            self.renders.borrow_mut().push((page, scale));
            Ok(())
        }
    }

    /// A minimal PDF with two empty pages, 200×300 and 100×50 points.
    pub fn two_page_pdf() -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>",
            "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>",
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 300] /Resources << >> >>",
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 100 50] /Resources << >> >>",
        ];

        let mut pdf = b"%PDF-1.7\n".to_vec();
        let mut offsets = vec![];

        for (index, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
        }

        let xref_offset = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{:010} 00000 n \n", offset));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));

        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }
}

#[cfg(test)]
mod tests {
    use super::testing::two_page_pdf;
    use super::*;

    #[test]
    fn scaled_size_truncates() {
        let size = PageSize {
            width: 612.0,
            height: 792.0,
        };
        assert_eq!(size.scaled(1.0), (612, 792));
        assert_eq!(size.scaled(1.5), (918, 1188));
        assert_eq!(size.scaled(0.33), (201, 261));
    }

    #[test]
    fn garbage_is_a_load_error() {
        let result = HayroDocument::from_bytes(b"definitely not a pdf".to_vec());
        assert!(matches!(result, Err(ViewerError::Load(_))));
    }

    #[test]
    fn hayro_reports_page_count_and_sizes() {
        let document = HayroDocument::from_bytes(two_page_pdf()).unwrap();

        assert_eq!(document.page_count(), 2);
        assert_eq!(
            document.page_size(1).unwrap(),
            PageSize {
                width: 200.0,
                height: 300.0
            }
        );
        assert_eq!(
            document.page_size(2).unwrap(),
            PageSize {
                width: 100.0,
                height: 50.0
            }
        );
        assert!(matches!(
            document.page_size(3),
            Err(ViewerError::OutOfRange { page: 3, last: 2 })
        ));
    }

    #[test]
    fn hayro_draws_into_surface() {
        let document = HayroDocument::from_bytes(two_page_pdf()).unwrap();
        let (width, height) = document.page_size(2).unwrap().scaled(2.0);
        let mut target = Pixmap::new(width, height).unwrap();

        document.render_page(2, 2.0, &mut target).unwrap();

        assert_eq!((target.width(), target.height()), (200, 100));
        assert!(document.render_page(0, 1.0, &mut target).is_err());
    }
}
