use crate::error::{Result, ViewerError};
use crate::loader::PendingDocument;
use crate::options::ViewerOptions;
use crate::renderer::{Document, HayroDocument};
use crate::surface::{Frame, Surface};

/// Creates one surface per page, in order, as far as the reader has got.
///
/// The "head" is the last page that has a surface. It starts at 1 once the
/// document is loaded and only ever moves forward, up to the last page.
/// There is always exactly one surface per page up to and including the
/// head.
pub struct PageSequencer<D> {
    document: D,
    frame: Frame,
    head: u32,
    scale: f32,
}

impl PageSequencer<HayroDocument> {
    /// Start loading the document at `location` in the background.
    pub fn open(location: &str, options: ViewerOptions) -> PendingDocument {
        PendingDocument::spawn(location, options)
    }
}

impl<D: Document> PageSequencer<D> {
    /// Take ownership of a loaded document and render its first page.
    pub fn new(document: D, options: ViewerOptions) -> Result<Self> {
        check_scale(options.scale)?;

        if document.page_count() == 0 {
            return Err(ViewerError::EmptyDocument);
        }

        let mut sequencer = Self {
            document,
            frame: Frame::new(options.viewport_height, options.page_spacing),
            head: 0,
            scale: options.scale,
        };
        sequencer.advance_to(1)?;

        Ok(sequencer)
    }

    /// The page number of the head.
    pub fn head(&self) -> u32 {
        self.head
    }

    /// Same as [`head`](Self::head).
    pub fn number(&self) -> u32 {
        self.head
    }

    /// Same as [`advance_to`](Self::advance_to).
    pub fn set_number(&mut self, target: u32) -> Result<u32> {
        self.advance_to(target)
    }

    /// The number of the last page in the document.
    pub fn last(&self) -> u32 {
        self.document.page_count()
    }

    /// The factor applied to every page's native size.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Change the scale and re-render every page that has a surface.
    ///
    /// If any page fails at the new scale, the previous scale is put back
    /// and every page is drawn at it again before the error is returned.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        check_scale(scale)?;

        let previous = std::mem::replace(&mut self.scale, scale);
        if let Err(e) = self.reload() {
            log::warn!("scale {} failed, restoring {}: {}", scale, previous, e);
            self.scale = previous;

            if let Err(restore) = self.reload() {
                log::warn!("restoring scale {} failed: {}", previous, restore);
            }

            return Err(e);
        }

        Ok(())
    }

    /// The loaded document.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The surfaces created so far.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable access to the frame, for scrolling.
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// Create and render surfaces until the head reaches `target`.
    ///
    /// Targets past the last page are clamped to it, and targets at or
    /// before the head do nothing. Returns the new head.
    pub fn advance_to(&mut self, target: u32) -> Result<u32> {
        let target = target.min(self.last());

        while self.head < target {
            self.head += 1;
            self.frame.push(Surface::new(self.head));
            log::debug!("advancing head to page {}", self.head);
            self.render(self.frame.len() - 1, self.head)?;
        }

        Ok(self.head)
    }

    /// Like [`advance_to`](Self::advance_to), but a page outside the
    /// document is an error instead of being clamped.
    pub fn seek(&mut self, target: u32) -> Result<u32> {
        let last = self.last();
        if target == 0 || target > last {
            return Err(ViewerError::OutOfRange { page: target, last });
        }

        self.advance_to(target)
    }

    /// Re-render every page up to the head at the current scale, then go
    /// back to the head.
    ///
    /// A page that fails does not stop the others; the first failure is
    /// returned once every page has been tried.
    pub fn reload(&mut self) -> Result<()> {
        log::debug!("reloading {} pages at scale {}", self.head, self.scale);

        let mut first_error = None;

        for page in 1..=self.head {
            if let Err(e) = self.render(page as usize - 1, page) {
                first_error.get_or_insert(e);
            }
        }

        self.locate(self.head);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Scroll the surface of `page` into view. Does nothing if the page has
    /// no surface yet.
    pub fn locate(&mut self, page: u32) -> bool {
        match page.checked_sub(1) {
            Some(index) => self.frame.scroll_into_view(index as usize),
            None => false,
        }
    }

    fn render(&mut self, index: usize, page: u32) -> Result<()> {
        let (width, height) = self.document.page_size(page)?.scaled(self.scale);

        let surface = self
            .frame
            .get_mut(index)
            .ok_or_else(|| ViewerError::render(page, "no surface to draw on"))?;

        match surface.resize(width, height)? {
            Some(pixmap) => self.document.render_page(page, self.scale, pixmap),
            None => {
                log::debug!("page {} is empty at scale {}", page, self.scale);
                Ok(())
            }
        }
    }
}

fn check_scale(scale: f32) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ViewerError::InvalidScale(scale))
    }
}
