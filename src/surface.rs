use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::error::{Result, ViewerError};

/// A drawable area showing a single page.
///
/// A surface has no pixels until it is sized, and none while it is sized
/// to zero in either direction.
pub struct Surface {
    page: u32,
    pixmap: Option<Pixmap>,
}

impl Surface {
    /// Create an empty surface for `page`.
    pub fn new(page: u32) -> Self {
        Self { page, pixmap: None }
    }

    /// The page this surface shows.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Width in pixels, 0 while unsized.
    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    /// Height in pixels, 0 while unsized.
    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    /// The pixels drawn so far, if the surface has any.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Replace the contents with a blank pixmap of the given size and hand
    /// it back for drawing.
    ///
    /// An empty size leaves the surface without pixels and returns `None`;
    /// there is nothing to draw on, like a 0×0 canvas.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Option<&mut Pixmap>> {
        if width == 0 || height == 0 {
            self.pixmap = None;
            return Ok(None);
        }

        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ViewerError::render(
                self.page,
                format!("cannot allocate a {}x{} surface", width, height),
            )
        })?;

        Ok(Some(self.pixmap.insert(pixmap)))
    }

    /// Encode the current contents as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or_else(|| ViewerError::render(self.page, "surface has no pixels"))?;

        pixmap
            .encode_png()
            .map_err(|e| ViewerError::render(self.page, format!("PNG encoding failed: {}", e)))
    }
}

/// Scroll extents of a frame, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollMetrics {
    /// Total height of the content.
    pub scroll_height: f32,
    /// Height of the visible area.
    pub viewport_height: f32,
    /// Distance scrolled from the top.
    pub scroll_top: f32,
}

impl ScrollMetrics {
    /// How much content is left below the viewport. Negative once the
    /// viewport has been scrolled past the bottom of the content.
    pub fn slack(&self) -> f32 {
        self.scroll_height - (self.viewport_height + self.scroll_top)
    }
}

/// The container holding one surface per page reached so far, stacked
/// vertically in page order.
pub struct Frame {
    surfaces: Vec<Surface>,
    page_spacing: f32,
    viewport_height: f32,
    scroll_top: f32,
}

impl Frame {
    /// An empty frame, scrolled to the top.
    pub fn new(viewport_height: f32, page_spacing: f32) -> Self {
        Self {
            surfaces: vec![],
            page_spacing,
            viewport_height,
            scroll_top: 0.0,
        }
    }

    /// Append a surface after the last one.
    pub fn push(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    /// The surface at `index`, counting from 0.
    pub fn get(&self, index: usize) -> Option<&Surface> {
        self.surfaces.get(index)
    }

    /// Mutable access to the surface at `index`, counting from 0.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Surface> {
        self.surfaces.get_mut(index)
    }

    /// The number of surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the frame has no surfaces yet.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// The surfaces in page order.
    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    /// Distance from the top of the content to the top of surface `index`.
    pub fn offset_top(&self, index: usize) -> f32 {
        self.surfaces
            .iter()
            .take(index)
            .map(|surface| surface.height() as f32 + self.page_spacing)
            .sum()
    }

    /// Total height of all surfaces, including the gaps between them.
    pub fn scroll_height(&self) -> f32 {
        if self.surfaces.is_empty() {
            return 0.0;
        }

        let gaps = (self.surfaces.len() - 1) as f32 * self.page_spacing;
        let heights: f32 = self.surfaces.iter().map(|surface| surface.height() as f32).sum();
        heights + gaps
    }

    /// Height of the visible area.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Distance scrolled from the top.
    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    /// Move the viewport. Scrolling past the end of the content is allowed,
    /// up to the content height itself.
    pub fn scroll_to(&mut self, top: f32) {
        self.scroll_top = top.clamp(0.0, self.scroll_height());
    }

    /// Align the top of surface `index` with the top of the viewport, as far
    /// as the content allows. Returns `false` if there is no such surface.
    pub fn scroll_into_view(&mut self, index: usize) -> bool {
        if index >= self.surfaces.len() {
            return false;
        }

        let max_top = (self.scroll_height() - self.viewport_height).max(0.0);
        self.scroll_top = self.offset_top(index).min(max_top);
        true
    }

    /// The current scroll extents.
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_height: self.scroll_height(),
            viewport_height: self.viewport_height,
            scroll_top: self.scroll_top,
        }
    }

    /// Draw every surface onto one tall pixmap, in layout order.
    pub fn compose(&self) -> Option<Pixmap> {
        let width = self.surfaces.iter().map(Surface::width).max()?;
        let mut pixmap = Pixmap::new(width, self.scroll_height().ceil() as u32)?;

        let mut cursor = 0.0;

        for surface in &self.surfaces {
            if let Some(page) = surface.pixmap() {
                pixmap.draw_pixmap(
                    0,
                    0,
                    page.as_ref(),
                    &PixmapPaint::default(),
                    Transform::from_translate(0.0, cursor),
                    None,
                );
            }

            cursor += surface.height() as f32 + self.page_spacing;
        }

        Some(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_heights(heights: &[u32]) -> Frame {
        let mut frame = Frame::new(500.0, 10.0);
        for (index, height) in heights.iter().enumerate() {
            let mut surface = Surface::new(index as u32 + 1);
            surface.resize(100, *height).unwrap();
            frame.push(surface);
        }
        frame
    }

    #[test]
    fn fresh_surface_is_unsized() {
        let surface = Surface::new(3);
        assert_eq!(surface.page(), 3);
        assert_eq!((surface.width(), surface.height()), (0, 0));
        assert!(surface.pixmap().is_none());
        assert!(surface.encode_png().is_err());
    }

    #[test]
    fn zero_sized_surface_has_no_pixels() {
        let mut surface = Surface::new(2);
        assert!(surface.resize(40, 30).unwrap().is_some());
        assert_eq!((surface.width(), surface.height()), (40, 30));

        assert!(surface.resize(0, 10).unwrap().is_none());
        assert_eq!((surface.width(), surface.height()), (0, 0));
        assert!(surface.pixmap().is_none());

        assert!(surface.resize(10, 0).unwrap().is_none());
        assert!(surface.resize(10, 10).unwrap().is_some());
    }

    #[test]
    fn layout_includes_spacing_between_pages() {
        let frame = frame_with_heights(&[400, 300, 200]);
        assert_eq!(frame.offset_top(0), 0.0);
        assert_eq!(frame.offset_top(1), 410.0);
        assert_eq!(frame.offset_top(2), 720.0);
        assert_eq!(frame.scroll_height(), 920.0);
        assert_eq!(Frame::new(500.0, 10.0).scroll_height(), 0.0);
    }

    #[test]
    fn scroll_into_view_is_bounded_by_content() {
        let mut frame = frame_with_heights(&[400, 300, 200]);

        assert!(frame.scroll_into_view(1));
        assert_eq!(frame.scroll_top(), 410.0);

        // The last page can only be brought as far as the bottom edge allows.
        assert!(frame.scroll_into_view(2));
        assert_eq!(frame.scroll_top(), 420.0);

        assert!(!frame.scroll_into_view(3));
        assert_eq!(frame.scroll_top(), 420.0);
    }

    #[test]
    fn overscroll_gives_negative_slack() {
        let mut frame = frame_with_heights(&[400, 300]);
        frame.scroll_to(250.0);
        assert_eq!(frame.metrics().slack(), -40.0);

        frame.scroll_to(10_000.0);
        assert_eq!(frame.scroll_top(), 710.0);

        frame.scroll_to(-5.0);
        assert_eq!(frame.scroll_top(), 0.0);
    }

    #[test]
    fn compose_stacks_surfaces() {
        let frame = frame_with_heights(&[40, 30]);
        let composed = frame.compose().unwrap();
        assert_eq!((composed.width(), composed.height()), (100, 80));

        let png = frame.get(0).unwrap().encode_png().unwrap();
        let size = imagesize::blob_size(&png).unwrap();
        assert_eq!((size.width, size.height), (100, 40));
    }
}
