use crate::error::Result;
use crate::options::ViewerOptions;
use crate::renderer::{Document, HayroDocument};
use crate::sequencer::PageSequencer;
use crate::surface::ScrollMetrics;

/// The text element showing the current zoom, as a percentage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoomLabel {
    text: String,
}

impl ZoomLabel {
    /// The text currently shown, e.g. `"125"`.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn show(&mut self, scale: f32) {
        self.text = (scale * 100.0).to_string();
    }
}

/// Drives a [`PageSequencer`] from scroll positions and zoom requests.
///
/// Whenever the frame is scrolled past the bottom of the rendered pages,
/// the next page gets a surface.
pub struct Reader<D> {
    sequencer: PageSequencer<D>,
    zoom_label: ZoomLabel,
    zoom_step: f32,
}

impl Reader<HayroDocument> {
    /// Load the document at `location` and wrap it in a reader.
    pub fn open(location: &str, options: ViewerOptions) -> Result<Self> {
        let sequencer = PageSequencer::open(location, options).wait()?;
        Ok(Self::new(sequencer, options))
    }
}

impl<D: Document> Reader<D> {
    /// Wrap a ready sequencer; the zoom label starts at its current scale.
    pub fn new(sequencer: PageSequencer<D>, options: ViewerOptions) -> Self {
        let mut zoom_label = ZoomLabel::default();
        zoom_label.show(sequencer.scale());

        Self {
            sequencer,
            zoom_label,
            zoom_step: options.zoom_step,
        }
    }

    /// The underlying sequencer.
    pub fn sequencer(&self) -> &PageSequencer<D> {
        &self.sequencer
    }

    /// Mutable access to the underlying sequencer.
    pub fn sequencer_mut(&mut self) -> &mut PageSequencer<D> {
        &mut self.sequencer
    }

    /// The zoom percentage display.
    pub fn zoom_label(&self) -> &ZoomLabel {
        &self.zoom_label
    }

    /// Shrink the pages by `amount`, or by the configured step if `amount`
    /// is `None` or zero. A step that would take the scale to zero or below
    /// is rejected with [`ViewerError::InvalidScale`](crate::ViewerError).
    pub fn zoom_out(&mut self, amount: Option<f32>) -> Result<()> {
        let scale = self.sequencer.scale() - self.step(amount);
        self.apply_zoom(scale)
    }

    /// Enlarge the pages by `amount`, or by the configured step if `amount`
    /// is `None` or zero.
    pub fn zoom_in(&mut self, amount: Option<f32>) -> Result<()> {
        let scale = self.sequencer.scale() + self.step(amount);
        self.apply_zoom(scale)
    }

    /// Scroll the frame to `top` and react as to a scroll event.
    pub fn scroll_to(&mut self, top: f32) -> Result<bool> {
        self.sequencer.frame_mut().scroll_to(top);
        self.on_scroll()
    }

    /// Scroll the frame by `delta` and react as to a scroll event.
    pub fn scroll_by(&mut self, delta: f32) -> Result<bool> {
        let top = self.sequencer.frame().scroll_top() + delta;
        self.scroll_to(top)
    }

    /// React to a scroll event using the frame's current extents.
    pub fn on_scroll(&mut self) -> Result<bool> {
        let metrics = self.sequencer.frame().metrics();
        self.handle_scroll(metrics)
    }

    /// Advance by exactly one page if the viewport has gone past the bottom
    /// of the rendered pages. Returns whether a page was added.
    pub fn handle_scroll(&mut self, metrics: ScrollMetrics) -> Result<bool> {
        if metrics.slack() >= 0.0 {
            return Ok(false);
        }

        let head = self.sequencer.head();
        if head >= self.sequencer.last() {
            log::trace!("scrolled past the end at last page {}", head);
            return Ok(false);
        }

        self.sequencer.advance_to(head + 1)?;
        Ok(true)
    }

    fn step(&self, amount: Option<f32>) -> f32 {
        amount.filter(|amount| *amount != 0.0).unwrap_or(self.zoom_step)
    }

    fn apply_zoom(&mut self, scale: f32) -> Result<()> {
        let result = self.sequencer.set_scale(scale);
        self.zoom_label.show(self.sequencer.scale());
        result
    }
}
