/*!
# Motivation
The purpose of this crate is to show a long PDF without rendering all of it up front. Pages
are drawn one at a time, in order, as the reader scrolls towards the end of what has been
drawn so far. Nothing is ever thrown away: once a page has a surface, it keeps it, and the
only thing that re-renders existing pages is a change of zoom.

All of the hard work (parsing, interpreting content streams, rasterizing) is done by
[hayro](https://github.com/LaurenzV/hayro). This crate only decides *which* page to draw,
*how big* its surface should be, and *when*.

# Structure
- [`PageSequencer`] owns the document, the scale and the [`Frame`] of surfaces. Its head
  pointer is the last page that has a surface; [`PageSequencer::advance_to`] moves it
  forward and [`PageSequencer::set_scale`] re-renders everything up to it.
- [`Reader`] sits on top and turns scroll positions into page advances: when the viewport
  goes past the bottom of the frame, one more page is added. It also owns the zoom
  controls and the [`ZoomLabel`] showing the current zoom percentage.
- [`Document`] is the seam to the rendering library. [`HayroDocument`] is the real one;
  anything else that can report page sizes and draw a page into a pixmap works too.

# Loading
Documents are addressed by a plain path or a `file://` URL. Loading happens in the
background ([`PendingDocument`]), so a caller can keep doing other work and collect the
result later. There is no network support.

# Configuration
[`ViewerOptions`] holds the initial scale, the zoom step and the frame geometry. Any
finite positive scale is accepted; zooming out to zero or below is rejected.
[`ViewerOptions::from_env`] reads overrides from `PAGESCROLL_*` environment variables,
which is also how the `pagescroll` binary is configured.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod loader;
mod options;
mod reader;
mod renderer;
mod sequencer;
mod surface;

pub use error::{Result, ViewerError};
pub use loader::{fetch, resolve, PendingDocument};
pub use options::ViewerOptions;
pub use reader::{Reader, ZoomLabel};
pub use renderer::{Document, HayroDocument, PageSize};
pub use sequencer::PageSequencer;
pub use surface::{Frame, ScrollMetrics, Surface};
