use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use url::Url;

use crate::error::{Result, ViewerError};
use crate::options::ViewerOptions;
use crate::renderer::HayroDocument;
use crate::sequencer::PageSequencer;

/// Turn a document location into a local path.
///
/// Accepts plain paths and `file://` URLs. There is no network layer, so
/// every other scheme is rejected.
pub fn resolve(location: &str) -> Result<PathBuf> {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|_| ViewerError::Load(format!("{} does not name a local file", location))),
        // A single-letter scheme is a Windows drive letter, not a URL.
        Ok(url) if url.scheme().len() > 1 => {
            Err(ViewerError::UnsupportedScheme(url.scheme().to_string()))
        }
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => Ok(PathBuf::from(location)),
        Err(e) => Err(e.into()),
    }
}

/// Read the raw bytes of the document at `location`.
pub fn fetch(location: &str) -> Result<Vec<u8>> {
    let path = resolve(location)?;
    log::debug!("reading {}", path.display());
    Ok(fs::read(path)?)
}

/// A document that is being fetched in the background.
///
/// The fetch runs on its own thread; parsing and rendering the first page
/// happen on the thread that collects the result.
pub struct PendingDocument {
    location: String,
    options: ViewerOptions,
    receiver: Receiver<Result<Vec<u8>>>,
}

impl PendingDocument {
    /// Start fetching the document at `location`.
    pub fn spawn(location: &str, options: ViewerOptions) -> Self {
        let (sender, receiver) = mpsc::sync_channel(1);
        let target = location.to_string();

        thread::spawn(move || {
            // The receiver may already be gone if the caller lost interest.
            let _ = sender.send(fetch(&target));
        });

        Self {
            location: location.to_string(),
            options,
            receiver,
        }
    }

    /// Block until the document is loaded and its first page is rendered.
    pub fn wait(self) -> Result<PageSequencer<HayroDocument>> {
        let fetched = self.receiver.recv().map_err(|_| ViewerError::LoadAborted)?;
        self.finish(fetched)
    }

    /// Collect the result if the fetch has completed, without blocking.
    pub fn try_finish(&self) -> Option<Result<PageSequencer<HayroDocument>>> {
        match self.receiver.try_recv() {
            Ok(fetched) => Some(self.finish(fetched)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ViewerError::LoadAborted)),
        }
    }

    fn finish(&self, fetched: Result<Vec<u8>>) -> Result<PageSequencer<HayroDocument>> {
        let document = HayroDocument::from_bytes(fetched?)?;
        log::info!("loaded {}", self.location);
        PageSequencer::new(document, self.options)
    }
}
