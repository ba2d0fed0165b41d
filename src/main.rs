use pagescroll::{resolve, Reader, ViewerError, ViewerOptions};
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(location) = args.next() else {
        eprintln!("usage: pagescroll <pdf-or-dir-or-file-url> [out-dir]");
        return ExitCode::FAILURE;
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "pagescroll-out".to_string()));

    let options = ViewerOptions::from_env();
    let zoom_steps = zoom_steps_from_env();

    let root = match resolve(&location) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{}: {}", location, e);
            return ExitCode::FAILURE;
        }
    };

    let files: Vec<PathBuf> = if root.is_dir() {
        WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file() && e.file_name().to_string_lossy().ends_with(".pdf")
            })
            .map(|e| e.into_path())
            .collect()
    } else {
        vec![root]
    };

    if let Err(e) = fs::create_dir_all(&out_dir) {
        eprintln!("cannot create {}: {}", out_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let failures = files
        .par_iter()
        .filter(|pdf_path| match scroll_through(pdf_path, &out_dir, options, zoom_steps) {
            Ok(out_path) => {
                println!("{} -> {}", pdf_path.display(), out_path.display());
                false
            }
            Err(e) => {
                eprintln!("{}: {}", pdf_path.display(), e);
                true
            }
        })
        .count();

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// How many times to zoom in before saving, from `PAGESCROLL_ZOOM_STEPS`.
fn zoom_steps_from_env() -> u32 {
    let Ok(raw) = env::var("PAGESCROLL_ZOOM_STEPS") else {
        return 0;
    };

    match raw.parse() {
        Ok(steps) => steps,
        Err(_) => {
            log::warn!("ignoring PAGESCROLL_ZOOM_STEPS: cannot parse {:?}", raw);
            0
        }
    }
}

/// Scroll through the whole document the way a reader would, zoom in, and
/// save everything that ended up in the frame as one image.
fn scroll_through(
    pdf_path: &Path,
    out_dir: &Path,
    options: ViewerOptions,
    zoom_steps: u32,
) -> Result<PathBuf, ViewerError> {
    let mut reader = Reader::open(&pdf_path.to_string_lossy(), options)?;
    let step = options.viewport_height / 2.0;

    println!("scrolling {} ({} pages)", pdf_path.display(), reader.sequencer().last());

    while reader.sequencer().head() < reader.sequencer().last() {
        let before = reader.sequencer().frame().scroll_top();
        let advanced = reader.scroll_by(step)?;

        // Nothing moved and nothing was added: the viewport cannot get past
        // the content with these options.
        if !advanced && reader.sequencer().frame().scroll_top() == before {
            log::warn!("stuck at page {} of {}", reader.sequencer().head(), pdf_path.display());
            break;
        }
    }

    for _ in 0..zoom_steps {
        reader.zoom_in(None)?;
    }

    let head = reader.sequencer().head();
    let pixmap = reader
        .sequencer()
        .frame()
        .compose()
        .ok_or_else(|| ViewerError::render(head, "frame too large to compose"))?;
    let png = pixmap
        .encode_png()
        .map_err(|e| ViewerError::render(head, format!("PNG encoding failed: {}", e)))?;

    let stem = pdf_path
        .file_stem()
        .map_or_else(|| "document".into(), |stem| stem.to_string_lossy());
    let out_path = out_dir.join(format!("{}-{}.png", stem, reader.zoom_label().text()));
    fs::write(&out_path, png)?;

    Ok(out_path)
}
