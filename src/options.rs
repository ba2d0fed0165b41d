use std::env;
use std::str::FromStr;

/// The options that control how pages are laid out and zoomed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewerOptions {
    /// By how much the native page size should be scaled initially.
    pub scale: f32,
    /// The step used by zoom in/out when no explicit amount is given.
    pub zoom_step: f32,
    /// Vertical gap between two consecutive surfaces, in pixels.
    pub page_spacing: f32,
    /// Height of the visible part of the frame, in pixels.
    pub viewport_height: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zoom_step: 0.25,
            page_spacing: 8.0,
            viewport_height: 800.0,
        }
    }
}

impl ViewerOptions {
    /// Start from the defaults and override every field that has a matching
    /// `PAGESCROLL_*` environment variable set.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        override_from_env("PAGESCROLL_SCALE", &mut options.scale);
        override_from_env("PAGESCROLL_ZOOM_STEP", &mut options.zoom_step);
        override_from_env("PAGESCROLL_PAGE_SPACING", &mut options.page_spacing);
        override_from_env("PAGESCROLL_VIEWPORT_HEIGHT", &mut options.viewport_height);

        options
    }
}

fn override_from_env<T: FromStr>(name: &str, field: &mut T) {
    let Ok(raw) = env::var(name) else {
        return;
    };

    match raw.trim().parse() {
        Ok(value) => *field = value,
        Err(_) => log::warn!("ignoring {}: cannot parse {:?}", name, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reader_behaviour() {
        let options = ViewerOptions::default();
        assert_eq!(options.scale, 1.0);
        assert_eq!(options.zoom_step, 0.25);
    }

    #[test]
    fn env_overrides_and_ignores_garbage() {
        env::set_var("PAGESCROLL_ZOOM_STEP", "0.5");
        env::set_var("PAGESCROLL_PAGE_SPACING", "wide");

        let options = ViewerOptions::from_env();
        assert_eq!(options.zoom_step, 0.5);
        assert_eq!(options.page_spacing, ViewerOptions::default().page_spacing);

        env::remove_var("PAGESCROLL_ZOOM_STEP");
        env::remove_var("PAGESCROLL_PAGE_SPACING");
    }
}
