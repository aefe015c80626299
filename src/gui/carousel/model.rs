use super::raster;
use crate::config::{Config, Style};
use cairo::ImageSurface;
use coverflow::{Carousel, RenderMode, SettingsError, Size, TileId, TimerHandle};
use gdk_pixbuf::Pixbuf;

/// A running `glib` timeout driving one transition.
#[derive(Debug)]
pub struct TickSource(pub glib::SourceId);

impl TimerHandle for TickSource {
    fn cancel(self) {
        self.0.remove();
    }
}

/// Everything the drawing area paints: the carousel and the pre-rendered tile
/// images.
pub struct Stage {
    pub carousel: Carousel<TickSource>,
    art: Vec<Option<ImageSurface>>,
    style: Style,
}

impl Stage {
    pub fn new(config: &Config, container: Size) -> Result<Self, SettingsError> {
        let mode = resolve_mode(config);
        let carousel = Carousel::new(
            config.carousel.clone(),
            config.elements.clone(),
            container,
            mode,
        )?;
        Ok(Self {
            art: vec![None; carousel.len()],
            carousel,
            style: config.style.clone(),
        })
    }

    pub fn art(&self, id: TileId) -> Option<&ImageSurface> {
        self.art.get(id.index()).and_then(Option::as_ref)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Renders the tile for `id` with its thumbnail, or without one when
    /// loading failed. Returns `true` once every tile has its image.
    pub fn set_image(&mut self, id: TileId, pixbuf: Option<&Pixbuf>) -> bool {
        let Some(element) = self.carousel.element(id) else {
            return false;
        };
        match raster::rasterize(element, pixbuf, self.carousel.settings(), &self.style) {
            Ok(surface) => {
                if let Some(slot) = self.art.get_mut(id.index()) {
                    *slot = Some(surface);
                }
            }
            Err(e) => log::warn!("Failed to render tile {}: {}", id, e),
        }
        self.carousel.mark_loaded(id)
    }
}

fn resolve_mode(config: &Config) -> RenderMode {
    if config.force_static {
        log::info!("Static rendering forced by configuration");
        RenderMode::Static
    } else if !raster::probe() {
        RenderMode::Static
    } else {
        RenderMode::Animated
    }
}
