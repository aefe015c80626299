use super::model::Stage;
use super::scope::Scoped;
use super::{REFLECTION_FAR_ALPHA, REFLECTION_NEAR_ALPHA};
use crate::gui::theme::ThemeColors;
use cairo::{Context, ImageSurface, LinearGradient};
use coverflow::{Geometry, RenderMode, Tile, TileRenderer};

/// Paints tiles with their fading reflection underneath.
struct CairoPainter<'a> {
    cr: &'a Context,
    stage: &'a Stage,
    colors: &'a ThemeColors,
}

impl TileRenderer for CairoPainter<'_> {
    type Error = cairo::Error;

    fn draw_tile(&mut self, tile: &Tile) -> Result<(), Self::Error> {
        let g = tile.geometry();
        let Some(surface) = self.stage.art(tile.id()).filter(|_| is_visible(g)) else {
            return Ok(());
        };
        paint_scaled(self.cr, surface, g, false)?;
        paint_scaled(self.cr, surface, g, true)?;
        self.fade_reflection(g)
    }
}

impl CairoPainter<'_> {
    fn fade_reflection(&self, g: &Geometry) -> Result<(), cairo::Error> {
        let top = g.y + g.height;
        let (r, gr, b, _) = self.colors.backdrop.into_components();
        let gradient = LinearGradient::new(0.0, top, 0.0, top + g.height);
        gradient.add_color_stop_rgba(0.0, r, gr, b, REFLECTION_NEAR_ALPHA);
        gradient.add_color_stop_rgba(1.0, r, gr, b, REFLECTION_FAR_ALPHA);

        let cr = Scoped::new(self.cr)?;
        cr.set_source(&gradient)?;
        cr.rectangle(g.x, top, g.width, g.height);
        cr.fill()
    }
}

/// Static mode: tiles only, no reflection.
struct PlainPainter<'a> {
    cr: &'a Context,
    stage: &'a Stage,
}

impl TileRenderer for PlainPainter<'_> {
    type Error = cairo::Error;

    fn draw_tile(&mut self, tile: &Tile) -> Result<(), Self::Error> {
        let g = tile.geometry();
        if !is_visible(g) {
            return Ok(());
        }
        match self.stage.art(tile.id()) {
            Some(surface) => paint_scaled(self.cr, surface, g, false),
            None => {
                // Image still loading or rendering failed: draw the bare box.
                let style = self.stage.style();
                for (color, inset) in [(style.color, 0.0), (style.box_bg, 1.0)] {
                    if color.is_transparent() {
                        continue;
                    }
                    let (r, gr, b, a) = color.rgba().into_components();
                    self.cr.set_source_rgba(r, gr, b, a);
                    self.cr.rectangle(
                        g.x + inset,
                        g.y + inset,
                        g.width - 2.0 * inset,
                        g.height - 2.0 * inset,
                    );
                    self.cr.fill()?;
                }
                Ok(())
            }
        }
    }
}

fn is_visible(g: &Geometry) -> bool {
    g.width > 0.0 && g.height > 0.0
}

/// Draws `surface` stretched over `g`, or mirrored into the band just below
/// it.
fn paint_scaled(
    cr: &Context,
    surface: &ImageSurface,
    g: &Geometry,
    mirrored: bool,
) -> Result<(), cairo::Error> {
    let (sw, sh) = (surface.width() as f64, surface.height() as f64);
    let cr = Scoped::new(cr)?;
    if mirrored {
        cr.translate(g.x, g.y + 2.0 * g.height);
        cr.scale(g.width / sw, -g.height / sh);
    } else {
        cr.translate(g.x, g.y);
        cr.scale(g.width / sw, g.height / sh);
    }
    cr.set_source_surface(surface, 0.0, 0.0)?;
    cr.paint()
}

pub fn draw(cr: &Context, stage: &Stage, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.backdrop.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.paint()?;

    match stage.carousel.mode() {
        RenderMode::Animated => stage.carousel.render(&mut CairoPainter { cr, stage, colors }),
        RenderMode::Static => stage.carousel.render(&mut PlainPainter { cr, stage }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use cairo::Format;
    use coverflow::{Element, Size, TileId};
    use palette::Srgba;

    fn pixel(surface: &mut ImageSurface, x: usize, y: usize) -> [u8; 4] {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let i = y * stride + x * 4;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    #[test]
    fn test_draw_paints_tiles_and_reflection() {
        let config = Config {
            elements: vec![Element::new("", "")],
            ..Config::default()
        };
        let mut stage = Stage::new(&config, Size::new(400.0, 400.0)).unwrap();
        assert!(stage.set_image(TileId::from(0), None));
        let g = *stage.carousel.tile(TileId::from(0)).unwrap().geometry();

        let mut target = ImageSurface::create(Format::ARgb32, 400, 400).unwrap();
        {
            let cr = Context::new(&target).unwrap();
            let colors = ThemeColors {
                backdrop: Srgba::new(0.0, 0.0, 0.0, 1.0),
            };
            draw(&cr, &stage, &colors).unwrap();
        }
        target.flush();

        // Tile center is the white box background.
        let (cx, cy) = ((g.x + g.width / 2.0) as usize, (g.y + g.height / 2.0) as usize);
        assert_eq!(pixel(&mut target, cx, cy), [255, 255, 255, 255]);

        // The reflection right under the tile is dimmed but not black.
        let near = pixel(&mut target, cx, (g.y + g.height + 2.0 * g.height / 10.0) as usize);
        assert!(near[0] > 0 && near[0] < 255);

        // Outside any tile only the backdrop shows.
        assert_eq!(pixel(&mut target, 1, 1), [0, 0, 0, 255]);
    }
}
