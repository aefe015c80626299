use super::scope::Scoped;
use super::{
    ELLIPSIS, TITLE_ELLIPSIS_ROOM, TITLE_FONT_SIZE, TITLE_HEIGHT, TITLE_LINE_GAP, TITLE_MARGIN,
    TITLE_MASK_ALPHA,
};
use crate::config::{BoxColor, Style};
use cairo::{Context, Format, ImageSurface};
use coverflow::{Element, Settings};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use std::iter::{Peekable, zip};

/// Whether offscreen cairo surfaces can be created at all.
pub fn probe() -> bool {
    match ImageSurface::create(Format::ARgb32, 1, 1).and_then(|s| Context::new(&s)) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Offscreen rendering unavailable: {}", e);
            false
        }
    }
}

/// Pre-renders one tile at full size: border, background, the thumbnail
/// fitted inside and the title band.
pub fn rasterize(
    element: &Element,
    pixbuf: Option<&Pixbuf>,
    settings: &Settings,
    style: &Style,
) -> Result<ImageSurface, cairo::Error> {
    let (bw, bh) = (settings.box_width.ceil(), settings.box_height.ceil());
    let surface = ImageSurface::create(Format::ARgb32, bw as i32, bh as i32)?;
    {
        let cr = Context::new(&surface)?;
        let pad = settings.padding;
        let (iw, ih) = (bw - 2.0 * pad, bh - 2.0 * pad);

        fill_rect(&cr, style.color, 0.0, 0.0, bw, bh)?;
        fill_rect(&cr, style.box_bg, pad, pad, iw, ih)?;
        if let Some(pixbuf) = pixbuf {
            draw_thumb(&cr, pixbuf, pad, iw, ih)?;
        }
        if !element.title.is_empty() {
            draw_title(&cr, &element.title, pad, iw, ih)?;
        }
    }
    surface.flush();
    Ok(surface)
}

fn fill_rect(cr: &Context, color: BoxColor, x: f64, y: f64, w: f64, h: f64) -> Result<(), cairo::Error> {
    if color.is_transparent() {
        return Ok(());
    }
    let (r, g, b, a) = color.rgba().into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.rectangle(x, y, w, h);
    cr.fill()
}

fn draw_thumb(cr: &Context, pixbuf: &Pixbuf, pad: f64, iw: f64, ih: f64) -> Result<(), cairo::Error> {
    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
    let (w, h) = fit(pw, ph, iw, ih);
    if w <= 0.0 || h <= 0.0 {
        return Ok(());
    }

    let cr = Scoped::new(cr)?;
    cr.translate(pad + ((iw - w) / 2.0).floor(), pad + ((ih - h) / 2.0).floor());
    cr.scale(w / pw, h / ph);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()
}

fn draw_title(cr: &Context, title: &str, pad: f64, iw: f64, ih: f64) -> Result<(), cairo::Error> {
    let cr = Scoped::new(cr)?;
    let bottom = pad + ih;

    cr.set_source_rgba(0.0, 0.0, 0.0, TITLE_MASK_ALPHA);
    cr.rectangle(pad, bottom - TITLE_HEIGHT, iw, TITLE_HEIGHT);
    cr.fill()?;

    cr.select_font_face("Sans", cairo::FontSlant::Italic, cairo::FontWeight::Normal);
    cr.set_font_size(TITLE_FONT_SIZE);
    cr.set_source_rgb(1.0, 1.0, 1.0);

    let measure = |s: &str| cr.text_extents(s).map(|e| e.x_advance()).unwrap_or(0.0);
    let lines = wrap_title(title, iw - TITLE_MARGIN, measure);

    let centers = if lines.len() > 1 {
        let top = bottom - ((TITLE_HEIGHT + TITLE_FONT_SIZE) / 2.0).floor();
        vec![top, top + TITLE_LINE_GAP + TITLE_FONT_SIZE]
    } else {
        vec![bottom - (TITLE_HEIGHT / 2.0).floor()]
    };

    let cx = pad + (iw / 2.0).floor();
    for (line, cy) in zip(&lines, centers) {
        let ext = cr.text_extents(line)?;
        cr.move_to(
            cx - ext.width() / 2.0 - ext.x_bearing(),
            cy - ext.height() / 2.0 - ext.y_bearing(),
        );
        cr.show_text(line)?;
    }
    Ok(())
}

/// Scales `(width, height)` down to fit `max_w` x `max_h`, keeping the ratio.
/// Smaller images keep their size.
pub fn fit(width: f64, height: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let ratio = width / height;
    let (mut w, mut h) = (width, height);
    if w > max_w {
        w = max_w;
        h = max_w / ratio;
    }
    if h > max_h {
        h = max_h;
        w = max_h * ratio;
    }
    (w, h)
}

/// Breaks `title` into at most two lines no wider than `max_width`.
///
/// The second line keeps [`TITLE_ELLIPSIS_ROOM`] free and ends in an ellipsis
/// when words are left over. A first word too wide on its own is cut and
/// ellipsized on a single line.
pub fn wrap_title(title: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    if measure(title) <= max_width {
        return vec![title.to_string()];
    }
    let narrow = max_width - TITLE_ELLIPSIS_ROOM;
    let mut words = title.split_whitespace().peekable();

    let top = fill_line(&mut words, max_width, &measure);
    if top.is_empty() {
        let word = words.next().unwrap_or_default();
        return vec![ellipsize(word, narrow, &measure)];
    }
    if words.peek().is_none() {
        return vec![top];
    }

    let mut bottom = fill_line(&mut words, narrow, &measure);
    if bottom.is_empty() {
        bottom = ellipsize(words.next().unwrap_or_default(), narrow, &measure);
    } else if words.peek().is_some() {
        bottom.push_str(ELLIPSIS);
    }
    vec![top, bottom]
}

fn fill_line<'a>(
    words: &mut Peekable<impl Iterator<Item = &'a str>>,
    limit: f64,
    measure: &impl Fn(&str) -> f64,
) -> String {
    let mut line = String::new();
    while let Some(word) = words.peek() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if measure(&candidate) > limit {
            break;
        }
        line = candidate;
        words.next();
    }
    line
}

fn ellipsize(word: &str, limit: f64, measure: &impl Fn(&str) -> f64) -> String {
    let mut line = String::new();
    for c in word.chars() {
        line.push(c);
        if measure(&line) > limit {
            line.pop();
            break;
        }
    }
    line.push_str(ELLIPSIS);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f64 {
        s.chars().count() as f64 * 10.0
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit(480.0, 270.0, 240.0, 135.0), (240.0, 135.0));
        assert_eq!(fit(100.0, 400.0, 240.0, 135.0), (33.75, 135.0));
        assert_eq!(fit(50.0, 50.0, 240.0, 135.0), (50.0, 50.0));
        assert_eq!(fit(0.0, 50.0, 240.0, 135.0), (0.0, 0.0));
    }

    #[test]
    fn test_short_title_is_one_line() {
        assert_eq!(wrap_title("Rust", 100.0, chars), vec!["Rust"]);
    }

    #[test]
    fn test_long_title_wraps_with_ellipsis() {
        assert_eq!(
            wrap_title("aaaa bbbb cccc dddd eeee ffff", 100.0, chars),
            vec!["aaaa bbbb", "cccc ..."]
        );
        assert_eq!(
            wrap_title("aaaa bbbb cccc", 100.0, chars),
            vec!["aaaa bbbb", "cccc"]
        );
    }

    #[test]
    fn test_oversized_words_are_cut() {
        assert_eq!(
            wrap_title("abcdefghijklmnop", 100.0, chars),
            vec!["abcdefgh ..."]
        );
        assert_eq!(
            wrap_title("ab abcdefghijklmnop", 100.0, chars),
            vec!["ab", "abcdefgh ..."]
        );
    }

    #[test]
    fn test_rasterize_size() {
        let settings = Settings::default();
        let element = Element::new("A rather long title for a small tile", "");
        let surface = rasterize(&element, None, &settings, &Style::default()).unwrap();
        assert_eq!(surface.width(), 246);
        assert_eq!(surface.height(), 141);
    }
}
