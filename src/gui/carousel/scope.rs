use cairo::Context;
use std::ops::Deref;

/// Saves the context state on creation and restores it when dropped.
pub struct Scoped<'a> {
    cr: &'a Context,
}

impl<'a> Scoped<'a> {
    pub fn new(cr: &'a Context) -> Result<Self, cairo::Error> {
        cr.save()?;
        Ok(Self { cr })
    }
}

impl Deref for Scoped<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.cr
    }
}

impl Drop for Scoped<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cr.restore() {
            log::error!("Failed to restore cairo state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Format, ImageSurface};

    #[test]
    fn test_state_restored_on_drop() {
        let surface = ImageSurface::create(Format::ARgb32, 4, 4).unwrap();
        let cr = Context::new(&surface).unwrap();
        cr.set_line_width(2.0);
        {
            let scoped = Scoped::new(&cr).unwrap();
            scoped.set_line_width(7.0);
            scoped.translate(1.0, 1.0);
            assert_eq!(cr.line_width(), 7.0);
        }
        assert_eq!(cr.line_width(), 2.0);
        assert_eq!(cr.user_to_device(0.0, 0.0), (0.0, 0.0));
    }
}
