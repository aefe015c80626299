use crate::geometry::{Geometry, Size};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub base: Size,
    pub min_size: f64,
    pub y_offset: f64,
}

impl From<&Settings> for LayoutParams {
    fn from(settings: &Settings) -> Self {
        Self {
            base: settings.base_size(),
            min_size: settings.min_size,
            y_offset: settings.y_offset,
        }
    }
}

/// Geometry shared by every tile sitting `distance` positions away from the
/// selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSlot {
    pub distance: usize,
    pub factor: f64,
    pub width: f64,
    pub height: f64,
    pub z: usize,
    pub top: f64,
    pub offset: f64,
}

/// Fewer tiles shrink less, otherwise a two-tile carousel looks lopsided.
pub fn multiplier(count: usize) -> f64 {
    match count {
        5.. => 1.0,
        3..=4 => 0.75,
        _ => 0.5,
    }
}

/// Normalized shrink amount. Concave in `distance`: steep next to the
/// selection and flat towards the edges.
pub fn falloff(distance: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (distance as f64 / count as f64).sqrt() * multiplier(count)
}

impl LayoutSlot {
    pub fn compute(distance: usize, count: usize, params: &LayoutParams, container: Size) -> Self {
        let factor = falloff(distance, count);
        let width = params.base.width * (1.0 - factor * params.min_size);
        let height = params.base.height * (1.0 - factor * params.min_size);
        let free = container.width - width;

        Self {
            distance,
            factor,
            width,
            height,
            z: count.saturating_sub(distance),
            top: (container.height - height) / 2.0 + params.y_offset,
            offset: free / 2.0 + factor * free / 2.0,
        }
    }

    /// Tiles left of the selection are anchored from the right edge so both
    /// sides fan out symmetrically.
    pub fn place(&self, index: usize, selected: usize, container: Size) -> Geometry {
        let x = if index < selected {
            container.width - self.width - self.offset
        } else {
            self.offset
        };

        Geometry {
            x,
            y: self.top,
            width: self.width,
            height: self.height,
            z: self.z as f64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    slots: Vec<LayoutSlot>,
    container: Size,
}

impl Layout {
    pub fn compute(count: usize, params: &LayoutParams, container: Size) -> Self {
        let slots = match count {
            0 => Vec::new(),
            1 => vec![LayoutSlot::compute(0, 1, params, container)],
            _ => (0..=count)
                .map(|distance| LayoutSlot::compute(distance, count, params, container))
                .collect(),
        };

        Self { slots, container }
    }

    pub fn slots(&self) -> &[LayoutSlot] {
        &self.slots
    }

    pub fn slot(&self, distance: usize) -> Option<&LayoutSlot> {
        self.slots.get(distance)
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn placement(&self, index: usize, selected: usize) -> Option<Geometry> {
        self.slot(index.abs_diff(selected))
            .map(|slot| slot.place(index, selected, self.container))
    }
}
