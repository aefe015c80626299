use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Rounds both dimensions down to whole, even pixels so the centered tile
    /// is not drawn on a half pixel.
    pub fn even(self) -> Self {
        Self {
            width: even_floor(self.width),
            height: even_floor(self.height),
        }
    }
}

fn even_floor(value: f64) -> f64 {
    let value = value.floor().max(0.0);
    value - value % 2.0
}

/// The animated attributes of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    X,
    Y,
    Width,
    Height,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z: f64,
}

impl Geometry {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::X => self.x,
            Field::Y => self.y,
            Field::Width => self.width,
            Field::Height => self.height,
            Field::Z => self.z,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut f64 {
        match field {
            Field::X => &mut self.x,
            Field::Y => &mut self.y,
            Field::Width => &mut self.width,
            Field::Height => &mut self.height,
            Field::Z => &mut self.z,
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_drops_odd_pixels() {
        let size = Size::new(1001.7, 403.0).even();
        assert_eq!(size, Size::new(1000.0, 402.0));
        assert_eq!(Size::new(-3.0, 0.5).even(), Size::new(0.0, 0.0));
    }

    #[test]
    fn test_contains_includes_edges() {
        let g = Geometry {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            z: 1.0,
        };
        assert!(g.contains(Point::new(10.0, 20.0)));
        assert!(g.contains(Point::new(110.0, 70.0)));
        assert!(g.contains(Point::new(60.0, 45.0)));
        assert!(!g.contains(Point::new(9.9, 45.0)));
        assert!(!g.contains(Point::new(60.0, 70.1)));
    }

    #[test]
    fn test_field_accessors_agree() {
        use strum::IntoEnumIterator;

        let mut g = Geometry::default();
        for (i, field) in Field::iter().enumerate() {
            *g.get_mut(field) = i as f64;
        }
        assert_eq!(g.x, 0.0);
        assert_eq!(g.z, 4.0);
        assert_eq!(g.get(Field::Height), 3.0);
        assert_eq!(Field::Width.to_string(), "width");
    }
}
