use crate::geometry::{Field, Geometry, Point};
use derive_more::{Display, From, Into};
use strum::IntoEnumIterator;

/// Steps used when the caller does not say how many ticks a move should take.
pub const DEFAULT_STEPS: u32 = 50;

/// Position of the tile's element in the configured list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct TileId(usize);

impl TileId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Destination of a move. Fields left as `None` stay where they are.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetGeometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z: Option<f64>,
}

impl TargetGeometry {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::X => self.x,
            Field::Y => self.y,
            Field::Width => self.width,
            Field::Height => self.height,
            Field::Z => self.z,
        }
    }
}

impl From<Geometry> for TargetGeometry {
    fn from(g: Geometry) -> Self {
        Self {
            x: Some(g.x),
            y: Some(g.y),
            width: Some(g.width),
            height: Some(g.height),
            z: Some(g.z),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    current: Geometry,
    target: Geometry,
    step: Geometry,
}

impl Tile {
    pub fn new(id: TileId, geometry: Geometry) -> Self {
        Self {
            id,
            current: geometry,
            target: geometry,
            step: Geometry::default(),
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn geometry(&self) -> &Geometry {
        &self.current
    }

    pub fn target(&self) -> &Geometry {
        &self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Spreads the distance to `target` evenly over `steps` ticks. A step
    /// count of zero is treated as one.
    pub fn set_target(&mut self, target: impl Into<TargetGeometry>, steps: Option<u32>) {
        let target = target.into();
        let steps = f64::from(steps.unwrap_or(DEFAULT_STEPS).max(1));

        for field in Field::iter() {
            let current = self.current.get(field);
            let (goal, step) = match target.get(field) {
                Some(goal) => (goal, (goal - current) / steps),
                None => (current, 0.0),
            };
            *self.target.get_mut(field) = goal;
            *self.step.get_mut(field) = step;
        }
    }

    /// One tick. Fields that already equal their target are left alone.
    pub fn advance(&mut self) {
        for field in Field::iter() {
            if self.current.get(field) != self.target.get(field) {
                *self.current.get_mut(field) += self.step.get(field);
            }
        }
    }

    pub fn snap(&mut self) {
        self.current = self.target;
        self.step = Geometry::default();
    }

    /// Moves the tile without animating.
    pub fn reset(&mut self, geometry: Geometry) {
        self.current = geometry;
        self.target = geometry;
        self.step = Geometry::default();
    }

    pub fn contains(&self, point: Point) -> bool {
        self.current.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn geometry(x: f64, y: f64, width: f64, height: f64, z: f64) -> Geometry {
        Geometry {
            x,
            y,
            width,
            height,
            z,
        }
    }

    fn assert_close(a: &Geometry, b: &Geometry) {
        for field in Field::iter() {
            assert!(
                (a.get(field) - b.get(field)).abs() < EPSILON,
                "{field}: {} != {}",
                a.get(field),
                b.get(field)
            );
        }
    }

    #[test]
    fn test_converges_after_step_count_ticks() {
        let mut tile = Tile::new(TileId::from(0), geometry(0.0, 0.0, 100.0, 50.0, 1.0));
        let goal = geometry(380.3, -12.5, 48.0, 27.0, 5.0);

        for steps in [1, 3, 8, 50] {
            tile.reset(geometry(0.0, 0.0, 100.0, 50.0, 1.0));
            tile.set_target(goal, Some(steps));
            for _ in 0..steps {
                tile.advance();
            }
            assert_close(tile.geometry(), &goal);
        }
    }

    #[test]
    fn test_default_step_count() {
        let mut tile = Tile::new(TileId::from(0), Geometry::default());
        let goal = geometry(50.0, 0.0, 0.0, 0.0, 0.0);
        tile.set_target(goal, None);

        tile.advance();
        assert!((tile.geometry().x - 1.0).abs() < EPSILON);

        for _ in 1..DEFAULT_STEPS {
            tile.advance();
        }
        assert_close(tile.geometry(), &goal);
    }

    #[test]
    fn test_missing_fields_are_frozen() {
        let start = geometry(10.0, 20.0, 30.0, 40.0, 2.0);
        let mut tile = Tile::new(TileId::from(3), start);
        tile.set_target(
            TargetGeometry {
                x: Some(110.0),
                ..TargetGeometry::default()
            },
            Some(4),
        );

        assert_eq!(tile.target().y, 20.0);
        assert_eq!(tile.target().z, 2.0);

        for _ in 0..4 {
            tile.advance();
        }
        assert!((tile.geometry().x - 110.0).abs() < EPSILON);
        assert_eq!(tile.geometry().width, 30.0);
        assert_eq!(tile.geometry().height, 40.0);
    }

    #[test]
    fn test_zero_steps_moves_in_one_tick() {
        let mut tile = Tile::new(TileId::from(0), Geometry::default());
        let goal = geometry(8.0, 4.0, 2.0, 1.0, 3.0);
        tile.set_target(goal, Some(0));
        tile.advance();
        assert_eq!(*tile.geometry(), goal);
        assert!(tile.is_settled());
    }

    #[test]
    fn test_settled_tile_does_not_move() {
        let start = geometry(1.0, 2.0, 3.0, 4.0, 5.0);
        let mut tile = Tile::new(TileId::from(0), start);
        tile.set_target(start, Some(8));
        tile.advance();
        assert_eq!(*tile.geometry(), start);
    }

    #[test]
    fn test_snap_and_reset() {
        let mut tile = Tile::new(TileId::from(0), Geometry::default());
        let goal = geometry(99.0, 1.0, 10.0, 10.0, 4.0);
        tile.set_target(goal, Some(8));
        tile.advance();
        assert!(!tile.is_settled());

        tile.snap();
        assert_eq!(*tile.geometry(), goal);
        tile.advance();
        assert_eq!(*tile.geometry(), goal);

        let elsewhere = geometry(5.0, 5.0, 5.0, 5.0, 1.0);
        tile.reset(elsewhere);
        assert_eq!(*tile.geometry(), elsewhere);
        assert_eq!(*tile.target(), elsewhere);
    }

    #[test]
    fn test_hit_uses_current_geometry() {
        let mut tile = Tile::new(TileId::from(0), geometry(0.0, 0.0, 10.0, 10.0, 1.0));
        tile.set_target(geometry(100.0, 0.0, 10.0, 10.0, 1.0), Some(2));
        assert!(tile.contains(Point::new(5.0, 5.0)));

        tile.advance();
        assert!(!tile.contains(Point::new(5.0, 5.0)));
        assert!(tile.contains(Point::new(55.0, 5.0)));
    }
}
