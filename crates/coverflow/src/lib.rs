//! Layout and animation engine for a cover-flow carousel.
//!
//! Tiles shrink and recede with their distance from the selected one. A
//! navigation retargets every tile from the [`layout::Layout`] table and the
//! [`scheduler::TransitionScheduler`] steps them there over a fixed number of
//! ticks. The engine owns no timer or drawing surface: the host supplies a
//! [`scheduler::TimerHandle`] and a [`carousel::TileRenderer`].

pub mod carousel;
pub mod geometry;
pub mod layout;
mod macros;
pub mod scheduler;
pub mod settings;
pub mod tile;

pub use carousel::{Carousel, Click, Navigation, RenderMode, TickOutcome, TileRenderer};
pub use geometry::{Geometry, Point, Size};
pub use scheduler::{RunId, TimerHandle};
pub use settings::{AnimationSettings, Element, Settings, SettingsError, TileUrl, Title};
pub use tile::{Tile, TileId};
