pub mod model;
pub mod raster;
mod scope;
pub mod view;

pub use model::{Stage, TickSource};
pub use view::draw;

pub const TITLE_HEIGHT: f64 = 45.0; // mask band at the bottom of a tile
pub const TITLE_FONT_SIZE: f64 = 16.0;
pub const TITLE_MASK_ALPHA: f64 = 0.7;
pub const TITLE_MARGIN: f64 = 10.0; // horizontal room left around the text
pub const TITLE_ELLIPSIS_ROOM: f64 = 20.0; // kept free for " ..." on the last line
pub const TITLE_LINE_GAP: f64 = 4.0;
pub const ELLIPSIS: &str = " ...";

// Backdrop alpha laid over the mirrored tile, nearest edge first.
pub const REFLECTION_NEAR_ALPHA: f64 = 0.5;
pub const REFLECTION_FAR_ALPHA: f64 = 1.0;
