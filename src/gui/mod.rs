pub mod app;
pub mod carousel;
pub mod theme;
pub mod window;
