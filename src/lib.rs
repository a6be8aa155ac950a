pub mod app;
pub mod cli;
pub mod render;
pub mod sprite;
pub mod surface;
pub mod text;
pub mod widget;
pub mod window;
