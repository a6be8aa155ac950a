pub mod resources;

pub use resources::{ResolvePath, Resources};
