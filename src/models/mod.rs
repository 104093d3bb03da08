pub mod gemini;
pub mod image;
pub mod view;

pub use gemini::*;
pub use image::*;
pub use view::*;
