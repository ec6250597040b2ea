//! Data models shared between the stores and the HTTP layer.

mod video;

pub use video::*;
