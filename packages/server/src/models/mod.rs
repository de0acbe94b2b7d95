pub mod asset;
pub mod context;
pub mod image;
pub mod project;
pub mod shared;
pub mod tryon;
pub mod video;
