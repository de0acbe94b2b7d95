pub mod assets;
pub mod context;
pub mod health;
pub mod images;
pub mod projects;
pub mod tryon;
pub mod videos;
