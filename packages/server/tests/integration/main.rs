mod common;

mod assets;
mod context;
mod generation;
mod projects;
