//! Collaborator traits for the engines audioleaf orchestrates.

mod narrator;
mod parser;
mod rasterizer;
mod recognizer;

pub use narrator::*;
pub use parser::*;
pub use rasterizer::*;
pub use recognizer::*;
