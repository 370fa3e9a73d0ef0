mod builder;
mod canvas;
mod component;
mod error;
mod frame_loop;
mod interaction;
mod params;
mod render;
mod state;
mod types;

pub use component::RelationGraph;
pub use types::{GraphVariant, Record};
