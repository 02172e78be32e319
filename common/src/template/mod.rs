mod cloudformation;
mod compose;
pub mod graph;
pub mod sanitize;

pub use cloudformation::{Template, IMAGE_URI_PARAMETER};
pub use compose::{compose, ComposeError};
pub use graph::ResourceGraph;
