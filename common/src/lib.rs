pub mod context;
pub mod stack;
pub mod template;

pub use context::{Context, Document, Flag, ServiceName};
pub use stack::Stack;
pub use template::{compose, ComposeError, ResourceGraph};
