pub mod callgraph;
pub mod document;
pub mod drawing;
pub mod error;
pub mod layout;
pub mod style;
