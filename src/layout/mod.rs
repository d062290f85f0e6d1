//! Annotation layout passes that run after cursor geometry is known.

pub mod label_stack;

pub use label_stack::{LabelOffset, LabelStackConfig, resolve_label_stack};
