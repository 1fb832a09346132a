//! Stream event decoding: line repair and typed events.

pub mod model;
pub mod normalizer;

pub use model::{StepTag, StreamEvent};
pub use normalizer::{NormalizedLine, normalize_line};
