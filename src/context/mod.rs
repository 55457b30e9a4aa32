//! Request context shaping: language detection and prompt-size bounding.

pub mod language;
pub mod prepare;

pub use language::detect_language;
pub use prepare::prepare_context;
