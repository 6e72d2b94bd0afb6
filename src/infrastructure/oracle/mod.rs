//! Timestamp oracle infrastructure module

mod gemini;

pub use gemini::GeminiOracle;
