//! Text analysis pipeline.
//!
//! This module provides the field processing components:
//! - **Normalizer**: Lowercases raw field text
//! - **Tokenizer**: Splits lowercased text at word boundaries and re-merges ignore symbols

pub mod normalizer;
pub mod tokenizer;

pub use normalizer::FieldNormalizer;
pub use tokenizer::Tokenizer;
