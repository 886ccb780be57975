// src/lib.rs

pub mod config;
pub mod core;
pub mod dom;
pub mod errors;
pub mod persistence;
pub mod pipeline;
pub mod settings;

pub use crate::core::engine::TranslationEngine;
pub use crate::core::types::TranslationResult;
pub use crate::errors::{Result, TranslatorError};
pub use crate::pipeline::ChatTranslator;
