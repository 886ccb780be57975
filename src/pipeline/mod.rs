// src/pipeline/mod.rs
pub mod locator;
pub mod markers;
pub mod processor;
pub mod runtime;
pub mod scanner;
pub mod watcher;

pub use runtime::{ChatTranslator, Phase};
