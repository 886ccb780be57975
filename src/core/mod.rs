// src/core/mod.rs
pub mod dictionary;
pub mod engine;
pub mod lexicon;
pub mod types;
