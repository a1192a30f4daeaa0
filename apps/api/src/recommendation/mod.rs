//! Recommendation pipeline: validate → analyze → retrieve → score → shape.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod repository;
pub mod scoring;
pub mod service;
