//! Secondary document-processing surface: PDF text extraction, LLM document
//! summarization, and DOCX→PDF conversion proxied to Gotenberg.

pub mod converter;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod summarizer;
