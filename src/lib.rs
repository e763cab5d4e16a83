// src/lib.rs
//! Resume ingestion: load documents, extract candidate data through a
//! language model, and append one CSV row per new file.
pub mod extractors;
pub mod loader;
pub mod pipeline;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;
