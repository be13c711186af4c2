//! Core conversation logic for gaan

pub mod conversation;
pub mod crons;
pub mod extractor;
pub mod intent;
pub mod prompt;

#[cfg(test)]
pub(crate) mod fixtures;
