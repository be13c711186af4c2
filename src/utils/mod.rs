//! Text utilities shared by the catalog and the extractor

pub mod fuzzy;
pub mod normalize;
