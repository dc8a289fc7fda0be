pub mod related;
pub mod scoring;
