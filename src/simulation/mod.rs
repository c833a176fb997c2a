pub mod engine;
pub mod matrix;
pub mod sampler;
pub mod summary;
