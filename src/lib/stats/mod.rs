pub mod sampler;
pub mod snapshot;
