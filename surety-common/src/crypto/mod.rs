pub mod hash;

pub use hash::FieldHasher;
