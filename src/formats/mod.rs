pub mod summary;
pub mod tap;
