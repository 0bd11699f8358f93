pub mod image;
pub mod filter;
