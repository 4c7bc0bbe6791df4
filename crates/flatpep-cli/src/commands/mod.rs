pub mod build;
pub mod export;
pub mod info;
