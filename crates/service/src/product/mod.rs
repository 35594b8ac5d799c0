//! Product module: repository abstraction plus the ownership and
//! barcode-uniqueness policy applied on top of it.

pub mod repository;
pub mod service;

pub use service::ProductService;
