//! Common test utilities for docferry integration tests

#[allow(dead_code)]
pub mod callbacks;
#[allow(dead_code)]
pub mod service;

#[allow(unused_imports)]
pub use callbacks::*;
#[allow(unused_imports)]
pub use service::*;
