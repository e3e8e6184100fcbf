pub mod application;
pub mod applog;
pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod listing;
pub mod ops;
pub mod search;
pub mod session;

pub use autoapply_common::error_mapping;
pub use autoapply_common::protocol;
