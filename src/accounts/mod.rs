//! Account management: profile reads, updates and deletion

mod service;

pub use service::AccountService;
