//! Unit tests for individual components

mod builders_test;
mod cache_test;
mod config_test;
mod error_test;
mod logging_test;
mod util_test;
