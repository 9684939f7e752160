pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod store;
pub mod task;
pub mod ui;

#[cfg(test)]
mod test_support;
