//! Concrete [`MarketDataSource`](crate::MarketDataSource) implementations.

mod backend;

pub use backend::BackendAdapter;
