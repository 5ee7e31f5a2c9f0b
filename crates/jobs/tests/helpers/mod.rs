#![allow(dead_code)]

pub mod mock_store;

pub use mock_store::FlakyStore;
