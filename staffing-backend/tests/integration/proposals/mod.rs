// tests/integration/proposals/mod.rs

pub mod listing_tests;
