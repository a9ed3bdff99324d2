// tests/integration/availability/mod.rs
