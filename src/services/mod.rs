// src/services/mod.rs
pub mod alpha_vantage;
pub mod cache;
pub mod metrics;
pub mod prime;
