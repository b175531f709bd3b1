// src/services/mod.rs

pub mod grading;
pub mod payment;
pub mod progress;
pub mod store;
