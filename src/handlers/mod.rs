// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod courses;
pub mod payment;
pub mod progress;
pub mod quiz;
