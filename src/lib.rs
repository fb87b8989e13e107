// src/lib.rs
pub mod api;
pub mod backend;
pub mod banner;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
