// src/api/handlers/mod.rs
mod assets;
mod health;
mod views;

pub use assets::static_file_handler;
pub use health::{get_session, health_check};
pub use views::{close_view, get_view, open_view, select_file, submit};
