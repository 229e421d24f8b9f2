pub mod action;
pub mod config;
pub mod state;
pub mod transcript;
