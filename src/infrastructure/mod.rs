pub mod config;
pub mod database;
pub mod github;
pub mod webhook;
