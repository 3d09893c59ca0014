//! Command implementations and shared terminal helpers.

pub mod chat;
pub mod classify;
pub mod config;
pub mod credential;
pub mod interactive;
pub mod render;
