// src/services/mod.rs
pub mod flow;
pub mod session_manager;
