pub mod app;
pub mod config;
pub mod core;
pub mod event;
pub mod games;
pub mod ui;
