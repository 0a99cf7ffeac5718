// ABOUTME: Library crate for csvenrich exposing the wizard for testing and embedding

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod detect;
pub mod input;
pub mod models;
pub mod suggest;
