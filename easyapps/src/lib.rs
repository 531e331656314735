pub mod actions;
pub mod api;
pub mod cli;
pub mod form;
pub mod models;
pub mod services;
pub mod settings;
