pub mod api;
pub mod cli;
pub mod controller;
pub mod models;
pub mod services;
pub mod settings;
pub mod view;
