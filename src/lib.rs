pub mod app;
pub mod config;
pub mod models;
pub mod navigator;
pub mod params;
pub mod state;
pub mod tmdb;
pub mod view;
