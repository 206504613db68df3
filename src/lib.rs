pub mod catalog;
pub mod cli;
pub mod config;
pub mod filters;
pub mod listing;
pub mod models;
