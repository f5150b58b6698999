//! Core feedline library (feed model, formatting, buffer, driver, providers, config).

pub mod config;
pub mod credentials;
pub mod feed;
pub mod interrupt;
pub mod logging;
pub mod providers;
