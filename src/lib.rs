pub mod clients;
pub mod config;
pub mod domain;
pub mod services;
pub mod version;
pub mod web;
