pub mod config;
pub mod db;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repositories;
