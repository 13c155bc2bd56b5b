//! Formbuilder - A local-first dynamic form builder with live validation

pub mod commands;
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod preview;
pub mod store;
pub mod tui;
pub mod validation;
