//! Read-only HTTP API over a table of recipes, plus the batch importer that fills it.
//!
//! The server binary wires [`app::build_app`] to an [`state::AppState`]; the
//! `recipes-import` binary drives [`import`] once against the same database.

pub mod app;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod import;
pub mod logging;
pub mod recipes;
pub mod state;
