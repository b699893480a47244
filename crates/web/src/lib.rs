//! HTTP front end for the bundled CRUD apps: settings, routing, pages and
//! request/response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod cookies;
pub mod middleware;
