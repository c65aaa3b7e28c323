//! HTTP service: configuration, gate middleware, login exchange and session
//! endpoints.

pub mod app;
pub mod config;
pub mod context;
pub mod cookie;
pub mod middleware;
