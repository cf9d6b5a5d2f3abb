//! Middleware layers applied around the feedback routes

pub mod cors;
pub mod logging;
