//! HTTP handlers for the feedback service

pub mod feedback;
pub mod health;
pub mod routes;
