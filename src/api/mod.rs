//! REST API endpoints

pub mod health;
pub mod jobs;
pub mod series;
pub mod webhook;
