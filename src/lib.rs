//! elCameJob: a marketplace where clients post jobs and workers apply to them.
//!
//! The services in [`api`] implement the job and application lifecycle over
//! the repository ports in [`db::repository`]; [`api::routes`] exposes them
//! over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod seed;
pub mod shutdown;
