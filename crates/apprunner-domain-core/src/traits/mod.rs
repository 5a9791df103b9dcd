//! Core traits for custom domain association management
//!
//! - [`AppRunnerApi`]: The App Runner operations the lifecycle handlers consume

pub mod apprunner_api;

pub use apprunner_api::AppRunnerApi;
