//! KaiKanakku application orchestration layer
//!
//! Use cases wire the pure conversion engine in `kk-core` to the history store,
//! the settings store and the background scheduler.

pub mod app;
pub mod deps;
pub mod usecases;

pub use app::{App, UseCases};
pub use deps::AppDeps;
