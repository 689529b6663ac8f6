//! TaskDesk Client Library
//!
//! Native task-management client: a generic data table (column inference,
//! filtering, sorting, pagination, export) on top of a REST task API, with
//! live assignment notifications over STOMP.

rust_i18n::i18n!("locales", fallback = "es");

pub mod app;
pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod services;
pub mod states;
pub mod table;
pub mod views;
