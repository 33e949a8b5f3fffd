//! ptrack: a terminal client for the student progress backend.
//!
//! Parents sign in, browse their child's academic, attendance and
//! engagement data, triage alerts and ask the AI assistant for insights.
//! Every page can also run against a built-in demo data set.

pub mod activity;
pub mod alerts;
pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod http;
pub mod models;
pub mod store;
pub mod ui;
pub mod validation;
