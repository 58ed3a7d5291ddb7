//! Command-line Google Calendar client with a live and a fixture-backed mock transport.

pub mod auth;
pub mod calendar;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod formatters;
pub mod transport;
