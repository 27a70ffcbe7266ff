//! Kiosk client for the student/faculty attendance backend.
//!
//! Scan an ID card, then record an entry or exit timestamp for that person.

#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod config;
#[cfg(feature = "gui")]
pub mod gui;
pub mod identity;
pub mod logging;
pub mod scanner;
pub mod screens;
