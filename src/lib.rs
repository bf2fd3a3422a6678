// Crate root library declaration and module exports.
pub mod archive;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod model;
pub mod report;
pub mod storage;
pub mod system;
pub mod view;
