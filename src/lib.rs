//! # rotten-erp
//!
//! Record keeping for a small textile-production business: workshops,
//! articles, tasks, processes and production orders.
//!
//! The whole dataset is one aggregate stored as a single JSON blob under a
//! fixed key of a key-value store. [`db::Db`] is the repository over it and
//! [`view`] holds the headless table, editor, order form and dashboard.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod storage;
pub mod telemetry;
pub mod view;
