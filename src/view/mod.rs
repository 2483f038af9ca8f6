//! Headless presentation layer.
//!
//! View models for the collection tables and their editor, the order form
//! and the dashboard. They read a snapshot and call the repository; drawing
//! is left to the caller (the `erp` binary prints them as text).

pub mod dashboard;
pub mod fields;
pub mod order_form;
pub mod table;

pub use dashboard::{DashboardStats, dashboard};
pub use fields::{FieldDescriptor, FieldKind, Form, view_of};
pub use order_form::OrderForm;
pub use table::{Confirm, DeleteOutcome, Listing, Mode, SaveOutcome, TableView};
