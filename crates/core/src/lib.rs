//! Domain logic for the project board: column completion rules, role
//! capabilities, form typing, dashboard aggregation, and Gantt layout.
//!
//! This crate has no database or HTTP dependencies; callers load rows and
//! pass plain values in.

pub mod board;
pub mod calendar;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod gantt;
pub mod roles;
pub mod sales_funnel;
pub mod types;

mod macros;
