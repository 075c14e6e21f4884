//! Multi-step operations that must run atomically.
//!
//! Each function opens one transaction on the pool, drives the repositories
//! through `&mut *tx`, and commits only when every step succeeded. Pure
//! decisions (completion policy, hierarchy rules, progress) come from
//! `crmboard_core`.

pub mod card_lifecycle;
pub mod cascade;
pub mod column_lifecycle;
pub mod stage_lifecycle;
