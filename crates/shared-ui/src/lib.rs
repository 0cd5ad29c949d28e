//! Themed Dioxus components shared by the StaffDesk app.
//!
//! Each component lives in its own directory with a co-located stylesheet
//! that is pulled in through `asset!` the first time it renders.

pub mod components;
pub mod theme;

pub use components::*;
