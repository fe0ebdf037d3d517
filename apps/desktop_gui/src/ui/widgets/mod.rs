//! Reusable widgets: dismissal routing and the two-level dropdown.

pub mod dismiss;
pub mod dropdown;
pub mod dropdown_view;
