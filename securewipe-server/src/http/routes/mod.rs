//! Route handlers organized by resource

pub mod certificates;
mod fields;
pub mod health;
pub mod login;
