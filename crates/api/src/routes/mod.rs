//! HTTP Routes

pub mod forecast;
pub mod form;
