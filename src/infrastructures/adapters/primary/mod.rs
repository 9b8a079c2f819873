pub mod session;
pub mod views;
pub mod web;
