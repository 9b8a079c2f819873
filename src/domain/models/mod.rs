pub mod account;
pub mod extras;
pub mod identifier;
pub mod pulse;
pub mod repository;
