pub mod filter;
pub mod models;
pub mod repos;
pub mod repository;
pub mod store;
