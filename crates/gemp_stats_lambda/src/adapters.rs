pub mod aws;
pub mod database;
pub mod object_store;
pub mod secret_store;
