pub mod credentials;
pub mod export;
