pub mod message;
pub mod providers;
pub mod route;
