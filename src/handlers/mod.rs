pub mod echo;
pub mod notes;
pub mod proxy;
pub mod session;
pub mod upload;
