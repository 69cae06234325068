pub mod note;
pub mod session;
