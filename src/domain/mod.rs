pub mod extract;
pub mod package;
pub mod ports;
pub mod reply;
pub mod session;
