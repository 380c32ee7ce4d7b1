
pub mod intake;
pub mod server;
