pub mod application;
pub mod payee;
pub mod ports;
pub mod wallet;
