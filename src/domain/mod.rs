pub mod access;
pub mod cart;
pub mod errors;
pub mod money;
pub mod order;
pub mod ports;
pub mod timeline;
