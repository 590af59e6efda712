pub mod builder;
pub mod interface;
pub mod session;
