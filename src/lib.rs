pub mod conf;
pub mod core;
pub mod io;
pub mod service;

#[cfg(feature = "testutil")]
pub mod testutil;
