#[macro_use]
pub mod utils;
