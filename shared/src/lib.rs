// Data model shared between the trend engine and whatever renders its output.

pub mod models;
pub mod utils;
