pub mod collector;
pub mod matcher;
