pub mod contestant;
pub mod json;
