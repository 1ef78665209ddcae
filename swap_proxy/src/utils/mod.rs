pub mod json;
pub mod number_conversion;
