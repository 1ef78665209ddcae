pub mod params;
pub mod responses;
