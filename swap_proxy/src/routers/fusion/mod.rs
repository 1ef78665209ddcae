pub mod fusion;
pub mod requests;
pub mod responses;
