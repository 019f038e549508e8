pub mod aws;
pub mod database;
pub mod push;
