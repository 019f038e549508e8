pub mod push;
pub mod token;
