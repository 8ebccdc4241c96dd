pub mod errors;
pub mod quote;
pub mod recipient;
