pub mod augment;
pub mod names;
pub mod parse;
pub mod status;
