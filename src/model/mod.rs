pub mod pair;
pub mod separator;
