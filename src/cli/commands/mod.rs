pub mod generate;
pub mod analyze;
pub mod document;
pub mod check;
