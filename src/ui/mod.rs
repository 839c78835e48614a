pub mod table;
pub mod theme;

pub use table::{OutputFormat, render};
