pub mod charts;
pub mod dictionary;
pub mod panels;
