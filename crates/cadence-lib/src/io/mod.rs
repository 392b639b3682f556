pub mod report;
pub mod roster;
pub mod text;
