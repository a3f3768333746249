pub mod alphabet;
pub mod cell;
pub mod mapping;
pub mod style;
