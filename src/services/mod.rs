pub mod aggregates;
pub mod avatar;
pub mod content;
pub mod improvement;
pub mod inference;
pub mod text;
pub mod trends;
