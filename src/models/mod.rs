pub mod comparison;
pub mod content;
pub mod journal;
pub mod prediction;
pub mod profile;
pub mod session;
pub mod streak;
pub mod user;
