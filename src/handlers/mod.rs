pub mod auth;
pub mod checkins;
pub mod comparisons;
pub mod forms;
pub mod health;
pub mod home;
pub mod journal;
pub mod predictions;
pub mod trends;
