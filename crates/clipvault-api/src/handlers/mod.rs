pub mod health;
pub mod meta;
pub mod search;
pub mod upload;
pub mod video;
