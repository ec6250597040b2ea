pub mod range;
pub mod sniff;
pub mod upload;
