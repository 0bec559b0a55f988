pub mod config;
pub mod coords;
pub mod idlists;
pub mod layout;
pub mod plotting;
pub mod select;
pub mod sumstats;
pub mod types;
