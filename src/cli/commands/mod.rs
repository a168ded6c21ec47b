pub mod config;
pub mod extract;
pub mod index;
pub mod inspect;
pub mod scan;
