pub mod check;
pub mod config;
pub mod helpers;
pub mod processes;
pub mod run;
pub mod summary;
