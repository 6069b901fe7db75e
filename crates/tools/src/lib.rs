pub mod ascii;
pub mod config_file;
pub mod logger;
pub mod seed;
