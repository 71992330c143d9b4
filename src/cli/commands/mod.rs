pub mod check_config;
pub mod migrate;
pub mod serve;
