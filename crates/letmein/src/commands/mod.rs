pub mod config_cmd;
pub mod run;
pub mod sync;
