//! Logging setup for the shell. Everything goes to `./prospect.log` so the
//! terminal stays free for command output and rendering.

use std::fs::File;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

pub fn initialize() {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();
    match File::create("./prospect.log") {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Info, config, file);
        }
        Err(err) => {
            eprintln!("Warning: could not create ./prospect.log: {err}");
        }
    }
}
