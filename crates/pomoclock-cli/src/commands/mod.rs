pub mod config;
pub mod run;
pub mod simulate;

mod options;

pub use options::TimerOptions;
