mod analysis;
mod cli;
mod config;
mod convert;
mod entry;
mod handlers;
mod state;
mod store;
mod text;
mod utils;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod text_test;

pub use entry::run;
