// transforms over `name: value` variable lists, plus the plumbing to run them
//
// everything in the transform modules is a plain function over strings and pairs; the
// workbench is the only part that knows about configuration and saved state
pub mod config;
pub mod css;
pub mod dedupe;
pub mod diff;
pub mod group;
pub mod mapping;
pub mod parse;
pub mod resolve;
pub mod sort;
pub mod storage;
pub mod tokens;
pub mod workbench;

pub use workbench::{Handler, Workbench};
