pub mod task;

pub use task::{find_artifacts, launch, locate_script, ScriptOpener, SystemOpener};
