pub mod model;
pub mod properties;
pub mod script;
pub mod writer;

pub use model::{
    Difficulty, GameMode, Installation, LevelType, ProvisioningRequest, SetupForm,
    DEFAULT_PORT, DEFAULT_RAM_MB,
};
pub use properties::ServerProperties;
pub use script::LaunchScript;
pub use writer::write_installation;
