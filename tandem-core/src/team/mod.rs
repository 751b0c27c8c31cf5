//! Role-specialized agent teams and the manager that composes them

pub mod debug;
pub mod manager;
pub mod research;

pub use debug::{DebugTeam, ErrorInfo, FixInfo};
pub use manager::TeamManager;
pub use research::ResearchTeam;
