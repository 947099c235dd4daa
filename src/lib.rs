// Re-export needed modules for testing
pub mod mock_data;
pub mod models;
pub mod shell; // Application state behind the terminal UI
pub mod sim; // Timers standing in for a real backend

// Re-export main types for convenience
pub use mock_data::{MockData, MockDataError};
pub use models::*;
pub use shell::Shell;
