//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: The trading gateway interface
//! - **Services**: Retry execution, constraints caching, trailing stops
//! - **Use Cases**: One trading command each

pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::*;
pub use services::*;
pub use use_cases::*;
