pub mod calibration;
pub mod compose;
pub mod config;
pub mod constants;
pub mod events;
pub mod gesture;
pub mod interaction;
pub mod overlay;
pub mod pose;
pub mod scheduler;
pub mod session;

pub use calibration::*;
pub use compose::*;
pub use config::*;
pub use events::*;
pub use gesture::*;
pub use interaction::*;
pub use overlay::*;
pub use pose::*;
pub use scheduler::*;
pub use session::*;
