//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod bus;
pub mod clock;
pub mod device;
pub mod storage;
pub mod ui;

pub use bus::{DeviceBus, DeviceBusContext};
pub use clock::{Clock, SystemClock};
pub use device::Device;
pub use storage::DataStorage;
pub use ui::UserInterface;
