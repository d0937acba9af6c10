//! In-process implementations of every host collaborator.
//!
//! These back the integration tests and the scenario simulator, and are
//! usable by any host that manages window geometry itself.

mod animations;
mod groups;
mod host;
mod relay;
mod transactions;
mod window;

pub use animations::AnimationSet;
pub use groups::WindowGroups;
pub use host::MemoryHost;
pub use relay::RecordingRelay;
pub use transactions::MemoryTransactions;
pub use window::MemoryWindow;
