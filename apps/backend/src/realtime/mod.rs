// Live task snapshots for connected clients:
// mutation -> publisher (read all tasks) -> broadcaster -> every observer mailbox

pub mod broadcast;
pub mod publisher;
pub mod registry;

pub use broadcast::{Broadcaster, Delivery, DeliveryReport};
pub use publisher::SnapshotPublisher;
pub use registry::{Observer, ObserverId, ObserverState};
