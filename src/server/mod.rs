//! Stats server: shared broadcast timer, subscriber registry and the
//! axum routes that expose them.

pub mod broadcaster;
pub mod http;
pub mod registry;

pub use broadcaster::{BroadcastTimer, BroadcasterHandle};
pub use http::{serve, start_server_on, start_server_with_sampler, RunningServer};
pub use registry::{BroadcastReport, Registration, SubscriberId, SubscriptionRegistry};
