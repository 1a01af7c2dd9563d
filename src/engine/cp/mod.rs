mod assignments;
mod domain_events;
mod event_sink;
mod implication_graph;
pub mod propagation;
mod propagator_queue;
pub(crate) mod trailed;
mod watch_list_cp;

pub(crate) use assignments::Assignments;
pub use assignments::DomainOperation;
pub(crate) use assignments::TrailEntry;
pub use domain_events::DomainEvent;
pub use domain_events::DomainEvents;
pub(crate) use event_sink::EventSink;
pub use implication_graph::ImplicationGraph;
pub(crate) use propagator_queue::PropagatorQueue;
pub(crate) use watch_list_cp::WatchListCP;
