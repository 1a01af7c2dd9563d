use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// The kinds of domain changes a propagator can subscribe to.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// The domain became a single value.
    Assign,
    LowerBound,
    UpperBound,
    /// A value was removed; this is also raised alongside bound events caused by a removal.
    Removal,
}

/// Commonly used combinations of [`DomainEvent`]s.
#[derive(Debug, Clone, Copy)]
pub struct DomainEvents;

impl DomainEvents {
    /// Lower and upper bound tightening (but not other value removal).
    pub const BOUNDS: EnumSet<DomainEvent> =
        enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound);
    /// Bound tightening and assignment to a single value.
    pub const BOUNDS_AND_ASSIGN: EnumSet<DomainEvent> =
        enum_set!(DomainEvent::Assign | DomainEvent::LowerBound | DomainEvent::UpperBound);
    /// Every kind of change to the domain.
    pub const ANY_INT: EnumSet<DomainEvent> = enum_set!(
        DomainEvent::Assign
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    );
    /// Only assignment to a single value.
    pub const ASSIGN: EnumSet<DomainEvent> = enum_set!(DomainEvent::Assign);
}
