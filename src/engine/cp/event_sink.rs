use enumset::EnumSet;

use super::DomainEvent;
use crate::basic_types::KeyedVec;
use crate::engine::variables::VariableId;

/// While a propagator runs, the domain changes it performs are captured as events in the event
/// sink. When the propagator finishes, the event sink is drained to notify all the propagators that
/// subscribe to those events.
///
/// All events on the same variable are merged into a single entry, so every variable is reported
/// at most once per drain.
#[derive(Default, Clone, Debug)]
pub(crate) struct EventSink {
    present: KeyedVec<VariableId, EnumSet<DomainEvent>>,
    variables: Vec<VariableId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, events: EnumSet<DomainEvent>, variable: VariableId) {
        if events.is_empty() {
            return;
        }

        let present = &mut self.present[variable];
        if present.is_empty() {
            self.variables.push(variable);
        }
        present.insert_all(events);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (EnumSet<DomainEvent>, VariableId)> + '_ {
        let present = &mut self.present;
        self.variables.drain(..).map(move |variable| {
            let events = present[variable];
            present[variable] = EnumSet::new();
            (events, variable)
        })
    }

    pub(crate) fn clear(&mut self) {
        let _ = self.drain().count();
    }
}
