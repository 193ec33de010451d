//! Append-only notification log.

use tribute_types::AudienceEvent;

/// Events awaiting pickup by an external transport.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<AudienceEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: AudienceEvent) {
        self.events.push(event);
    }

    /// Undelivered events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[AudienceEvent] {
        &self.events
    }

    /// Hand every undelivered event to the caller.
    pub fn drain(&mut self) -> Vec<AudienceEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tribute_types::{AccountId, EventKind};

    use super::*;

    fn event(seq: u64) -> AudienceEvent {
        AudienceEvent {
            seq,
            at: Utc::now(),
            kind: EventKind::Requested {
                from: AccountId::new(),
                to: AccountId::new(),
            },
        }
    }

    #[test]
    fn drain_empties_log_in_order() {
        let mut log = EventLog::new();
        log.push(event(1));
        log.push(event(2));
        assert_eq!(log.len(), 2);

        let drained = log.drain();
        assert_eq!(drained.iter().map(|e| e.seq).collect::<Vec<_>>(), vec![1, 2]);
        assert!(log.is_empty());
        assert!(log.events().is_empty());
    }
}
