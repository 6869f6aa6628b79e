/// Newly detected surfaces reported by the tracking subsystem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceAdded {
    pub surface_ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&SurfaceAdded)>;

/// Observer list for surface-added notifications.
///
/// Callbacks are informational only; they get the event and nothing else,
/// so they cannot reach into the object registry.
#[derive(Default)]
pub struct SurfaceEvents {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl SurfaceEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SurfaceAdded) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber in subscription order. Empty
    /// events are dropped.
    pub fn notify(&mut self, event: &SurfaceAdded) {
        if event.surface_ids.is_empty() {
            return;
        }
        log::debug!("{} new surface(s) detected", event.surface_ids.len());
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}
