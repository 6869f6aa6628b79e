use glam::Vec2;

/// Raw pointer (touch) event as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: u64,
    pub kind: PointerEventKind,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerEvent {
    pub fn down(id: u64, position: Vec2) -> Self {
        Self { id, kind: PointerEventKind::Down, position }
    }

    pub fn moved(id: u64, position: Vec2) -> Self {
        Self { id, kind: PointerEventKind::Move, position }
    }

    pub fn up(id: u64, position: Vec2) -> Self {
        Self { id, kind: PointerEventKind::Up, position }
    }
}

/// Per-tick phase of an active pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Began,
    Moved,
    Stationary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: u64,
    pub position: Vec2,
    pub phase: PointerPhase,
}

/// Snapshot of the pointers for one tick, ordered first-down first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    pub active: Vec<Pointer>,
}

impl PointerFrame {
    pub fn count(&self) -> usize {
        self.active.len()
    }

    pub fn primary(&self) -> Option<&Pointer> {
        self.active.first()
    }

    /// The primary pointer went down this tick, i.e. a tap for mode dispatch.
    pub fn primary_began(&self) -> Option<Vec2> {
        self.primary()
            .filter(|p| p.phase == PointerPhase::Began)
            .map(|p| p.position)
    }

    pub fn any_began(&self) -> bool {
        self.active.iter().any(|p| p.phase == PointerPhase::Began)
    }

    pub fn any_moved(&self) -> bool {
        self.active.iter().any(|p| p.phase == PointerPhase::Moved)
    }
}

/// Tracks current pointer state between platform events and ticks.
pub struct InputState {
    pointers: Vec<Pointer>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pointers: Vec::new(),
        }
    }

    /// Call after each tick to age per-tick state.
    pub fn begin_frame(&mut self) {
        for p in &mut self.pointers {
            p.phase = PointerPhase::Stationary;
        }
    }

    pub fn handle_event(&mut self, event: &PointerEvent) {
        let existing = self.pointers.iter().position(|p| p.id == event.id);
        match (event.kind, existing) {
            (PointerEventKind::Down, None) => {
                self.pointers.push(Pointer {
                    id: event.id,
                    position: event.position,
                    phase: PointerPhase::Began,
                });
            }
            (PointerEventKind::Down, Some(i)) => {
                // Lost an Up somewhere; treat as a fresh press.
                self.pointers[i].position = event.position;
                self.pointers[i].phase = PointerPhase::Began;
            }
            (PointerEventKind::Move, Some(i)) => {
                let p = &mut self.pointers[i];
                if p.position != event.position {
                    p.position = event.position;
                    // A press and a move in the same tick still reads as a press.
                    if p.phase != PointerPhase::Began {
                        p.phase = PointerPhase::Moved;
                    }
                }
            }
            (PointerEventKind::Up | PointerEventKind::Cancel, Some(i)) => {
                self.pointers.remove(i);
            }
            (_, None) => {
                log::debug!("Ignoring {:?} for unknown pointer {}", event.kind, event.id);
            }
        }
    }

    pub fn frame(&self) -> PointerFrame {
        PointerFrame {
            active: self.pointers.clone(),
        }
    }

    pub fn active_count(&self) -> usize {
        self.pointers.len()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
