// file: src/steps/mod.rs
// version: 2.0.0
// guid: 1cf26723-cc7a-44b9-bfba-1f30f82e7fae

//! Step chain used to sequence the onboarding pages.
//!
//! Steps live in an arena and link to each other by [`StepId`], so a step
//! can point back at its predecessor without owning it. The chain owns the
//! cursor: the only way to move it is [`StepChain::advance`] or
//! [`StepChain::go_back`], and both honour the per-step gates.

use tracing::debug;

/// Identifier of a step inside its [`StepChain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(usize);

impl StepId {
    /// Position of the step in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Direction of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A completed cursor move, handed to the page transition controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Step the cursor left
    pub from: StepId,

    /// Step the cursor is now on
    pub to: StepId,

    /// Which way the cursor moved
    pub direction: Direction,
}

/// A single step in the chain
#[derive(Debug, Clone)]
pub struct Step<C> {
    id: StepId,
    content: C,
    can_advance: bool,
    allow_return: bool,
    return_enabled: bool,
    next: Option<StepId>,
    previous: Option<StepId>,
}

impl<C> Step<C> {
    fn new(id: StepId, content: C, allow_return: bool, previous: Option<StepId>) -> Self {
        Self {
            id,
            content,
            can_advance: false,
            allow_return,
            return_enabled: true,
            next: None,
            previous,
        }
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Advance gate
    pub fn can_advance(&self) -> bool {
        self.can_advance
    }

    /// Whether this step was built to allow going back at all
    pub fn allow_return(&self) -> bool {
        self.allow_return
    }

    /// Return gate
    pub fn return_enabled(&self) -> bool {
        self.return_enabled
    }

    /// Whether going back would currently succeed
    pub fn can_return(&self) -> bool {
        self.previous.is_some() && self.allow_return && self.return_enabled
    }

    /// A successor exists, so advancing is available once the gate opens
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn next(&self) -> Option<StepId> {
        self.next
    }

    pub fn previous(&self) -> Option<StepId> {
        self.previous
    }
}

/// Ordered chain of steps with a single cursor
#[derive(Debug, Clone)]
pub struct StepChain<C> {
    steps: Vec<Step<C>>,
    current: StepId,
}

impl<C> StepChain<C> {
    /// Create a chain whose head (and cursor) holds `content`
    pub fn new(content: C) -> Self {
        let head = StepId(0);
        Self {
            steps: vec![Step::new(head, content, false, None)],
            current: head,
        }
    }

    pub fn head(&self) -> StepId {
        StepId(0)
    }

    pub fn current(&self) -> StepId {
        self.current
    }

    pub fn step(&self, id: StepId) -> Option<&Step<C>> {
        self.steps.get(id.0)
    }

    pub fn current_step(&self) -> &Step<C> {
        &self.steps[self.current.0]
    }

    pub fn content(&self, id: StepId) -> Option<&C> {
        self.step(id).map(Step::content)
    }

    pub fn content_mut(&mut self, id: StepId) -> Option<&mut C> {
        self.steps.get_mut(id.0).map(|step| &mut step.content)
    }

    /// Last step reachable by following `next` links from `from`
    pub fn tail_of(&self, from: StepId) -> StepId {
        let mut id = from;
        while let Some(next) = self.step(id).and_then(Step::next) {
            id = next;
        }
        id
    }

    /// Append a step.
    ///
    /// Without `override_tail` the new step goes after the tail reachable
    /// from `from`, no matter where the cursor is. With `override_tail` it
    /// replaces the successor of `from` and everything after it is detached.
    /// Gates are left untouched: the new step starts with its advance gate
    /// closed and its return gate open.
    pub fn append(&mut self, from: StepId, content: C, allow_return: bool, override_tail: bool) -> StepId {
        let anchor = if override_tail { from } else { self.tail_of(from) };
        let id = StepId(self.steps.len());

        if let Some(detached) = self.steps[anchor.0].next.take() {
            debug!("Detaching step {} from step {}", detached.0, anchor.0);
            self.steps[detached.0].previous = None;
        }

        self.steps.push(Step::new(id, content, allow_return, Some(anchor)));
        self.steps[anchor.0].next = Some(id);

        if !self.is_linked(self.current) {
            self.current = anchor;
        }

        id
    }

    /// Move forward from `from`. No-op unless `from` has a successor and its
    /// advance gate is open.
    pub fn advance(&mut self, from: StepId) -> Option<Transition> {
        let step = self.step(from)?;
        if !step.can_advance {
            return None;
        }
        let to = step.next?;
        self.current = to;
        Some(Transition {
            from,
            to,
            direction: Direction::Forward,
        })
    }

    /// Move back from `from`. No-op unless `from` has a predecessor, allows
    /// returning and its return gate is open.
    pub fn go_back(&mut self, from: StepId) -> Option<Transition> {
        let step = self.step(from)?;
        if !step.can_return() {
            return None;
        }
        let to = step.previous?;
        self.current = to;
        Some(Transition {
            from,
            to,
            direction: Direction::Backward,
        })
    }

    pub fn set_advance_gate(&mut self, id: StepId, enabled: bool) {
        if let Some(step) = self.steps.get_mut(id.0) {
            step.can_advance = enabled;
        }
    }

    pub fn set_return_gate(&mut self, id: StepId, enabled: bool) {
        if let Some(step) = self.steps.get_mut(id.0) {
            step.return_enabled = enabled;
        }
    }

    /// Flip the advance gate and return its new state
    pub fn toggle_advance_gate(&mut self, id: StepId) -> bool {
        match self.steps.get_mut(id.0) {
            Some(step) => {
                step.can_advance = !step.can_advance;
                step.can_advance
            }
            None => false,
        }
    }

    /// Flip the return gate and return its new state
    pub fn toggle_return_gate(&mut self, id: StepId) -> bool {
        match self.steps.get_mut(id.0) {
            Some(step) => {
                step.return_enabled = !step.return_enabled;
                step.return_enabled
            }
            None => false,
        }
    }

    /// Steps reachable from the head, in order
    pub fn iter(&self) -> impl Iterator<Item = &Step<C>> + '_ {
        let mut cursor = Some(self.head());
        std::iter::from_fn(move || {
            let step = self.step(cursor?)?;
            cursor = step.next;
            Some(step)
        })
    }

    /// Number of steps reachable from the head
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn is_linked(&self, id: StepId) -> bool {
        self.iter().any(|step| step.id == id)
    }
}
