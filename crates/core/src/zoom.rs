use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::model::{NodeId, Tree};

/// Identifies one accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Idle,
    Transitioning {
        from: NodeId,
        to: NodeId,
        ticket: Ticket,
    },
}

/// Completion signal for an in-flight transition.
///
/// The renderer keeps this until its animation ends and then calls
/// [`TransitionHandle::finish`]. Dropping the handle counts as finishing, so
/// a renderer that loses it cannot wedge the controller. The controller only
/// notices on its next [`ZoomController::poll`].
#[derive(Debug)]
pub struct TransitionHandle {
    ticket: Ticket,
    tx: Sender<Ticket>,
}

impl TransitionHandle {
    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for TransitionHandle {
    fn drop(&mut self) {
        // The controller may already be gone; nothing left to unblock then.
        let _ = self.tx.send(self.ticket);
    }
}

/// Which node is displayed and whether a level change is in flight.
///
/// At most one transition runs at a time. Requests arriving meanwhile are
/// dropped, not queued.
#[derive(Debug)]
pub struct ZoomController {
    current: NodeId,
    state: ZoomState,
    next_ticket: u64,
    done_tx: Sender<Ticket>,
    done_rx: Receiver<Ticket>,
}

impl ZoomController {
    pub fn new(root: NodeId) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            current: root,
            state: ZoomState::Idle,
            next_ticket: 0,
            done_tx,
            done_rx,
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, ZoomState::Transitioning { .. })
    }

    /// Breadcrumb target: the parent of the displayed node, if any.
    pub fn parent_target(&self, tree: &Tree) -> Option<NodeId> {
        tree.parent(self.current)
    }

    /// Start a transition to `target`, making it the current node.
    ///
    /// Returns `None` when there is no target or a transition is in flight.
    pub fn request(&mut self, target: Option<NodeId>) -> Option<TransitionHandle> {
        let Some(to) = target else {
            tracing::trace!("zoom request without target ignored");
            return None;
        };
        if let ZoomState::Transitioning { to: busy, .. } = self.state {
            tracing::trace!(requested = to.0, in_flight = busy.0, "zoom request dropped");
            return None;
        }
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let from = self.current;
        self.state = ZoomState::Transitioning { from, to, ticket };
        self.current = to;
        tracing::debug!(from = from.0, to = to.0, ticket = ticket.0, "transition started");
        Some(TransitionHandle {
            ticket,
            tx: self.done_tx.clone(),
        })
    }

    /// Drain completion signals. Returns true if the in-flight transition
    /// ended.
    pub fn poll(&mut self) -> bool {
        let mut finished = false;
        while let Ok(ticket) = self.done_rx.try_recv() {
            match self.state {
                ZoomState::Transitioning { ticket: live, to, .. } if live == ticket => {
                    self.state = ZoomState::Idle;
                    finished = true;
                    tracing::debug!(node = to.0, ticket = ticket.0, "transition finished");
                }
                _ => tracing::trace!(ticket = ticket.0, "stale transition completion"),
            }
        }
        finished
    }

    /// Cancel the in-flight transition and go back to the node it left.
    pub fn abort(&mut self) {
        if let ZoomState::Transitioning { from, ticket, .. } = self.state {
            tracing::debug!(ticket = ticket.0, "transition aborted");
            self.current = from;
            self.state = ZoomState::Idle;
        }
    }
}
