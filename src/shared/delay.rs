//! Deadline-ordered continuations guarded by session tokens.
//!
//! A timed step ("wait two seconds, then check for a bite") is scheduled with
//! the token of the session that asked for it. When the deadline passes the
//! continuation is handed back to the owner together with that token, and the
//! owner drops it unless the token is still current. Renewing the token on
//! reset is therefore enough to cancel everything still in flight.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionToken(u64);

#[derive(Debug, Clone, Default)]
pub struct SessionTokens {
    current: u64,
}

impl SessionTokens {
    pub fn current(&self) -> SessionToken {
        SessionToken(self.current)
    }

    /// Invalidates every token handed out so far.
    pub fn renew(&mut self) -> SessionToken {
        self.current = self.current.wrapping_add(1);
        self.current()
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        token.0 == self.current
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: f64,
    seq: u64,
    token: SessionToken,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct DelayQueue<T> {
    now: f64,
    next_seq: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn schedule(&mut self, delay_seconds: f32, token: SessionToken, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            deadline: self.now + delay_seconds.max(0.0) as f64,
            seq,
            token,
            payload,
        });
    }

    /// Moves the queue clock forward and returns every continuation that
    /// came due, earliest deadline first (ties in scheduling order).
    pub fn advance(&mut self, delta_seconds: f32) -> Vec<(SessionToken, T)> {
        self.now += delta_seconds.max(0.0) as f64;

        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.deadline <= now);
        self.pending = waiting;

        due.sort_by(|a, b| {
            a.deadline
                .total_cmp(&b.deadline)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|p| (p.token, p.payload)).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_continuations_come_back_in_deadline_order() {
        let mut tokens = SessionTokens::default();
        let token = tokens.renew();
        let mut queue = DelayQueue::default();
        queue.schedule(2.0, token, "late");
        queue.schedule(0.5, token, "early");
        queue.schedule(0.5, token, "early-second");

        assert!(queue.advance(0.4).is_empty());
        let due: Vec<_> = queue.advance(0.2).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["early", "early-second"]);
        assert_eq!(queue.len(), 1);

        let due: Vec<_> = queue.advance(5.0).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_renewed_token_marks_old_continuations_stale() {
        let mut tokens = SessionTokens::default();
        let first = tokens.renew();
        let mut queue = DelayQueue::default();
        queue.schedule(1.0, first, 1u8);

        let second = tokens.renew();
        queue.schedule(1.0, second, 2u8);

        let live: Vec<u8> = queue
            .advance(1.0)
            .into_iter()
            .filter(|(t, _)| tokens.is_current(*t))
            .map(|(_, p)| p)
            .collect();
        assert_eq!(live, vec![2]);
    }
}
