use std::collections::VecDeque;

/// Holds server messages back while an animation is playing.
///
/// The budget counts the frames left before queued messages may be applied.
/// It only grows through [`UpdateGate::raise_budget`] and only shrinks
/// through [`UpdateGate::countdown`], one frame at a time.
#[derive(Debug)]
pub struct UpdateGate<M> {
    budget: u32,
    pending: VecDeque<M>,
}

impl<M> Default for UpdateGate<M> {
    fn default() -> Self {
        UpdateGate {
            budget: 0,
            pending: VecDeque::new(),
        }
    }
}

impl<M> UpdateGate<M> {
    /// Returns the message back when it may be applied right away, otherwise
    /// queues it.
    #[must_use]
    pub fn submit(&mut self, message: M) -> Option<M> {
        if self.budget == 0 {
            return Some(message);
        }
        self.pending.push_back(message);
        None
    }

    pub fn raise_budget(&mut self, ticks: u32) {
        self.budget = self.budget.max(ticks);
    }

    /// Spends one frame of budget. True when this frame used up the last of
    /// it, which is the moment queued messages become ready.
    pub fn countdown(&mut self) -> bool {
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;
        self.budget == 0
    }

    /// Next queued message, as long as no animation holds the gate.
    pub fn pop_ready(&mut self) -> Option<M> {
        if self.budget > 0 {
            return None;
        }
        self.pending.pop_front()
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.budget = 0;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_gate_passes_messages_through() {
        let mut gate = UpdateGate::default();
        assert_eq!(gate.submit("game"), Some("game"));
        assert_eq!(gate.pending(), 0);
        assert!(!gate.countdown());
    }

    #[test]
    fn budget_only_extends() {
        let mut gate = UpdateGate::<()>::default();
        gate.raise_budget(20);
        for ticks in [10, 30, 5, 0, 25] {
            let before = gate.budget();
            gate.raise_budget(ticks);
            assert_eq!(gate.budget(), before.max(ticks));
        }
        assert_eq!(gate.budget(), 30);

        assert!(!gate.countdown());
        assert_eq!(gate.budget(), 29);
    }

    #[test]
    fn queued_messages_drain_in_order() {
        let mut gate = UpdateGate::default();
        gate.raise_budget(3);
        let mut applied = Vec::new();

        for n in 0..5 {
            assert!(gate.submit(n).is_none());
            assert_eq!(gate.pop_ready(), None);
            if n == 1 {
                assert!(!gate.countdown());
            }
        }

        assert!(!gate.countdown());
        assert!(gate.countdown());
        // Message 2 starts a new animation and holds the rest back.
        while let Some(n) = gate.pop_ready() {
            applied.push(n);
            if n == 2 {
                gate.raise_budget(2);
            }
        }
        assert_eq!(applied, [0, 1, 2]);
        assert_eq!(gate.pending(), 2);

        assert!(!gate.countdown());
        assert!(gate.countdown());
        applied.extend(std::iter::from_fn(|| gate.pop_ready()));
        assert_eq!(applied, [0, 1, 2, 3, 4]);
    }

    #[derive(Clone, Copy)]
    enum Step {
        /// Submit a message whose animation lasts this many frames.
        Submit(u32),
        Frame,
    }

    #[test]
    fn applied_order_matches_submit_order_under_any_schedule() {
        use Step::{Frame, Submit};

        let schedules: &[&[Step]] = &[
            &[Submit(0), Submit(0), Submit(0)],
            &[Submit(3), Submit(0), Submit(2), Submit(0)],
            &[Submit(2), Frame, Submit(1), Frame, Submit(0), Frame, Submit(4)],
            &[Submit(1), Submit(1), Submit(1), Frame, Frame, Submit(0)],
            &[Frame, Submit(5), Frame, Frame, Submit(0), Submit(3), Frame, Submit(1)],
            &[Submit(0), Submit(2), Frame, Frame, Frame, Submit(2), Submit(0), Submit(2)],
            &[Submit(10), Submit(1), Frame, Submit(10), Frame, Submit(0), Submit(0)],
        ];

        for (n, schedule) in schedules.iter().enumerate() {
            let mut gate = UpdateGate::default();
            let mut lengths = Vec::new();
            let mut applied = Vec::new();

            let apply = |gate: &mut UpdateGate<usize>, applied: &mut Vec<usize>, id: usize, len: u32| {
                applied.push(id);
                gate.raise_budget(len);
            };

            for step in schedule.iter().copied() {
                match step {
                    Submit(len) => {
                        let id = lengths.len();
                        lengths.push(len);
                        if let Some(id) = gate.submit(id) {
                            apply(&mut gate, &mut applied, id, len);
                        }
                    }
                    Frame => {
                        if gate.countdown() {
                            while let Some(id) = gate.pop_ready() {
                                apply(&mut gate, &mut applied, id, lengths[id]);
                            }
                        }
                    }
                }
                assert!(applied.iter().copied().eq(0..applied.len()), "schedule {n}: {applied:?}");
            }

            for _ in 0..100 {
                if gate.countdown() {
                    while let Some(id) = gate.pop_ready() {
                        apply(&mut gate, &mut applied, id, lengths[id]);
                    }
                }
            }
            assert_eq!(gate.pending(), 0, "schedule {n}");
            assert!(applied.iter().copied().eq(0..lengths.len()), "schedule {n}: {applied:?}");
        }
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut gate = UpdateGate::default();
        gate.raise_budget(40);
        let _ = gate.submit('x');
        gate.clear();
        assert_eq!(gate.budget(), 0);
        assert_eq!(gate.pop_ready(), None);
        assert_eq!(gate.submit('y'), Some('y'));
    }
}
