/// Deferred work measured in engine steps.
///
/// Tasks carry plain data actions rather than callbacks. The owner asks the
/// scheduler for the actions that are due at the current step and applies
/// them itself, so a task never holds a reference into the state it will
/// eventually mutate.
///
/// Every task has a `CancelToken`. Cancelled tasks never yield another
/// action, including the remaining steps of a sequence.
use std::cell::Cell;
use std::collections::BTreeMap;
use std::collections::VecDeque;

use crate::RefPointer;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(RefPointer<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Debug)]
pub struct TaskHandle {
    id: u64,
    token: CancelToken,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// One step of a sequence: wait `delay` steps after the previous step fired
/// (or after the sequence was scheduled), then yield `action`.
#[derive(Clone, Debug)]
pub struct SequenceStep<A> {
    pub delay: u64,
    pub action: A,
}

impl<A> SequenceStep<A> {
    pub fn new(delay: u64, action: A) -> Self {
        Self { delay, action }
    }
}

#[derive(Debug)]
enum TaskKind<A> {
    Once(A),
    Repeating { interval: u64, action: A },
    Sequence(VecDeque<SequenceStep<A>>),
}

#[derive(Debug)]
struct Task<A> {
    due_step: u64,
    token: CancelToken,
    kind: TaskKind<A>,
}

#[derive(Debug)]
pub struct Scheduler<A> {
    next_id: u64,
    tasks: BTreeMap<u64, Task<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            tasks: BTreeMap::new(),
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, due_step: u64, kind: TaskKind<A>) -> TaskHandle {
        self.next_id += 1;
        let token = CancelToken::default();
        self.tasks.insert(
            self.next_id,
            Task {
                due_step,
                token: token.clone(),
                kind,
            },
        );
        TaskHandle {
            id: self.next_id,
            token,
        }
    }

    /// Yield `action` once, `delay` steps after `now`.
    pub fn run_after(&mut self, now: u64, delay: u64, action: A) -> TaskHandle {
        self.insert(now + delay, TaskKind::Once(action))
    }

    /// Yield `action` every `interval` steps, starting `interval` steps after
    /// `now`, until cancelled.
    pub fn run_every(&mut self, now: u64, interval: u64, action: A) -> TaskHandle {
        assert!(interval > 0, "repeating task needs a non-zero interval");
        self.insert(now + interval, TaskKind::Repeating { interval, action })
    }

    /// Yield each step's action in order, each delayed relative to the one
    /// before it.
    pub fn run_sequence(&mut self, now: u64, steps: Vec<SequenceStep<A>>) -> TaskHandle {
        let steps = VecDeque::from(steps);
        let due_step = now + steps.front().map(|step| step.delay).unwrap_or(0);
        self.insert(due_step, TaskKind::Sequence(steps))
    }

    pub fn cancel(&mut self, handle: &TaskHandle) {
        handle.token.cancel();
        self.tasks.remove(&handle.id);
    }

    pub fn cancel_all(&mut self) {
        for task in self.tasks.values() {
            task.token.cancel();
        }
        self.tasks.clear();
    }

    pub fn is_pending(&self, handle: &TaskHandle) -> bool {
        !handle.is_cancelled() && self.tasks.contains_key(&handle.id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect every action due at or before `now`, ordered by due step and
    /// then by scheduling order. Sequence steps with a zero delay fire in the
    /// same call as the step before them.
    pub fn drain_due(&mut self, now: u64) -> Vec<A> {
        let mut due: Vec<(u64, u64, A)> = Vec::new();
        let mut finished = Vec::new();
        for (id, task) in self.tasks.iter_mut() {
            loop {
                if task.token.is_cancelled() {
                    finished.push(*id);
                    break;
                }
                if task.due_step > now {
                    break;
                }
                match &mut task.kind {
                    TaskKind::Once(action) => {
                        due.push((task.due_step, *id, action.clone()));
                        finished.push(*id);
                        break;
                    }
                    TaskKind::Repeating { interval, action } => {
                        due.push((task.due_step, *id, action.clone()));
                        task.due_step += *interval;
                    }
                    TaskKind::Sequence(steps) => {
                        let Some(step) = steps.pop_front() else {
                            finished.push(*id);
                            break;
                        };
                        due.push((task.due_step, *id, step.action));
                        match steps.front() {
                            Some(next) => task.due_step += next.delay,
                            None => {
                                finished.push(*id);
                                break;
                            }
                        }
                    }
                }
            }
        }
        for id in finished {
            self.tasks.remove(&id);
        }
        due.sort_by_key(|(due_step, id, _)| (*due_step, *id));
        due.into_iter().map(|(_, _, action)| action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_fires_at_due_step() {
        let mut scheduler = Scheduler::new();
        scheduler.run_after(10, 5, "a");
        assert!(scheduler.drain_due(14).is_empty());
        assert_eq!(scheduler.drain_due(15), vec!["a"]);
        assert!(scheduler.drain_due(100).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn repeating_fires_every_interval() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.run_every(0, 60, "tick");
        let mut ticks = 0;
        for step in 1..=600 {
            ticks += scheduler.drain_due(step).len();
        }
        assert_eq!(ticks, 10);
        assert!(scheduler.is_pending(&handle));
        scheduler.cancel(&handle);
        assert!(scheduler.drain_due(10_000).is_empty());
    }

    #[test]
    fn sequence_delays_are_relative() {
        let mut scheduler = Scheduler::new();
        scheduler.run_sequence(
            100,
            vec![
                SequenceStep::new(0, 1),
                SequenceStep::new(6, 2),
                SequenceStep::new(30, 3),
            ],
        );
        assert_eq!(scheduler.drain_due(100), vec![1]);
        assert!(scheduler.drain_due(105).is_empty());
        assert_eq!(scheduler.drain_due(106), vec![2]);
        assert!(scheduler.drain_due(135).is_empty());
        assert_eq!(scheduler.drain_due(136), vec![3]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn late_drain_yields_all_steps_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.run_sequence(0, vec![SequenceStep::new(1, 'a'), SequenceStep::new(1, 'b')]);
        scheduler.run_after(0, 1, 'c');
        assert_eq!(scheduler.drain_due(5), vec!['a', 'c', 'b']);
    }

    #[test]
    fn cancelled_sequence_stops_mid_way() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.run_sequence(0, vec![SequenceStep::new(0, 1), SequenceStep::new(6, 2)]);
        assert_eq!(scheduler.drain_due(0), vec![1]);
        // a clone of the token held elsewhere cancels the task
        handle.token().clone().cancel();
        assert!(scheduler.drain_due(6).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancel_all_cancels_outstanding_tokens() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.run_every(0, 1, ());
        let b = scheduler.run_after(0, 3, ());
        scheduler.cancel_all();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert!(scheduler.drain_due(10).is_empty());
    }
}
