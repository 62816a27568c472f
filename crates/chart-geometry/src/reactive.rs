// File: crates/chart-geometry/src/reactive.rs
// Summary: Event -> observer table driving synchronous recomputation of derived state.
// Notes:
// - Observers are plain functions over the state they recompute. Each returns the
//   events its own mutation raises, which are dispatched before control returns.
// - One outer mutation runs each observer at most once, however many times its
//   events are raised along the cascade.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

/// Events raised by chart mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    SeriesChanged,
    StacksChanged,
    HierarchyChanged,
    ViewChanged,
    ContainerResized,
}

/// Recompute step: mutates derived state and returns the events it raises.
pub type Action<S, E> = fn(&mut S) -> Vec<E>;

struct Observer<S, E> {
    name: &'static str,
    action: Action<S, E>,
}

/// What one dispatch did, in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport<E> {
    pub raised: Vec<E>,
    pub ran: Vec<&'static str>,
}

impl<E> Default for DispatchReport<E> {
    fn default() -> Self {
        Self { raised: Vec::new(), ran: Vec::new() }
    }
}

impl<E> DispatchReport<E> {
    pub fn ran(&self, observer: &str) -> bool {
        self.ran.iter().any(|name| *name == observer)
    }
    pub fn is_empty(&self) -> bool { self.ran.is_empty() && self.raised.is_empty() }
}

/// Assembles the observer table once; declaration order is dispatch order.
pub struct GraphBuilder<S, E> {
    observers: Vec<Observer<S, E>>,
    table: HashMap<E, Vec<usize>>,
}

impl<S, E: Copy + Eq + Hash + Debug> GraphBuilder<S, E> {
    pub fn new() -> Self {
        Self { observers: Vec::new(), table: HashMap::new() }
    }

    pub fn observe(mut self, name: &'static str, triggers: &[E], action: Action<S, E>) -> Self {
        let idx = self.observers.len();
        self.observers.push(Observer { name, action });
        for &t in triggers {
            let subs = self.table.entry(t).or_default();
            if !subs.contains(&idx) {
                subs.push(idx);
            }
        }
        self
    }

    pub fn build(self) -> RecomputeGraph<S, E> {
        RecomputeGraph { observers: self.observers, table: self.table }
    }
}

impl<S, E: Copy + Eq + Hash + Debug> Default for GraphBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RecomputeGraph<S, E = Trigger> {
    observers: Vec<Observer<S, E>>,
    table: HashMap<E, Vec<usize>>,
}

impl<S, E: Copy + Eq + Hash + Debug> RecomputeGraph<S, E> {
    /// Raise one event and run the whole cascade it causes.
    pub fn dispatch(&self, state: &mut S, event: E) -> DispatchReport<E> {
        self.dispatch_all(state, &[event])
    }

    /// Raise several events for a single mutation, sharing one fired set.
    pub fn dispatch_all(&self, state: &mut S, events: &[E]) -> DispatchReport<E> {
        let mut fired = vec![false; self.observers.len()];
        let mut report = DispatchReport::default();
        for &event in events {
            self.run(state, event, &mut fired, &mut report);
        }
        debug!("[reactive] {:?} -> ran {:?}", report.raised, report.ran);
        report
    }

    fn run(&self, state: &mut S, event: E, fired: &mut [bool], report: &mut DispatchReport<E>) {
        report.raised.push(event);
        let Some(subs) = self.table.get(&event) else { return };
        for &idx in subs {
            if fired[idx] {
                continue;
            }
            fired[idx] = true;
            let observer = &self.observers[idx];
            report.ran.push(observer.name);
            for next in (observer.action)(state) {
                self.run(state, next, fired, report);
            }
        }
    }

    /// Observer names subscribed to `event`, in dispatch order.
    pub fn subscribers(&self, event: E) -> Vec<&'static str> {
        self.table
            .get(&event)
            .map(|subs| subs.iter().map(|&i| self.observers[i].name).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize { self.observers.len() }
    pub fn is_empty(&self) -> bool { self.observers.is_empty() }
}
