// Thread-safe navigator handle.
//
// `SharedNavigator` is a cheap-to-clone handle around one
// `LatticeNavigator`. Every query mutates per-node search state, so queries
// are serialized on a single `Mutex`: a query holds the lock for the whole
// reset → relax → extract sequence, and walkability changes block on the
// same lock, so they never land in the middle of a run.
//
// Reloads are treated differently. A reload invalidates every `NodeId` a
// concurrent caller may be holding, so instead of queueing behind a query it
// is rejected with `ReloadDuringQuery` while any query is in flight. The
// in-flight count is an `AtomicUsize` incremented before a query waits for
// the lock and decremented when it finishes (including on panic, via
// `InFlight`'s `Drop`).
//
// A reload that passes the in-flight check can still race a query that
// starts right after it; the lock then orders the two, so neither observes a
// half-built lattice.
//
// A query that panics poisons the lock. Every later operation reports
// `LockPoisoned` rather than touching possibly inconsistent search state.
//
// See also: `navigator.rs` for the single-owner API this wraps.

use crate::command::NavCommand;
use crate::error::{NavError, NavResult};
use crate::event::NavEvent;
use crate::navigator::LatticeNavigator;
use crate::path::PathResult;
use crate::types::{LatticeCoord, NodeId, Vec3};
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Debug)]
pub struct SharedNavigator {
    inner: Arc<Mutex<LatticeNavigator>>,
    in_flight: Arc<AtomicUsize>,
}

/// Marks one query as in flight for as long as it lives.
#[derive(Debug)]
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Exclusive query access to the navigator. Reloads through any handle are
/// rejected until this is dropped.
#[derive(Debug)]
pub struct QueryGuard<'a> {
    // Unlock before clearing the in-flight mark.
    navigator: MutexGuard<'a, LatticeNavigator>,
    _mark: InFlight<'a>,
}

impl QueryGuard<'_> {
    pub fn find_path(&mut self, origin: Vec3, target: Vec3) -> NavResult<PathResult> {
        self.navigator.find_path(origin, target)
    }

    pub fn find_path_between(&mut self, start: NodeId, target: NodeId) -> NavResult<PathResult> {
        self.navigator.find_path_between(start, target)
    }
}

impl Deref for QueryGuard<'_> {
    type Target = LatticeNavigator;

    fn deref(&self) -> &LatticeNavigator {
        &self.navigator
    }
}

impl SharedNavigator {
    pub fn new(navigator: LatticeNavigator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(navigator)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn lock(&self) -> NavResult<MutexGuard<'_, LatticeNavigator>> {
        self.inner.lock().map_err(|_| NavError::LockPoisoned)
    }

    /// Take the lock for one or more queries run as a unit.
    pub fn begin_query(&self) -> NavResult<QueryGuard<'_>> {
        let mark = InFlight::enter(&self.in_flight);
        let navigator = self.lock()?;
        Ok(QueryGuard {
            navigator,
            _mark: mark,
        })
    }

    pub fn find_path(&self, origin: Vec3, target: Vec3) -> NavResult<PathResult> {
        self.begin_query()?.find_path(origin, target)
    }

    pub fn find_path_between(&self, start: NodeId, target: NodeId) -> NavResult<PathResult> {
        self.begin_query()?.find_path_between(start, target)
    }

    /// Rebuild the lattice, unless a query is in flight.
    pub fn reload_grid(&self) -> NavResult<()> {
        let in_flight = self.in_flight.load(Ordering::SeqCst);
        if in_flight > 0 {
            log::warn!("rejected grid reload: {in_flight} queries in flight");
            return Err(NavError::ReloadDuringQuery);
        }
        self.lock()?.reload_grid()
    }

    pub fn set_walkable(&self, node: NodeId, walkable: bool) -> NavResult<bool> {
        self.lock()?.set_walkable(node, walkable)
    }

    pub fn set_walkable_at(&self, coord: LatticeCoord, walkable: bool) -> NavResult<bool> {
        self.lock()?.set_walkable_at(coord, walkable)
    }

    pub fn set_node_bounds(&self, size: Vec3, scale: Vec3) -> NavResult<()> {
        self.lock()?.set_node_bounds(size, scale);
        Ok(())
    }

    /// Apply a command. `ReloadGrid` goes through the same in-flight check as
    /// `reload_grid()`.
    pub fn apply_command(&self, command: &NavCommand) -> NavResult<()> {
        if *command == NavCommand::ReloadGrid {
            return self.reload_grid();
        }
        self.lock()?.apply_command(command)
    }

    pub fn drain_events(&self) -> NavResult<Vec<NavEvent>> {
        Ok(self.lock()?.drain_events())
    }

    /// Run `f` with read access to the navigator.
    pub fn with<R>(&self, f: impl FnOnce(&LatticeNavigator) -> R) -> NavResult<R> {
        Ok(f(&*self.lock()?))
    }

    pub fn queries_in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, NavConfig};
    use std::thread;

    fn shared(depth: u32, width: u32, height: u32) -> SharedNavigator {
        let config = NavConfig {
            grid: GridConfig::new(depth, width, height, 1.0, Vec3::ZERO),
            ..NavConfig::default()
        };
        SharedNavigator::new(LatticeNavigator::new(config).unwrap())
    }

    #[test]
    fn reload_is_rejected_while_query_in_flight() {
        let nav = shared(3, 3, 3);
        let other = nav.clone();
        {
            let mut guard = nav.begin_query().unwrap();
            assert_eq!(other.queries_in_flight(), 1);
            assert!(matches!(
                other.reload_grid(),
                Err(NavError::ReloadDuringQuery)
            ));
            assert!(matches!(
                other.apply_command(&NavCommand::ReloadGrid),
                Err(NavError::ReloadDuringQuery)
            ));
            // The guard is still usable after the rejected reload.
            let path = guard.find_path(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0)).unwrap();
            assert_eq!(path.length(), 6.0);
            assert_eq!(guard.node_count(), 27);
        }
        assert_eq!(other.queries_in_flight(), 0);
        other.reload_grid().unwrap();

        let events = nav.drain_events().unwrap();
        assert_eq!(
            events,
            vec![
                NavEvent::GridBuilt { node_count: 27 },
                NavEvent::GridDestroyed { node_count: 27 },
                NavEvent::GridBuilt { node_count: 27 },
            ]
        );
    }

    #[test]
    fn concurrent_queries_and_walkability_changes() {
        let nav = shared(4, 4, 4);
        let target = Vec3::new(3.0, 3.0, 3.0);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let nav = nav.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        let path = nav.find_path(Vec3::ZERO, target).unwrap();
                        // Whatever the walkability at the time, the route
                        // is minimal on a lattice with one blocked cell.
                        assert_eq!(path.length(), 9.0);
                    }
                })
            })
            .collect();

        let blocker = LatticeCoord::new(1, 1, 1);
        for i in 0..50 {
            nav.set_walkable_at(blocker, i % 2 == 0).unwrap();
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(nav.queries_in_flight(), 0);
    }

    #[test]
    fn panicking_query_poisons_the_lock() {
        let nav = shared(2, 2, 2);
        let other = nav.clone();
        let result = thread::spawn(move || {
            let _guard = other.begin_query().unwrap();
            panic!("query failed mid-run");
        })
        .join();
        assert!(result.is_err());

        assert_eq!(nav.queries_in_flight(), 0);
        assert!(matches!(
            nav.find_path(Vec3::ZERO, Vec3::ONE),
            Err(NavError::LockPoisoned)
        ));
        assert!(matches!(nav.reload_grid(), Err(NavError::LockPoisoned)));
        assert_eq!(nav.queries_in_flight(), 0);
    }

    #[test]
    fn with_gives_read_access() {
        let nav = shared(2, 3, 4);
        assert_eq!(nav.with(|n| n.node_count()).unwrap(), 24);
        nav.set_walkable(NodeId(0), false).unwrap();
        assert_eq!(nav.with(|n| n.walkable_count()).unwrap(), 23);
    }
}
