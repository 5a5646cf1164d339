//! Resumable, budgeted driver around a [`SearchEngine`].

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};
use voxnav_core::BlockPos;

use crate::config::{PathRequest, SearchConfig};
use crate::engine::SearchEngine;
use crate::error::PathError;
use crate::status::{PathStatus, Waypoint};
use crate::traits::VoxelWorld;

/// A search handed off to a worker thread.
#[derive(Debug)]
struct Worker<W> {
    rx: Receiver<SearchEngine<W>>,
    handle: JoinHandle<()>,
}

/// One path search, from construction to a consumable list of waypoints.
///
/// A `Path` is driven either synchronously, a bounded number of expansions
/// per call ([`step`](Self::step), [`run_budgeted`](Self::run_budgeted),
/// [`advance`](Self::advance)), or once in the background
/// ([`start_background`](Self::start_background) then
/// [`poll_async`](Self::poll_async)).
///
/// Once found, waypoints are consumed from the source toward the
/// destination with [`next_point`](Self::next_point).
#[derive(Debug)]
pub struct Path<W> {
    engine: Option<SearchEngine<W>>,
    worker: Option<Worker<W>>,
    status: PathStatus,
    waypoints: Vec<Waypoint>,
    // Index from the source end of `waypoints`; 0 is the source itself.
    cursor: usize,
    expansions: u64,
    source: BlockPos,
    destination: BlockPos,
    request: PathRequest,
    config: SearchConfig,
}

impl<W: VoxelWorld> Path<W> {
    /// Create a search with the default [`SearchConfig`].
    pub fn new(world: Arc<W>, request: PathRequest) -> Self {
        Self::with_config(world, request, SearchConfig::default())
    }

    /// Create a search. Source and destination are the blocks containing
    /// the requested points.
    ///
    /// A solid source or destination yields a path that is already
    /// [`PathStatus::PathNotFound`].
    pub fn with_config(world: Arc<W>, request: PathRequest, config: SearchConfig) -> Self {
        let source = request.source();
        let destination = request.destination();
        let engine = SearchEngine::new(world, source, destination, config);
        let mut path = Self {
            engine: Some(engine),
            worker: None,
            status: PathStatus::Calculating,
            waypoints: Vec::new(),
            cursor: 0,
            expansions: 0,
            source,
            destination,
            request,
            config,
        };
        path.sync();
        path
    }

    /// Expand up to `max_calculations` cells, leaving the search
    /// `Calculating` if it has not finished by then.
    ///
    /// Use this to spread one search over many ticks.
    pub fn advance(&mut self, max_calculations: u32) -> PathStatus {
        let Some(engine) = self.engine.as_mut() else {
            return self.status;
        };
        drive(engine, max_calculations);
        self.sync();
        self.status
    }

    /// Expand up to `max_calculations` cells; running out of budget ends
    /// the search as [`PathStatus::PathNotFound`].
    pub fn run_budgeted(&mut self, max_calculations: u32) -> PathStatus {
        let Some(engine) = self.engine.as_mut() else {
            return self.status;
        };
        run_budgeted(engine, max_calculations);
        self.sync();
        self.status
    }

    /// One budgeted run sized by the request: `max_steps` times
    /// `calculations_per_step` expansions.
    pub fn step(&mut self) -> PathStatus {
        let budget = self.request.budget(&self.config);
        self.run_budgeted(budget)
    }
}

impl<W: VoxelWorld + Send + Sync + 'static> Path<W> {
    /// Create a search and immediately start it in the background.
    ///
    /// Rejected searches come back already finished and no thread is
    /// spawned for them. A failed spawn is logged and leaves the path
    /// `PathNotFound`.
    pub fn spawn(world: Arc<W>, request: PathRequest, config: SearchConfig) -> Self {
        let mut path = Self::with_config(world, request, config);
        if !path.status.is_terminal() {
            // The error has already been logged and folded into the status.
            let _ = path.start_background();
        }
        path
    }

    /// Hand the search to a worker thread that performs one
    /// [`step`](Self::step). Poll with [`poll_async`](Self::poll_async).
    pub fn start_background(&mut self) -> Result<(), PathError> {
        if self.worker.is_some() {
            return Err(PathError::AlreadyRunning);
        }
        if self.status.is_terminal() {
            return Err(PathError::NotCalculating(self.status));
        }
        let Some(mut engine) = self.engine.take() else {
            return Err(PathError::NotCalculating(self.status));
        };

        let budget = self.request.budget(&self.config);
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("voxnav-path".into())
            .spawn(move || {
                run_budgeted(&mut engine, budget);
                // The receiver is gone only if the path was leaked.
                let _ = tx.send(engine);
            });

        match spawned {
            Ok(handle) => {
                debug!("search {} -> {} moved to worker", self.source, self.destination);
                self.worker = Some(Worker { rx, handle });
                Ok(())
            }
            Err(e) => {
                error!(
                    "failed to start worker for search {} -> {}: {e}",
                    self.source, self.destination
                );
                self.status = PathStatus::PathNotFound;
                Err(PathError::Spawn(e))
            }
        }
    }
}

impl<W> Path<W> {
    /// Non-blocking check on a background search.
    ///
    /// Returns `Calculating` while the worker runs, otherwise the final
    /// status. Without a worker this is the same as [`status`](Self::status).
    pub fn poll_async(&mut self) -> PathStatus {
        let Some(worker) = self.worker.as_ref() else {
            return self.status;
        };
        match worker.rx.try_recv() {
            Ok(engine) => self.adopt(Ok(engine)),
            Err(TryRecvError::Empty) => PathStatus::Calculating,
            Err(TryRecvError::Disconnected) => self.adopt(Err(())),
        }
    }

    /// Block until a background search finishes.
    pub fn wait(&mut self) -> PathStatus {
        let Some(worker) = self.worker.as_ref() else {
            return self.status;
        };
        let received = worker.rx.recv().map_err(|_| ());
        self.adopt(received)
    }

    /// Join the worker and take its engine back.
    fn adopt(&mut self, received: Result<SearchEngine<W>, ()>) -> PathStatus {
        let Some(worker) = self.worker.take() else {
            return self.status;
        };
        if worker.handle.join().is_err() || received.is_err() {
            error!("worker for search {} -> {} panicked", self.source, self.destination);
            self.status = PathStatus::PathNotFound;
            return self.status;
        }
        self.engine = received.ok();
        self.sync();
        self.status
    }

    /// Pull status and results out of the engine, dropping it once done.
    fn sync(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        self.status = engine.status();
        self.expansions = engine.expansions();
        if self.status.is_terminal() {
            self.waypoints = engine.take_waypoints();
            self.cursor = 0;
            self.engine = None;
        }
    }

    /// Release every cached cell and the open list.
    ///
    /// Waits for a background worker first. A search torn down before it
    /// finished ends as `PathNotFound`. Calling this again does nothing.
    pub fn teardown(&mut self) {
        if self.worker.is_some() {
            self.wait();
        }
        if let Some(mut engine) = self.engine.take() {
            engine.release();
            if !engine.status().is_terminal() {
                debug!(
                    "search {} -> {} torn down while calculating",
                    self.source, self.destination
                );
                self.status = PathStatus::PathNotFound;
            }
        }
    }

    #[inline]
    pub fn status(&self) -> PathStatus {
        self.status
    }

    /// Whether a worker thread currently owns the search.
    #[inline]
    pub fn is_in_background(&self) -> bool {
        self.worker.is_some()
    }

    /// Waypoints of a found path: near-destination first, source last.
    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints, source included.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Advance the cursor one waypoint toward the destination and return it.
    ///
    /// The cursor starts on the source, so the first call returns the
    /// second waypoint. Returns `None` past the last waypoint or when no
    /// path was found.
    pub fn next_point(&mut self) -> Option<BlockPos> {
        if self.status != PathStatus::PathFound || self.cursor + 1 >= self.waypoints.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.waypoints[self.waypoints.len() - 1 - self.cursor].pos)
    }

    /// Whether the cursor is still on the source.
    #[inline]
    pub fn is_first_point(&self) -> bool {
        self.cursor == 0
    }

    /// Whether the cursor reached the waypoint next to the destination.
    #[inline]
    pub fn is_last_point(&self) -> bool {
        self.status == PathStatus::PathFound && self.cursor + 1 == self.waypoints.len()
    }

    #[inline]
    pub fn source(&self) -> BlockPos {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> BlockPos {
        self.destination
    }

    /// Cells expanded so far. Not updated while a worker owns the search.
    #[inline]
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Cells currently held by the search; zero once it has finished.
    #[inline]
    pub fn cached_cells(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.cached_cells())
    }

    #[inline]
    pub fn request(&self) -> &PathRequest {
        &self.request
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl<W> Drop for Path<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Call `advance_one` up to `budget` times. Returns whether the search
/// reached a terminal status.
fn drive<W: VoxelWorld>(engine: &mut SearchEngine<W>, budget: u32) -> bool {
    for _ in 0..budget {
        if engine.advance_one() {
            return true;
        }
    }
    engine.status().is_terminal()
}

fn run_budgeted<W: VoxelWorld>(engine: &mut SearchEngine<W>, budget: u32) {
    if !drive(engine, budget) {
        warn!(
            "search {} -> {} ran out of budget after {} expansions",
            engine.source(),
            engine.destination(),
            engine.expansions()
        );
        engine.finish(PathStatus::PathNotFound);
    }
}
