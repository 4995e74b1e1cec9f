//! Turns a found route into timed move steps and plays them back on a worker thread.
//!
//! Playback emits one [PlaybackEvent::Arrived] per step on a fixed cadence, followed by exactly
//! one terminal event: [PlaybackEvent::Finished] or [PlaybackEvent::Cancelled]. A step is either
//! emitted completely or not at all.

use itertools::Itertools;
use log::{debug, info, warn};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::PlaybackConfig;
use crate::error::{Result, RouteError};
use crate::solver::Route;
use crate::tile::Tile;
use crate::topology::step_cost;

/// Row/column displacement of a single move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vector {
    pub dx: i32,
    pub dy: i32,
}

impl Vector {
    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

/// One move of the agent: the displacement, the tile it ends on and its weight (the step cost).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveStep {
    pub vector: Vector,
    pub target: Tile,
    pub cost: i32,
}

/// Converts consecutive route tiles into move steps.
pub fn build_steps(route: &Route) -> Result<Vec<MoveStep>> {
    if route.len() < 2 {
        return Err(RouteError::EmptyRoute);
    }
    Ok(route
        .tiles
        .iter()
        .tuple_windows()
        .map(|(from, to)| MoveStep {
            vector: Vector {
                dx: to.x - from.x,
                dy: to.y - from.y,
            },
            target: *to,
            cost: step_cost(from.point(), to.point()),
        })
        .collect())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The agent completed step `index` and now stands on `tile`.
    Arrived {
        index: usize,
        tile: Tile,
    },
    Finished,
    Cancelled,
}

#[derive(Debug, Default)]
struct Control {
    paused: bool,
    cancelled: bool,
}

#[derive(Debug, Default)]
struct Playback {
    control: Mutex<Control>,
    wake: Condvar,
    done: AtomicBool,
}

impl Playback {
    fn run(&self, steps: Vec<MoveStep>, step_duration: Duration, events: Sender<PlaybackEvent>) {
        debug!("Playback of {} steps started", steps.len());
        let total = steps.len();
        let mut outcome = PlaybackEvent::Finished;
        for (index, step) in steps.into_iter().enumerate() {
            if !self.wait(step_duration) {
                outcome = PlaybackEvent::Cancelled;
                break;
            }
            let arrived = PlaybackEvent::Arrived {
                index,
                tile: step.target,
            };
            if events.send(arrived).is_err() {
                debug!("Playback receiver dropped after {} steps", index);
                outcome = PlaybackEvent::Cancelled;
                break;
            }
        }
        self.done.store(true, Ordering::Release);
        match outcome {
            PlaybackEvent::Finished => info!("Playback of {} steps finished", total),
            _ => info!("Playback cancelled"),
        }
        // The receiver may already be gone; there is nobody left to tell
        let _ = events.send(outcome);
    }

    /// Sleeps for one step, stretched by any time spent paused. Returns false once cancelled.
    fn wait(&self, duration: Duration) -> bool {
        let mut remaining = duration;
        let mut control = self.control.lock();
        loop {
            if control.cancelled {
                return false;
            }
            if control.paused {
                self.wake.wait(&mut control);
                continue;
            }
            if remaining.is_zero() {
                return true;
            }
            let started = Instant::now();
            self.wake.wait_for(&mut control, remaining);
            remaining = remaining.saturating_sub(started.elapsed());
        }
    }

    fn update<F: FnOnce(&mut Control)>(&self, f: F) {
        f(&mut self.control.lock());
        self.wake.notify_all();
    }
}

/// Plays move steps one at a time. Only one playback may be active at once.
#[derive(Debug)]
pub struct Choreographer {
    step_duration: Duration,
    current: Option<(Arc<Playback>, JoinHandle<()>)>,
}

impl Default for Choreographer {
    fn default() -> Self {
        Choreographer::new(&PlaybackConfig::default())
    }
}

impl Choreographer {
    pub fn new(config: &PlaybackConfig) -> Choreographer {
        Choreographer::with_step_duration(config.step_duration())
    }

    pub fn with_step_duration(step_duration: Duration) -> Choreographer {
        Choreographer {
            step_duration,
            current: None,
        }
    }

    pub fn step_duration(&self) -> Duration {
        self.step_duration
    }

    pub fn is_playing(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(playback, _)| !playback.done.load(Ordering::Acquire))
    }

    pub fn is_paused(&self) -> bool {
        self.is_playing()
            && self
                .current
                .as_ref()
                .is_some_and(|(playback, _)| playback.control.lock().paused)
    }

    /// Starts playing `steps` on a worker thread and returns the event stream. Fails with
    /// [RouteError::AlreadyPlaying] while a previous playback is still running, leaving it
    /// untouched.
    pub fn play(&mut self, steps: Vec<MoveStep>) -> Result<Receiver<PlaybackEvent>> {
        if self.is_playing() {
            return Err(RouteError::AlreadyPlaying);
        }
        if steps.is_empty() {
            return Err(RouteError::EmptyRoute);
        }
        self.wait();

        let playback = Arc::new(Playback::default());
        let worker = Arc::clone(&playback);
        let step_duration = self.step_duration;
        let (events_tx, events_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("choreographer".into())
            .spawn(move || worker.run(steps, step_duration, events_tx))
            .map_err(|e| RouteError::Playback(e.to_string()))?;
        self.current = Some((playback, handle));
        Ok(events_rx)
    }

    /// Stops emitting further steps. Tiles already reported stay visited. Returns whether a
    /// playback was running.
    pub fn cancel(&self) -> bool {
        self.control(|c| c.cancelled = true)
    }

    /// Suspends the cadence without losing the current position.
    pub fn pause(&self) -> bool {
        self.control(|c| c.paused = true)
    }

    pub fn resume(&self) -> bool {
        self.control(|c| c.paused = false)
    }

    fn control<F: FnOnce(&mut Control)>(&self, f: F) -> bool {
        match &self.current {
            Some((playback, _)) if self.is_playing() => {
                playback.update(f);
                true
            }
            _ => false,
        }
    }

    /// Blocks until the current playback, if any, has ended.
    pub fn wait(&mut self) {
        if let Some((_, handle)) = self.current.take() {
            if handle.join().is_err() {
                warn!("Playback worker panicked");
            }
        }
    }
}

impl Drop for Choreographer {
    fn drop(&mut self) {
        self.cancel();
        self.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileKind;

    fn route(points: &[(i32, i32)]) -> Route {
        let tiles = points
            .iter()
            .map(|&(x, y)| Tile::new(x, y, TileKind::Empty))
            .collect::<Vec<_>>();
        let cost = tiles
            .iter()
            .tuple_windows()
            .map(|(a, b)| step_cost(a.point(), b.point()))
            .sum();
        Route { tiles, cost }
    }

    fn arrivals(events: &[PlaybackEvent]) -> Vec<(usize, i32, i32)> {
        events
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::Arrived { index, tile } => Some((*index, tile.x, tile.y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn steps_from_route() {
        let steps = build_steps(&route(&[(0, 0), (1, 1), (1, 2), (0, 2)])).unwrap();
        let vectors = steps
            .iter()
            .map(|s| (s.vector.dx, s.vector.dy, s.cost))
            .collect::<Vec<_>>();
        assert_eq!(vectors, vec![(1, 1, 14), (0, 1, 10), (-1, 0, 10)]);
        assert_eq!(steps[2].target, Tile::new(0, 2, TileKind::Empty));
        assert!(steps[0].vector.is_diagonal());
    }

    #[test]
    fn single_tile_route_is_empty() {
        assert_eq!(build_steps(&route(&[(3, 3)])), Err(RouteError::EmptyRoute));
        assert_eq!(build_steps(&route(&[])), Err(RouteError::EmptyRoute));
    }

    #[test]
    fn plays_every_step_then_finishes() {
        let mut choreographer = Choreographer::with_step_duration(Duration::from_millis(1));
        let steps = build_steps(&route(&[(0, 0), (0, 1), (1, 2)])).unwrap();
        let events = choreographer
            .play(steps)
            .unwrap()
            .iter()
            .collect::<Vec<_>>();
        assert_eq!(arrivals(&events), vec![(0, 0, 1), (1, 1, 2)]);
        assert_eq!(events.last(), Some(&PlaybackEvent::Finished));
        assert!(!choreographer.is_playing());

        // a finished playback makes room for the next one
        let steps = build_steps(&route(&[(1, 2), (1, 3)])).unwrap();
        let events = choreographer
            .play(steps)
            .unwrap()
            .iter()
            .collect::<Vec<_>>();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn second_play_is_rejected() {
        let mut choreographer = Choreographer::with_step_duration(Duration::from_millis(20));
        let steps = build_steps(&route(&[(0, 0), (0, 1), (0, 2), (0, 3)])).unwrap();
        let first = choreographer.play(steps.clone()).unwrap();
        assert!(choreographer.is_playing());
        assert_eq!(
            choreographer.play(steps).unwrap_err(),
            RouteError::AlreadyPlaying
        );
        let events = first.iter().collect::<Vec<_>>();
        assert_eq!(arrivals(&events), vec![(0, 0, 1), (1, 0, 2), (2, 0, 3)]);
        assert_eq!(events.last(), Some(&PlaybackEvent::Finished));
    }

    #[test]
    fn empty_step_list_is_rejected() {
        let mut choreographer = Choreographer::default();
        assert_eq!(
            choreographer.play(Vec::new()).unwrap_err(),
            RouteError::EmptyRoute
        );
        assert!(!choreographer.is_playing());
    }

    #[test]
    fn cancel_stops_emission() {
        let mut choreographer = Choreographer::with_step_duration(Duration::from_millis(50));
        let points = (0..6).map(|y| (0, y)).collect::<Vec<_>>();
        let steps = build_steps(&route(&points)).unwrap();
        let events = choreographer.play(steps).unwrap();
        let first = events.recv().unwrap();
        assert_eq!(
            first,
            PlaybackEvent::Arrived {
                index: 0,
                tile: Tile::new(0, 1, TileKind::Empty),
            }
        );
        assert!(choreographer.cancel());
        let rest = events.iter().collect::<Vec<_>>();
        assert_eq!(rest.last(), Some(&PlaybackEvent::Cancelled));
        assert!(arrivals(&rest).len() < 4);
        choreographer.wait();
        assert!(!choreographer.is_playing());
        assert!(!choreographer.cancel());
    }

    #[test]
    fn pause_keeps_position() {
        let mut choreographer = Choreographer::with_step_duration(Duration::from_millis(30));
        let steps = build_steps(&route(&[(5, 5), (6, 6), (7, 7)])).unwrap();
        let events = choreographer.play(steps).unwrap();
        assert!(choreographer.pause());
        assert!(choreographer.is_paused());
        thread::sleep(Duration::from_millis(120));
        assert!(events.try_recv().is_err());
        assert!(choreographer.resume());
        let events = events.iter().collect::<Vec<_>>();
        assert_eq!(arrivals(&events), vec![(0, 6, 6), (1, 7, 7)]);
        assert_eq!(events.last(), Some(&PlaybackEvent::Finished));
    }
}
