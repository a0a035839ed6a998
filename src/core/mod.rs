//=========================================================================
// Simulation Core
//
// Rule subsystems plus the loop that drives them on a logic thread.
//
// Subsystems:
// - models:    typed singleton store shared by every rule
// - scheduler: deferred, pooled, time-ordered event execution
// - gameplay:  the event catalog (collision, hurt, death, score, ...)
// - actors:    actor roster and the collaborator capability traits
// - jump:      per-player jump state machine
// - signals:   messages collaborators send into the core
//
// Notes:
// The core itself is single-threaded. `SimulationLoop` moves a whole
// `Simulation` onto one thread and feeds it through a bounded channel, so
// nothing inside needs locking.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod actors;
pub mod gameplay;
pub mod jump;
pub mod models;
pub mod scheduler;
pub mod signals;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::engine::Simulation;
use signals::WorldSignal;

//=== TickControl =========================================================
//
// Control flow for the driving loop: keep ticking or stop after this frame.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== SignalCollector =====================================================
//
// Gathers the signals that arrived during one frame.
//
// Waits up to one frame for the first signal, then drains whatever else is
// queued (bounded, so a flood cannot starve the tick). Signals that
// arrived before a Shutdown in the same frame are kept.
//
pub(crate) struct SignalCollector {
    receiver: Receiver<WorldSignal>,
    signals: Vec<WorldSignal>,
}

impl SignalCollector {
    const MAX_SIGNALS_PER_FRAME: usize = 256;

    pub(crate) fn new(receiver: Receiver<WorldSignal>) -> Self {
        Self {
            receiver,
            signals: Vec::with_capacity(16),
        }
    }

    pub(crate) fn collect_frame(&mut self, wait: Duration) -> TickControl {
        self.signals.clear();

        //--- Wait for at least one signal this frame ----------------------
        match self.receiver.recv_timeout(wait) {
            Ok(signal) => {
                if self.accept(signal) == TickControl::Exit {
                    return TickControl::Exit;
                }
            }
            Err(RecvTimeoutError::Disconnected) => return TickControl::Exit,
            Err(RecvTimeoutError::Timeout) => return TickControl::Continue,
        }

        //--- Drain the rest of the backlog --------------------------------
        let mut drained = 1;
        while drained < Self::MAX_SIGNALS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(signal) => {
                    if self.accept(signal) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_SIGNALS_PER_FRAME {
            warn!("Signal backlog: drained {} signals this frame", drained);
        }

        TickControl::Continue
    }

    /// Signals collected by the last [`SignalCollector::collect_frame`].
    pub(crate) fn signals(&self) -> &[WorldSignal] {
        &self.signals
    }

    fn accept(&mut self, signal: WorldSignal) -> TickControl {
        if signal.is_shutdown() {
            return TickControl::Exit;
        }
        self.signals.push(signal);
        TickControl::Continue
    }
}

//=== SimulationLoop ======================================================
//
// Owns a simulation on a background thread and ticks it at a fixed rate.
//
// Each frame:
//  1. Collects signals from collaborators
//  2. Applies them to the simulation
//  3. Ticks one frame of simulation time
//  4. Sleeps out the rest of the frame, or exits on shutdown/disconnect
//
// The thread hands the simulation back through its join handle.
//
pub(crate) struct SimulationLoop {
    collector: SignalCollector,
    frame: Duration,
}

impl SimulationLoop {
    pub(crate) fn new(receiver: Receiver<WorldSignal>, frame: Duration) -> Self {
        Self {
            collector: SignalCollector::new(receiver),
            frame,
        }
    }

    pub(crate) fn spawn(self, mut simulation: Simulation) -> thread::JoinHandle<Simulation> {
        let Self {
            mut collector,
            frame,
        } = self;

        thread::spawn(move || {
            info!("Simulation thread started (frame: {:?})", frame);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather signals ------------------------------
                let control = collector.collect_frame(frame);

                //--- Step 2: Apply and tick ------------------------------
                for signal in collector.signals() {
                    simulation.apply(*signal);
                }
                simulation.tick(frame);

                if control == TickControl::Exit {
                    info!("Simulation thread exiting at {:?}", simulation.now());
                    break;
                }

                //--- Step 3: Maintain pacing -----------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame {
                    thread::sleep(frame - elapsed);
                }
            }

            simulation
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
