//! Local metric sampler feeding the strip chart: resident memory (KB),
//! CPU (%), and disk bytes read / written since the previous sample.

use std::time::Duration;
use strip_core::Sample;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};

const KIB: f64 = 1024.0;

/// What the sampler measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The whole machine.
    System,
    /// A single process by PID.
    Process(u32),
}

/// Polls `sysinfo` and turns each refresh into a [`Sample`].
pub struct Sampler {
    sys:    System,
    target: Target,
    /// Whether the watched process was present on the last refresh.
    alive:  bool,
}

impl Sampler {
    pub fn new(target: Target) -> Self {
        Self {
            sys: System::new(),
            target,
            alive: true,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Refresh and read one sample.  A process that has exited reads as all
    /// zeros.
    pub fn sample(&mut self) -> Sample {
        match self.target {
            Target::System  => self.system_sample(),
            Target::Process(pid) => self.process_sample(Pid::from_u32(pid)),
        }
    }

    fn system_sample(&mut self) -> Sample {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_usage();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);

        let (read, write) = self
            .sys
            .processes()
            .values()
            .map(|p| p.disk_usage())
            .fold((0u64, 0u64), |(r, w), d| {
                (r.saturating_add(d.read_bytes), w.saturating_add(d.written_bytes))
            });

        Sample {
            memory: self.sys.used_memory() as f64 / KIB,
            cpu:    f64::from(self.sys.global_cpu_usage()),
            read:   read as f64,
            write:  write as f64,
        }
    }

    fn process_sample(&mut self, pid: Pid) -> Sample {
        self.sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let Some(process) = self.sys.process(pid) else {
            if self.alive {
                warn!("Process {pid} is gone; sending zeros");
                self.alive = false;
            }
            return Sample::ZERO;
        };
        if !self.alive {
            info!("Process {pid} is back");
            self.alive = true;
        }

        let disk = process.disk_usage();
        Sample {
            memory: process.memory() as f64 / KIB,
            cpu:    f64::from(process.cpu_usage()),
            read:   disk.read_bytes as f64,
            write:  disk.written_bytes as f64,
        }
    }
}

/// Spawn a background Tokio task that samples `target` every `interval` and
/// forwards each [`Sample`] through the returned channel.
///
/// Refreshes run on the blocking pool so a slow `/proc` walk never stalls
/// the runtime.  The task stops automatically when the receiver is dropped.
pub fn spawn_monitor(interval: Duration, target: Target) -> mpsc::Receiver<Sample> {
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut sampler = Sampler::new(target);
        let mut ticker  = time::interval(interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let (returned, sample) = match tokio::task::spawn_blocking(move || {
                let sample = sampler.sample();
                (sampler, sample)
            })
            .await
            {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Sampler task failed: {e}");
                    break;
                }
            };
            sampler = returned;

            if tx.send(sample).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}
