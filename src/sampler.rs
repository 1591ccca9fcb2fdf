// Background sampler: one task per session that reads utilization, converts it to watts and
// records it until told to stop. The task owns its buffer and hands it back on join, so
// nothing can be appended once `stop` has returned.

use crate::config::{EcoConfig, SamplingConfig};
use crate::error::EcoError;
use crate::metrics_source::MetricsSource;
use crate::models::{Sample, SampleLog, SessionState};
use crate::power_model::PowerModel;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::Instrument;

/// What the sampling task hands back when it exits.
struct LoopOutcome {
    samples: Vec<Sample>,
    skipped: u32,
    /// Set when the loop gave up after too many consecutive failed reads.
    fatal: Option<EcoError>,
}

struct RunningTask {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<LoopOutcome>,
}

/// Drives periodic sampling for the lifetime of one monitored operation.
pub struct Sampler<S: MetricsSource> {
    source: Arc<S>,
    model: PowerModel,
    config: SamplingConfig,
    state: SessionState,
    task: Option<RunningTask>,
    samples_collected: Arc<AtomicUsize>,
}

impl<S: MetricsSource> Sampler<S> {
    pub fn new(source: S, config: &EcoConfig) -> Self {
        Self {
            source: Arc::new(source),
            model: PowerModel::new(config.power),
            config: config.sampling.clone(),
            state: SessionState::Idle,
            task: None,
            samples_collected: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Samples recorded so far; progress only, the log itself is returned by [`Sampler::stop`].
    pub fn samples_collected(&self) -> usize {
        self.samples_collected.load(Ordering::Relaxed)
    }

    /// Spawns the sampling task. Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> Result<(), EcoError> {
        if self.state != SessionState::Idle {
            return Err(EcoError::InvalidStateTransition {
                action: "start",
                state: self.state,
            });
        }
        let period = sampling_period(self.config.sampling_period_seconds)?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = spawn_loop(
            self.source.clone(),
            self.model,
            period,
            self.config.max_consecutive_failures,
            self.samples_collected.clone(),
            shutdown_rx,
        );
        self.task = Some(RunningTask {
            shutdown_tx,
            handle,
        });
        self.state = SessionState::Running;
        tracing::debug!(
            period_secs = self.config.sampling_period_seconds,
            "sampler started"
        );
        Ok(())
    }

    /// Signals the task and waits for it to exit, then returns the finished log.
    ///
    /// Waits at most one sampling period plus one metrics read. The session is `Stopped`
    /// afterwards even when the task failed.
    pub async fn stop(&mut self) -> Result<SampleLog, EcoError> {
        let task = match (self.state, self.task.take()) {
            (SessionState::Running, Some(task)) => task,
            (state, task) => {
                self.task = task;
                return Err(EcoError::InvalidStateTransition {
                    action: "stop",
                    state,
                });
            }
        };
        self.state = SessionState::Stopped;

        // The task may already have exited on its own; a closed channel is fine.
        let _ = task.shutdown_tx.send(());
        let outcome = task
            .handle
            .await
            .map_err(|e| EcoError::TaskFailed(format!("sampler task join: {}", e)))?;

        if outcome.skipped > 0 {
            tracing::warn!(
                skipped = outcome.skipped,
                collected = outcome.samples.len(),
                "some metric reads failed and were skipped"
            );
        }
        if let Some(e) = outcome.fatal {
            return Err(e);
        }
        tracing::debug!(samples = outcome.samples.len(), "sampler stopped");

        Ok(SampleLog {
            samples: outcome.samples,
            sampling_period_seconds: self.config.sampling_period_seconds,
            skipped_samples: outcome.skipped,
        })
    }
}

fn spawn_loop<S: MetricsSource>(
    source: Arc<S>,
    model: PowerModel,
    period: Duration,
    max_failures: u32,
    samples_collected: Arc<AtomicUsize>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> JoinHandle<LoopOutcome> {
    let sampler_span = tracing::span!(
        tracing::Level::DEBUG,
        "sampler",
        period_ms = period.as_millis() as u64
    );

    let sampling = async move {
        // Ticks are anchored to the schedule, so time spent inside `sample` is part of the period.
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut samples = Vec::new();
        let mut skipped: u32 = 0;
        let mut consecutive_failures: u32 = 0;

        loop {
            tokio::select! {
                biased;
                // Sender dropped also ends the loop (sampler dropped while running).
                _ = &mut shutdown_rx => {
                    tracing::debug!("sampler shutting down");
                    break;
                }
                _ = tick.tick() => {
                    let utilization = match source.sample().await {
                        Ok(u) => {
                            consecutive_failures = 0;
                            u
                        }
                        Err(e) => {
                            skipped += 1;
                            consecutive_failures += 1;
                            tracing::warn!(
                                error = %e,
                                consecutive_failures,
                                operation = "sample",
                                "metrics read failed; skipping sample"
                            );
                            if consecutive_failures >= max_failures {
                                tracing::error!(
                                    error = %e,
                                    consecutive_failures,
                                    "too many consecutive metric failures; ending session"
                                );
                                return LoopOutcome {
                                    samples,
                                    skipped,
                                    fatal: Some(e),
                                };
                            }
                            continue;
                        }
                    };

                    samples.push(Sample {
                        timestamp: unix_seconds(),
                        watts: model
                            .estimate_watts(utilization.cpu_percent, utilization.mem_percent),
                        cpu_percent: utilization.cpu_percent,
                        mem_percent: utilization.mem_percent,
                    });
                    samples_collected.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        LoopOutcome {
            samples,
            skipped,
            fatal: None,
        }
    };

    tokio::spawn(sampling.instrument(sampler_span))
}

/// Rejects zero, negative, non-finite and overflowing periods. Configs built in code never
/// pass through `EcoConfig::validate`.
fn sampling_period(seconds: f64) -> Result<Duration, EcoError> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(EcoError::InvalidConfig(format!(
            "sampling.sampling_period_seconds must be > 0, got {}",
            seconds
        ))),
    }
}

fn unix_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation = "get_timestamp",
                "system time error"
            );
            0.0
        })
}
