// Wraps a unit of work in a monitoring session: start, run, stop, calculate.

use crate::error::EcoError;
use crate::footprint::FootprintCalculator;
use crate::metrics_source::MetricsSource;
use crate::models::FootprintReport;
use crate::sampler::Sampler;
use std::future::Future;
use tracing::{Instrument, info_span};

/// Output of the tracked work alongside its footprint.
///
/// `report` is an error when the session produced no usable data (e.g. the work finished
/// before the first sample, or the metrics source kept failing); the work's output is kept
/// either way.
#[derive(Debug)]
pub struct Tracked<T> {
    pub output: T,
    pub report: Result<FootprintReport, EcoError>,
}

/// Monitors `work` from start to finish.
///
/// Fails before running `work` only when the sampler cannot be started.
pub async fn track<S, Fut, T>(
    label: &str,
    sampler: &mut Sampler<S>,
    calculator: &FootprintCalculator,
    work: Fut,
) -> Result<Tracked<T>, EcoError>
where
    S: MetricsSource,
    Fut: Future<Output = T>,
{
    let span = info_span!("track", label = %label);
    async move {
        sampler.start()?;
        tracing::info!("monitoring started");
        let output = work.await;
        let report = sampler
            .stop()
            .await
            .and_then(|log| calculator.calculate(&log));
        match &report {
            Ok(r) => tracing::info!(
                duration_secs = r.duration_seconds,
                average_watts = r.average_watts,
                co2_grams = r.co2_grams,
                "monitoring finished"
            ),
            Err(e) => tracing::warn!(error = %e, "no footprint report"),
        }
        Ok::<_, EcoError>(Tracked { output, report })
    }
    .instrument(span)
    .await
}

/// Like [`track`], for a synchronous closure; it runs on Tokio's blocking pool so the
/// sampler keeps ticking. A panic in `work` is resumed after the session is stopped.
pub async fn track_blocking<S, F, T>(
    label: &str,
    sampler: &mut Sampler<S>,
    calculator: &FootprintCalculator,
    work: F,
) -> Result<Tracked<T>, EcoError>
where
    S: MetricsSource,
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let work = async move { tokio::task::spawn_blocking(work).await };
    let tracked = track(label, sampler, calculator, work).await?;
    match tracked.output {
        Ok(output) => Ok(Tracked {
            output,
            report: tracked.report,
        }),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(EcoError::TaskFailed(format!("blocking work join: {}", e))),
    }
}
