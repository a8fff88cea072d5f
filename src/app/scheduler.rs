use std::future::Future;
use std::io;
use std::time::Duration;

use log::{error, info};
use tokio::time::{interval, MissedTickBehavior};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::RemoteFetcher;

use super::cycle::{run_cycle, CycleOutcome};

/// Run update cycles every `period` until Ctrl-C.
pub async fn run_scheduled(
    fetcher: &RemoteFetcher,
    config: &Config,
    requested: &[String],
    period: Duration,
) -> Result<()> {
    run_until(fetcher, config, requested, period, tokio::signal::ctrl_c()).await
}

/// Run update cycles every `period` until `shutdown` resolves.
///
/// Cycles run one after another on this task, so two never touch the store at once. A failed
/// cycle is logged and the next tick proceeds as usual. `shutdown` is polled for the whole
/// run, including while a cycle is in flight; an interrupted cycle is dropped before its write.
pub async fn run_until<F>(
    fetcher: &RemoteFetcher,
    config: &Config,
    requested: &[String],
    period: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(
        "Updating {} every {}s",
        config.quotes_file.display(),
        period.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            signal = &mut shutdown => return stopped(signal),
        }
        tokio::select! {
            _ = run_logged(fetcher, config, requested) => {}
            signal = &mut shutdown => return stopped(signal),
        }
    }
}

fn stopped(signal: io::Result<()>) -> Result<()> {
    signal?;
    info!("Interrupted, stopping scheduler");
    Ok(())
}

/// Run one cycle and report the result through the log instead of the caller.
pub async fn run_logged(fetcher: &RemoteFetcher, config: &Config, requested: &[String]) -> bool {
    match run_cycle(fetcher, config, requested).await {
        Ok(CycleOutcome::Updated { .. }) => true,
        Ok(CycleOutcome::NoTickers) => false,
        Err(err) => {
            error!("Update cycle failed: {err}");
            false
        }
    }
}
