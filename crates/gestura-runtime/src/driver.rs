//! Async driver - samples a pose source on a fixed cadence
//!
//! Ticks and control commands share one task, so a `Stop` is always applied
//! between two classifications and never during one.

use std::time::Duration;

use gestura_core::{GesturaResult, HandFrame};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::TranslatorConfig;
use crate::sink::{SignDisplay, Speaker};
use crate::translator::Translator;

/// Produces hand frames for the driver.
///
/// `Ok(None)` means the source is exhausted. A frame with no hands means
/// nothing was tracked this tick.
#[allow(async_fn_in_trait)]
pub trait PoseSource {
    async fn next_frame(&mut self) -> GesturaResult<Option<HandFrame>>;
}

/// Control commands accepted between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    ClearHistory,
    Shutdown,
}

/// Why [`Driver::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Shutdown,
    SourceExhausted,
}

pub struct Driver<S, D> {
    translator: Translator<S, D>,
    interval: Duration,
    max_source_failures: u32,
}

impl<S: Speaker, D: SignDisplay> Driver<S, D> {
    pub fn new(config: &TranslatorConfig, speaker: S, display: D) -> Self {
        Self::with_translator(
            Translator::new(config, speaker, display),
            config.sample_interval,
            config.max_source_failures,
        )
    }

    pub fn with_translator(
        translator: Translator<S, D>,
        interval: Duration,
        max_source_failures: u32,
    ) -> Self {
        Driver {
            translator,
            interval,
            max_source_failures: max_source_failures.max(1),
        }
    }

    /// Run until shutdown, source exhaustion, or too many consecutive
    /// source failures (which returns the last error).
    ///
    /// If the command channel closes while translating, the loop keeps
    /// sampling until the source ends. If it closes while stopped nothing
    /// could restart it, so the run ends with `ExitReason::Shutdown`.
    pub async fn run<P: PoseSource>(
        &mut self,
        source: &mut P,
        commands: &mut mpsc::Receiver<Command>,
    ) -> GesturaResult<ExitReason> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut commands_open = true;
        let mut consecutive_failures = 0u32;

        loop {
            tokio::select! {
                biased;

                command = commands.recv(), if commands_open => match command {
                    Some(Command::Shutdown) => {
                        self.translator.stop();
                        info!("driver shutdown");
                        return Ok(ExitReason::Shutdown);
                    }
                    Some(command) => self.apply(command),
                    None => {
                        if !self.translator.is_translating() {
                            info!("command channel closed while stopped");
                            return Ok(ExitReason::Shutdown);
                        }
                        debug!("command channel closed");
                        commands_open = false;
                    }
                },

                _ = ticker.tick() => {
                    if !self.translator.is_translating() {
                        continue;
                    }

                    match source.next_frame().await {
                        Ok(Some(frame)) => {
                            consecutive_failures = 0;
                            let outcome = self.translator.tick(Some(frame));
                            debug!(?outcome, "tick");
                        }
                        Ok(None) => {
                            self.translator.stop();
                            info!(ticks = self.translator.stats().ticks, "pose source exhausted");
                            return Ok(ExitReason::SourceExhausted);
                        }
                        Err(e) => {
                            consecutive_failures += 1;
                            self.translator.record_source_failure();
                            warn!(error = %e, consecutive_failures, "pose source failed");
                            if consecutive_failures >= self.max_source_failures {
                                self.translator.stop();
                                return Err(e);
                            }
                        }
                    }
                }
            }
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Start => {
                self.translator.start();
            }
            Command::Stop => {
                self.translator.stop();
            }
            Command::ClearHistory => self.translator.clear_history(),
            Command::Shutdown => {}
        }
    }

    pub fn translator(&self) -> &Translator<S, D> {
        &self.translator
    }

    pub fn translator_mut(&mut self) -> &mut Translator<S, D> {
        &mut self.translator
    }

    pub fn into_translator(self) -> Translator<S, D> {
        self.translator
    }
}
