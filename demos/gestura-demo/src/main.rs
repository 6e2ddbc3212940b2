//! Gestura Demo Application
//!
//! Feeds hand frames through the translator at the configured cadence:
//! - From a recorded JSON fixture (`--fixture`)
//! - Or from a seeded random stream of held signs
//!
//! Recognized signs are "spoken" to stdout and display updates are printed
//! as text or as prediction JSON lines.

use std::path::PathBuf;

use clap::Parser;
use gestura_core::{GesturaResult, GestureLabel, Handedness};
use gestura_runtime::{
    init_tracing, ChannelSpeaker, Command, Driver, ExitReason, LogFormat, PoseSource, Prediction,
    SignDisplay, TranslatorConfig,
};
use gestura_test::{FixturePoseSource, RandomPoseConfig, RandomPoseSource};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "gestura-demo", about = "Hand sign translator demo")]
struct Cli {
    /// JSON fixture of recorded frames; a random stream is used when absent
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Translator configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hand to assume when no config file is given
    #[arg(long, default_value = "right")]
    handedness: Handedness,

    /// Seed for the random stream
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Frames to generate in random mode
    #[arg(long, default_value_t = 300)]
    frames: usize,

    /// Print display updates as prediction JSON lines
    #[arg(long)]
    json: bool,

    /// Log format: compact or json
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

/// Prints display updates to stdout
struct ConsoleDisplay {
    json: bool,
    hands_detected: bool,
    current: Option<(GestureLabel, f32)>,
}

impl ConsoleDisplay {
    fn new(json: bool) -> Self {
        ConsoleDisplay {
            json,
            hands_detected: false,
            current: None,
        }
    }

    fn emit(&self) {
        if !self.json {
            return;
        }
        let prediction = Prediction::new(
            self.current.map(|(label, _)| label),
            self.current.map(|(_, confidence)| confidence).unwrap_or(0.0),
            self.hands_detected,
        );
        match prediction.to_json() {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(error = %e, "failed to encode prediction"),
        }
    }
}

impl SignDisplay for ConsoleDisplay {
    fn label_changed(&mut self, label: GestureLabel, confidence: f32) {
        self.current = Some((label, confidence));
        if !self.json {
            let guide = label.guide();
            println!("sign: {} ({:.2}) - {}", label, confidence, guide.description);
        }
        self.emit();
    }

    fn hands_presence(&mut self, present: bool) {
        self.hands_detected = present;
        if !self.json {
            println!("{}", if present { "hand in view" } else { "no hand" });
        }
        self.emit();
    }
}

async fn drive<P: PoseSource>(
    driver: &mut Driver<ChannelSpeaker, ConsoleDisplay>,
    mut source: P,
) -> GesturaResult<ExitReason> {
    let (tx, mut rx) = mpsc::channel(4);
    let _ = tx.send(Command::Start).await;
    driver.run(&mut source, &mut rx).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let config = match &cli.config {
        Some(path) => TranslatorConfig::load(path)?,
        None => TranslatorConfig::new(cli.handedness),
    };
    info!(
        interval = ?config.sample_interval,
        handedness = %config.handedness,
        "gestura-demo v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let (speaker, mut utterances) = ChannelSpeaker::new();
    let voice = tokio::spawn(async move {
        while let Some(text) = utterances.recv().await {
            println!("speak: {}", text);
        }
    });

    let mut driver = Driver::new(&config, speaker, ConsoleDisplay::new(cli.json));

    let exit = match &cli.fixture {
        Some(path) => drive(&mut driver, FixturePoseSource::load(path)?).await?,
        None => {
            let random = RandomPoseConfig {
                handedness: config.handedness,
                limit: Some(cli.frames),
                ..Default::default()
            };
            drive(&mut driver, RandomPoseSource::new(random, cli.seed)).await?
        }
    };

    let translator = driver.into_translator();
    let stats = translator.stats().clone();
    let history: Vec<String> = translator
        .session()
        .history()
        .iter()
        .map(|label| label.to_string())
        .collect();

    // Closing the speech channel lets the voice task drain and finish
    drop(translator);
    voice.await?;

    info!(
        ?exit,
        ticks = stats.ticks,
        transitions = stats.transitions,
        malformed = stats.malformed_poses,
        "run finished"
    );
    if !cli.json {
        println!("history: [{}]", history.join(", "));
    }
    Ok(())
}
