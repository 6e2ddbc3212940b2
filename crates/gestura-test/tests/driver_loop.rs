//! Driver loop against scripted, fixture, flaky and random sources

use std::time::Duration;

use gestura_core::{GesturaError, GestureLabel, Handedness};
use gestura_runtime::{Command, Driver, ExitReason, TranslatorConfig};
use gestura_test::{
    FixturePoseSource, FlakySource, RandomPoseConfig, RandomPoseSource, RecordingDisplay,
    RecordingSpeaker, ScriptedPoseSource,
};
use tokio::sync::mpsc;

use GestureLabel::*;

const SAMPLE_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/sample.json");

fn driver(config: &TranslatorConfig) -> (Driver<RecordingSpeaker, RecordingDisplay>, RecordingSpeaker) {
    let speaker = RecordingSpeaker::new();
    let driver = Driver::new(config, speaker.clone(), RecordingDisplay::new());
    (driver, speaker)
}

#[tokio::test(start_paused = true)]
async fn fixture_replay() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = FixturePoseSource::load(SAMPLE_FIXTURE).unwrap();
    let frames = source.remaining() as u64;
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();

    let exit = driver.run(&mut source, &mut rx).await.unwrap();

    assert_eq!(exit, ExitReason::SourceExhausted);
    assert_eq!(speaker.utterances(), vec!["Hello", "Peace", "I Love You", "Yes"]);

    let translator = driver.translator();
    assert_eq!(
        translator.session().history().to_vec(),
        vec![Hello, Peace, ILoveYou, Yes]
    );
    assert_eq!(translator.stats().ticks, frames);
    assert_eq!(translator.stats().malformed_poses, 1);
}

#[tokio::test(start_paused = true)]
async fn nothing_sampled_before_start() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = ScriptedPoseSource::from_labels(&[Some(Hello); 3]);
    let (tx, mut rx) = mpsc::channel(4);

    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        tx.send(Command::Shutdown).await.unwrap();
    });

    let exit = driver.run(&mut source, &mut rx).await.unwrap();
    handle.await.unwrap();

    assert_eq!(exit, ExitReason::Shutdown);
    assert_eq!(source.remaining(), 3);
    assert!(speaker.utterances().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_between_ticks() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = ScriptedPoseSource::from_labels(&[Some(Hello); 100]);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();

    let handle = tokio::spawn(async move {
        // Default cadence is 100ms; let a few ticks through
        tokio::time::sleep(Duration::from_millis(350)).await;
        tx.send(Command::Stop).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(Command::Shutdown).await.unwrap();
    });

    let exit = driver.run(&mut source, &mut rx).await.unwrap();
    handle.await.unwrap();

    assert_eq!(exit, ExitReason::Shutdown);
    assert_eq!(speaker.utterances(), vec!["Hello"]);

    let consumed = 100 - source.remaining();
    assert!(consumed >= 3 && consumed <= 5, "consumed {}", consumed);
    assert_eq!(driver.translator().stats().ticks as usize, consumed);
    assert_eq!(driver.translator().session().history().to_vec(), vec![Hello]);
}

#[tokio::test(start_paused = true)]
async fn closed_command_channel_keeps_sampling() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = ScriptedPoseSource::from_labels(&[Some(Yes), Some(No), None]);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();
    drop(tx);

    let exit = driver.run(&mut source, &mut rx).await.unwrap();

    assert_eq!(exit, ExitReason::SourceExhausted);
    assert_eq!(speaker.utterances(), vec!["Yes", "No"]);
}

#[tokio::test(start_paused = true)]
async fn closed_command_channel_before_start_ends_the_run() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = ScriptedPoseSource::from_labels(&[Some(Hello); 3]);
    let (tx, mut rx) = mpsc::channel(4);
    drop(tx);

    let run = tokio::time::timeout(Duration::from_secs(3600), driver.run(&mut source, &mut rx));
    let exit = run.await.expect("driver did not return").unwrap();

    assert_eq!(exit, ExitReason::Shutdown);
    assert_eq!(source.remaining(), 3);
    assert!(speaker.utterances().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closed_command_channel_after_stop_ends_the_run() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = ScriptedPoseSource::from_labels(&[Some(Peace); 100]);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();

    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        tx.send(Command::Stop).await.unwrap();
    });

    let run = tokio::time::timeout(Duration::from_secs(3600), driver.run(&mut source, &mut rx));
    let exit = run.await.expect("driver did not return").unwrap();
    handle.await.unwrap();

    assert_eq!(exit, ExitReason::Shutdown);
    assert_eq!(speaker.utterances(), vec!["Peace"]);
    assert!(source.remaining() > 90);
    assert!(!driver.translator().is_translating());
}

#[tokio::test(start_paused = true)]
async fn clear_history_command() {
    let (mut driver, _speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let mut source = ScriptedPoseSource::from_labels(&[Some(Peace)]);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();
    let exit = driver.run(&mut source, &mut rx).await.unwrap();
    assert_eq!(exit, ExitReason::SourceExhausted);
    assert_eq!(driver.translator().session().history().len(), 1);

    tx.send(Command::ClearHistory).await.unwrap();
    tx.send(Command::Shutdown).await.unwrap();
    driver.run(&mut source, &mut rx).await.unwrap();
    assert!(driver.translator().session().history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transient_source_failures_are_tolerated() {
    let mut config = TranslatorConfig::new(Handedness::Right);
    config.max_source_failures = 3;
    let (mut driver, speaker) = driver(&config);

    let inner = ScriptedPoseSource::from_labels(&[Some(Hello), Some(Peace)]);
    let mut source = FlakySource::new(inner, [true, true, false, true, true, false]);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();

    let exit = driver.run(&mut source, &mut rx).await.unwrap();

    assert_eq!(exit, ExitReason::SourceExhausted);
    assert_eq!(speaker.utterances(), vec!["Hello", "Peace"]);
    assert_eq!(driver.translator().stats().source_failures, 4);
}

#[tokio::test(start_paused = true)]
async fn persistent_source_failure_ends_the_run() {
    let mut config = TranslatorConfig::new(Handedness::Right);
    config.max_source_failures = 4;
    let (mut driver, _speaker) = driver(&config);

    let inner = ScriptedPoseSource::from_labels(&[Some(Hello)]);
    let mut source = FlakySource::new(inner, [true; 10]);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();

    let err = driver.run(&mut source, &mut rx).await.unwrap_err();

    assert!(matches!(err, GesturaError::Source(_)));
    assert_eq!(driver.translator().stats().source_failures, 4);
    assert!(!driver.translator().is_translating());
}

#[tokio::test(start_paused = true)]
async fn random_stream_history_stays_bounded() {
    let (mut driver, speaker) = driver(&TranslatorConfig::new(Handedness::Right));
    let config = RandomPoseConfig {
        limit: Some(400),
        ..Default::default()
    };
    let mut source = RandomPoseSource::new(config, 0x5eed);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(Command::Start).await.unwrap();

    driver.run(&mut source, &mut rx).await.unwrap();

    let translator = driver.translator();
    let history = translator.session().history().to_vec();
    assert!(history.len() <= 5);
    assert_eq!(translator.stats().transitions as usize, speaker.utterances().len());
    for pair in history.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}
