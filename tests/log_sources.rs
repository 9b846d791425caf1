//! End-to-end merges over the bundled log sources and sinks.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use logweave::config::MergeConfig;
use logweave::entry::LogEntry;
use logweave::error::{MergeError, SourceError};
use logweave::merge::{ChronoMerge, merge_sources};
use logweave::sinks::{OutputFormat, VecSink, WriterSink};
use logweave::source::{LogSource, SourceId};
use logweave::sources::{ChannelSource, RandomSource, TimeoutSource, VecSource};
use std::time::Duration;

type DynSource = Box<dyn LogSource<Entry = LogEntry>>;

fn horizon() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn at(minutes: i64, msg: &str) -> LogEntry {
  LogEntry::new(horizon() - ChronoDuration::minutes(minutes), msg)
}

#[tokio::test(start_paused = true)]
async fn test_random_sources_merge_chronologically() {
  logweave::logging::init_tracing(tracing::Level::INFO);
  let sources: Vec<RandomSource> = (0..25)
    .map(|seed| RandomSource::seeded(seed, horizon()).with_name(format!("host-{seed}")))
    .collect();
  let mut sink = VecSink::new();

  let stats = merge_sources(sources, &mut sink, MergeConfig::new(16, 4).with_name("random"))
    .await
    .unwrap();

  let entries = sink.entries();
  assert_eq!(stats.emitted as usize, entries.len());
  assert!(entries.len() > 25 * 90);
  assert!(entries.windows(2).all(|w| w[0].date <= w[1].date));
  assert!(entries.iter().all(|e| e.date <= horizon()));
  assert!(stats.high_water.iter().all(|d| *d <= 16));
  assert_eq!(sink.completions(), 1);
}

#[tokio::test]
async fn test_mixed_source_kinds_behind_trait_objects() {
  let (tx, channel) = ChannelSource::bounded(8);
  let feeder = tokio::spawn(async move {
    for (minutes, msg) in [(50, "ch-a"), (30, "ch-b"), (10, "ch-c")] {
      tx.send(Ok(at(minutes, msg))).await.unwrap();
      tokio::task::yield_now().await;
    }
  });

  let sources: Vec<DynSource> = vec![
    Box::new(channel.with_name("channel")),
    Box::new(VecSource::new(vec![at(60, "vec-a"), at(20, "vec-b")])),
    Box::new(VecSource::lazy(vec![at(40, "lazy-a"), at(0, "lazy-b")])),
  ];
  let mut sink = VecSink::new();

  merge_sources(sources, &mut sink, MergeConfig::new(2, 1))
    .await
    .unwrap();
  feeder.await.unwrap();

  let order: Vec<&str> = sink.entries().iter().map(|e| e.msg.as_str()).collect();
  assert_eq!(order, vec!["vec-a", "ch-a", "lazy-a", "ch-b", "vec-b", "ch-c", "lazy-b"]);
}

#[tokio::test]
async fn test_channel_error_fails_the_merge() {
  let (tx, channel) = ChannelSource::bounded(4);
  tx.send(Ok(at(5, "ok"))).await.unwrap();
  tx.send(Err(SourceError::fetch("connection reset"))).await.unwrap();
  drop(tx);

  let sources: Vec<DynSource> = vec![
    Box::new(VecSource::new(vec![at(9, "first")])),
    Box::new(channel.with_name("remote")),
  ];
  let mut sink = VecSink::new();

  let err = merge_sources(sources, &mut sink, MergeConfig::default())
    .await
    .unwrap_err();

  match err {
    MergeError::Source {
      source_id,
      name,
      error: SourceError::Fetch { message },
    } => {
      assert_eq!(source_id, SourceId(1));
      assert_eq!(name, "remote");
      assert_eq!(message, "connection reset");
    }
    other => panic!("unexpected error: {other:?}"),
  }
  assert_eq!(sink.completions(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_wrapper_turns_a_hung_source_into_an_error() {
  let (_tx, hung) = ChannelSource::<LogEntry>::bounded(1);
  let sources = vec![
    TimeoutSource::new(Box::new(VecSource::new(vec![at(3, "fine")])) as DynSource, Duration::from_secs(1)),
    TimeoutSource::new(Box::new(hung) as DynSource, Duration::from_secs(1)),
  ];
  let mut sink = VecSink::new();

  let err = merge_sources(sources, &mut sink, MergeConfig::default())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    MergeError::Source {
      error: SourceError::Timeout { .. },
      ..
    }
  ));
}

#[tokio::test]
async fn test_writer_sink_renders_merged_json_lines() {
  let sources = vec![
    VecSource::new(vec![at(30, "b"), at(10, "d")]),
    VecSource::new(vec![at(40, "a"), at(20, "c")]),
  ];
  let mut sink = WriterSink::new(Vec::new()).with_format(OutputFormat::JsonLines);

  ChronoMerge::new(sources)
    .with_config(MergeConfig::new(4, 1))
    .run(&mut sink)
    .await
    .unwrap();

  assert_eq!(sink.stats().map(|s| s.printed), Some(4));
  let out = String::from_utf8(sink.into_inner()).unwrap();
  let msgs: Vec<String> = out
    .lines()
    .map(|line| serde_json::from_str::<LogEntry>(line).unwrap().msg)
    .collect();
  assert_eq!(msgs, vec!["a", "b", "c", "d"]);
}
