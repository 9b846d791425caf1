//! Property tests for the prefetching merge over arbitrary sorted sources.

use logweave::config::MergeConfig;
use logweave::merge::ChronoMerge;
use logweave::serial::serial_merge;
use logweave::sinks::VecSink;
use logweave::sources::VecSource;
use logweave::state::BufferSnapshot;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

/// Per-source entries `(timestamp, (source, position))`, sorted by timestamp.
fn sorted_sources() -> impl Strategy<Value = Vec<Vec<(u32, (usize, usize))>>> {
  prop::collection::vec(prop::collection::vec(0u32..50, 0..25), 0..10).prop_map(|lists| {
    lists
      .into_iter()
      .enumerate()
      .map(|(source, mut times)| {
        times.sort_unstable();
        times
          .into_iter()
          .enumerate()
          .map(|(pos, t)| (t, (source, pos)))
          .collect()
      })
      .collect()
  })
}

fn thresholds() -> impl Strategy<Value = MergeConfig> {
  (2usize..10)
    .prop_flat_map(|max| (Just(max), 1..max))
    .prop_flat_map(|(max, low)| (Just(max), Just(low), low..=max))
    .prop_map(|(max, low, medium)| MergeConfig::new(max, low).with_medium_water(medium))
}

struct Outcome {
  emitted: Vec<(u32, (usize, usize))>,
  completions: usize,
  snapshots: Vec<BufferSnapshot>,
  high_water: Vec<usize>,
}

fn run_merge(lists: &[Vec<(u32, (usize, usize))>], config: MergeConfig) -> Outcome {
  let snapshots = Arc::new(Mutex::new(Vec::new()));
  let recorded = snapshots.clone();
  let mut sink = VecSink::new();
  let sources: Vec<_> = lists.iter().cloned().map(VecSource::new).collect();
  let stats = tokio_test::block_on(
    ChronoMerge::new(sources)
      .with_config(config)
      .with_observer(move |s| recorded.lock().unwrap().push(s.clone()))
      .run(&mut sink),
  )
  .unwrap();
  let snapshots = snapshots.lock().unwrap().clone();
  Outcome {
    completions: sink.completions(),
    emitted: sink.into_vec(),
    snapshots,
    high_water: stats.high_water,
  }
}

proptest! {
  #[test]
  fn emitted_timestamps_never_decrease(lists in sorted_sources(), config in thresholds()) {
    let outcome = run_merge(&lists, config);
    prop_assert!(outcome.emitted.windows(2).all(|w| w[0].0 <= w[1].0));
  }

  #[test]
  fn every_entry_emitted_exactly_once(lists in sorted_sources(), config in thresholds()) {
    let outcome = run_merge(&lists, config);
    let mut expected: Vec<_> = lists.iter().flatten().copied().collect();
    let mut actual = outcome.emitted.clone();
    expected.sort();
    actual.sort();
    prop_assert_eq!(actual, expected);
    prop_assert_eq!(outcome.completions, 1);
  }

  #[test]
  fn live_sources_stay_buffered(lists in sorted_sources(), config in thresholds()) {
    let outcome = run_merge(&lists, config);
    for snapshot in &outcome.snapshots {
      prop_assert!(snapshot.is_covered(), "starved: {:?}", snapshot.starved());
    }
  }

  #[test]
  fn buffered_depth_never_exceeds_max(lists in sorted_sources(), config in thresholds()) {
    let max = config.max_depth;
    let outcome = run_merge(&lists, config);
    prop_assert!(outcome.high_water.iter().all(|d| *d <= max));
    prop_assert!(outcome.snapshots.iter().all(|s| s.deepest() <= max));
  }

  #[test]
  fn output_matches_serial_merge(lists in sorted_sources(), config in thresholds()) {
    let outcome = run_merge(&lists, config);
    let mut serial = VecSink::new();
    let sources: Vec<_> = lists.iter().cloned().map(VecSource::new).collect();
    tokio_test::block_on(serial_merge(sources, &mut serial)).unwrap();
    prop_assert_eq!(outcome.emitted, serial.into_vec());
  }

  #[test]
  fn swapping_equal_timestamps_keeps_the_emitted_set(lists in sorted_sources(), config in thresholds()) {
    let mut reversed = lists.clone();
    reversed.reverse();
    let forward = run_merge(&lists, config.clone());
    let backward = run_merge(&reversed, config);

    let times = |o: &Outcome| o.emitted.iter().map(|e| e.0).collect::<Vec<_>>();
    prop_assert_eq!(times(&forward), times(&backward));
    let mut a = forward.emitted.clone();
    let mut b = backward.emitted.clone();
    a.sort();
    b.sort();
    prop_assert_eq!(a, b);
  }
}
