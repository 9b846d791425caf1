use logweave::config::MergeConfig;
use logweave::logging::init_tracing;
use logweave::merge::ChronoMerge;
use logweave::sinks::WriterSink;
use logweave::sources::RandomSource;
use std::env;

const DEFAULT_SOURCES: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  init_tracing(tracing::Level::INFO);

  let source_count = env::args()
    .nth(1)
    .map(|arg| arg.parse::<usize>())
    .transpose()?
    .unwrap_or(DEFAULT_SOURCES);

  eprintln!("🚀 logweave random merge");
  eprintln!("========================");
  eprintln!("Merging {source_count} randomly paced log sources to stdout");
  eprintln!();

  let sources: Vec<RandomSource> = (0..source_count)
    .map(|i| RandomSource::new().with_name(format!("host-{i:03}")))
    .collect();
  let mut sink = WriterSink::stdout();

  let stats = ChronoMerge::new(sources)
    .with_config(MergeConfig::default().with_name("random"))
    .run(&mut sink)
    .await?;

  eprintln!();
  eprintln!("✅ Merge complete");
  eprintln!("• entries emitted: {}", stats.emitted);
  eprintln!("• refill rounds:   {} ({} after priming)", stats.rounds, stats.refill_rounds);
  eprintln!("• source fetches:  {}", stats.fetches);
  eprintln!("• elapsed:         {:.2?}", stats.elapsed);
  eprintln!("• throughput:      {:.0} entries/s", stats.rate());
  if let Some(printed) = sink.stats() {
    eprintln!("• sink rate:       {:.0} lines/s", printed.rate());
  }

  Ok(())
}
