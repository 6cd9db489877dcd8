//! Event ingestion: raw IRC lines in, aggregate updates out.
//!
//! Lines are parsed outside the lock, then each batch is applied under a
//! single write guard so readers see whole batches.

use chanstat_proto::{Event, ParseError};
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use crate::metrics;
use crate::stats::{SharedStats, Stats};

/// Outcome counts for ingested lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub ingested: u64,
    pub rejected: u64,
}

impl IngestReport {
    fn merge(&mut self, other: IngestReport) {
        self.ingested += other.ingested;
        self.rejected += other.rejected;
    }
}

/// Apply one parsed event to the graph.
pub fn apply_event(stats: &mut Stats, network: &str, event: &Event) {
    stats.add_message(
        event.kind,
        network,
        &event.channel,
        &event.hostmask,
        event.time.unwrap_or_else(Utc::now),
        &event.text,
    );
    metrics::record_message(event.kind.as_str());
}

/// Feeds lines from one network into the shared graph.
#[derive(Clone)]
pub struct Ingester {
    stats: SharedStats,
    network: String,
}

impl Ingester {
    pub fn new(stats: SharedStats, network: impl Into<String>) -> Self {
        Self {
            stats,
            network: network.into(),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Parse and apply a batch of lines under one write guard.
    pub fn ingest_batch<I, S>(&self, lines: I) -> IngestReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = IngestReport::default();
        let events: Vec<Event> = lines
            .into_iter()
            .filter_map(|line| match Event::parse(line.as_ref()) {
                Ok(event) => Some(event),
                Err(ParseError::EmptyLine) => None,
                Err(e) => {
                    debug!(error = %e, "Skipping line");
                    metrics::record_parse_error();
                    report.rejected += 1;
                    None
                }
            })
            .collect();

        if events.is_empty() {
            return report;
        }

        let mut stats = self.stats.write();
        for event in &events {
            apply_event(&mut stats, &self.network, event);
        }
        report.ingested += events.len() as u64;
        report
    }

    /// Read lines until EOF, applying them in batches of at most
    /// `batch_size`. A batch is also flushed whenever the reader has no
    /// more buffered input, so a slow source is never held back.
    ///
    /// Lines are decoded lossily: bytes that are not UTF-8 (Latin-1 text is
    /// common on IRC) become U+FFFD and the line is still ingested.
    pub async fn run<R>(&self, reader: R, batch_size: usize) -> std::io::Result<IngestReport>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let batch_size = batch_size.max(1);
        let mut report = IngestReport::default();
        let mut batch: Vec<String> = Vec::with_capacity(batch_size);
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line).await?;
            if read > 0 {
                batch.push(String::from_utf8_lossy(&line).into_owned());
            }

            let eof = read == 0;
            let flush = eof || batch.len() >= batch_size || reader.buffer().is_empty();
            if flush && !batch.is_empty() {
                report.merge(self.ingest_batch(batch.drain(..)));
            }
            if eof {
                break;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingester() -> Ingester {
        Ingester::new(Stats::new().into_shared(), "TestNet")
    }

    #[test]
    fn batch_counts_ingested_and_rejected() {
        let ing = ingester();
        let report = ing.ingest_batch([
            ":alice!a@h PRIVMSG #rust :hello",
            "",
            "garbage without prefix",
            ":bob!b@h QUIT :bye",
        ]);
        assert_eq!(report, IngestReport { ingested: 2, rejected: 1 });

        let stats = ing.stats.read();
        assert_eq!(stats.network("testnet").unwrap().message_count(), 2);
        assert_eq!(stats.channel("TestNet", "#rust").unwrap().message_count(), 1);
    }

    #[test]
    fn server_time_is_used_as_timestamp() {
        let ing = ingester();
        ing.ingest_batch(["@time=2020-05-06T07:08:09Z :a!a@h PRIVMSG #c :x"]);
        let stats = ing.stats.read();
        let message = stats.message(1).unwrap();
        assert_eq!(message.timestamp.to_rfc3339(), "2020-05-06T07:08:09+00:00");
    }

    #[tokio::test]
    async fn run_reads_until_eof() {
        let ing = ingester();
        let input = b":a!a@h PRIVMSG #c :one\r\n:a!a@h PRIVMSG #c :two\n:b!b@h JOIN #c\n:a!a@h NICK";
        let report = ing.run(&input[..], 2).await.unwrap();
        assert_eq!(report, IngestReport { ingested: 3, rejected: 1 });

        let stats = ing.stats.read();
        assert_eq!(stats.channel("TestNet", "#c").unwrap().message_count(), 3);
        assert_eq!(stats.user("TestNet", "a").unwrap().message_count(), 2);
    }

    #[tokio::test]
    async fn run_survives_invalid_utf8() {
        let ing = ingester();
        let input = b":a!a@h PRIVMSG #c :one\n:a!a@h PRIVMSG #c :caf\xe9\n:a!a@h PRIVMSG #c :three\n";
        let report = ing.run(&input[..], 1).await.unwrap();
        assert_eq!(report, IngestReport { ingested: 3, rejected: 0 });

        let stats = ing.stats.read();
        assert_eq!(stats.channel("TestNet", "#c").unwrap().message_count(), 3);
        assert_eq!(stats.message(2).unwrap().text, "caf\u{fffd}");
        assert_eq!(stats.message(3).unwrap().text, "three");
    }
}
