//! End-to-end: raw IRC lines in, snapshot out, snapshot back in.

use chanstat::{Ingester, SnapshotWriter, Stats};
use flate2::Compression;
use tempfile::tempdir;

const LOG: &str = "\
:alice!a@host PRIVMSG #rust :hello https://rust-lang.org\r
:bob!b@host PRIVMSG #rust :\x01ACTION waves\x01\r
:bob!b@host JOIN #tokio\r
\r
not an irc line at all\r
@time=2024-03-01T12:00:00.000Z :op!o@host KICK #tokio bob :flooding\r
:carol!c@host QUIT :gone fishing\r
:alice!a@host NICK :alicia\r
";

#[tokio::test]
async fn test_stream_to_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.db");

    let stats = Stats::new().into_shared();
    let ingester = Ingester::new(stats.clone(), "libera");
    let report = ingester.run(LOG.as_bytes(), 2).await.unwrap();
    assert_eq!(report.ingested, 6);
    assert_eq!(report.rejected, 1);

    {
        let stats = stats.read();
        let rust = stats.channel("libera", "#rust").unwrap();
        assert_eq!(rust.message_count(), 2);
        assert_eq!(rust.actions, 1);

        let tokio = stats.channel("libera", "#tokio").unwrap();
        assert_eq!(tokio.kicks, 1);
        assert_eq!(stats.channel_count(), 2);

        let carol = stats.user("libera", "carol").unwrap();
        assert!(carol.channel_users.is_empty());
    }

    SnapshotWriter::new(stats.clone(), &path, Compression::fast())
        .save()
        .await
        .unwrap();

    let loaded = Stats::load(&path).unwrap();
    let network = loaded.network("libera").unwrap();
    assert_eq!(network.message_count(), 6);
    assert_eq!(network.urls.count("https://rust-lang.org"), 1);
    assert_eq!(loaded.user_count(), 4);
}

#[tokio::test]
async fn test_batches_share_one_graph() {
    let stats = Stats::new().into_shared();
    let a = Ingester::new(stats.clone(), "libera");
    let b = Ingester::new(stats.clone(), "oftc");

    a.ingest_batch([":x!u@h PRIVMSG #c :one"]);
    b.ingest_batch(vec![":x!u@h PRIVMSG #c :two".to_string()]);

    let stats = stats.read();
    assert_eq!(stats.network_count(), 2);
    assert_eq!(stats.user_count(), 2);
    assert_eq!(stats.message_count(), 2);
}
