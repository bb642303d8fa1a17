//! Cache-aware loading against a file that changes between reads.

use navtrack_data::{ColumnMap, CsvLoader, FetchConfig, Source, SourceCache};

const FIRST: &str = "Date,NAV,Nifty50 Change %\n01-Jan-24,100,1%\n";
const SECOND: &str = "Date,NAV,Nifty50 Change %\n01-Jan-24,100,1%\n02-Jan-24,101,0.5%\n";

#[tokio::test]
async fn test_refresh_picks_up_new_content() {
    let path = std::env::temp_dir().join(format!("navtrack-refresh-{}.csv", std::process::id()));
    std::fs::write(&path, FIRST).unwrap();
    let source = Source::File(path.clone());

    let loader = CsvLoader::new().unwrap();
    let mut cache = SourceCache::new();

    let first = loader
        .load_cached(&mut cache, &source, FetchConfig::default())
        .await
        .unwrap();
    assert_eq!(first.len(), 1);

    std::fs::write(&path, SECOND).unwrap();

    // Stale until refreshed.
    let cached = loader
        .load_cached(&mut cache, &source, FetchConfig::default())
        .await
        .unwrap();
    assert_eq!(cached.len(), 1);

    let refresh = FetchConfig {
        use_cache: true,
        force_refresh: true,
    };
    let fresh = loader.load_cached(&mut cache, &source, refresh).await.unwrap();
    assert_eq!(fresh.len(), 2);

    let rows = fresh.rows(&ColumnMap::default()).unwrap();
    assert_eq!(rows[1].line, 3);
    assert_eq!(rows[1].benchmark_change.as_deref(), Some("0.5%"));

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);

    std::fs::remove_file(&path).ok();
}
