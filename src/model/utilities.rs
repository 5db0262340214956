use futures::future::try_join_all;

use super::source::SourceRecord;
use super::traits::SourceFetcher;
use crate::config::GivTcpHost;
use crate::error::SourceError;

/// Fetches every host concurrently and waits for all of them.
///
/// One failing host fails the whole cycle, so a partial set of inverters is
/// never aggregated as if it were the full installation.
///
/// # Returns
/// One source record per host, in host order
pub async fn fetch_all_sources(
    fetcher: &dyn SourceFetcher,
    hosts: &[GivTcpHost],
) -> Result<Vec<SourceRecord>, SourceError> {
    let documents = try_join_all(hosts.iter().map(|host| fetcher.fetch(host))).await?;

    Ok(hosts
        .iter()
        .zip(documents)
        .map(|(host, document)| {
            tracing::debug!(source = %host.name, port = host.port, "Fetched document");
            SourceRecord::new(host.name.clone(), host.sort_order, document)
        })
        .collect())
}
