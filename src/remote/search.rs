//! Track search through the proxy.

use super::*;

impl RemoteClient {
    pub fn search_raw(&self, query: &str, limit: Option<u32>) -> Result<serde_json::Value> {
        let mut params = vec![("q", query.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }

        let request = self.client.get(self.url("/api/search")).query(&params);
        let resp = self.send(request, "search")?;

        self.ensure_ok(resp, "search")?
            .json()
            .context("parse search response")
    }

    pub fn search_tracks(&self, query: &str, limit: Option<u32>) -> Result<TrackSearchResponse> {
        let value = self.search_raw(query, limit)?;
        serde_json::from_value(value).context("decode track search response")
    }

    /// Finds the catalog entry for a stored setlist song.
    pub fn match_track(&self, song: &str, artists: &[String]) -> Result<Option<TrackSummary>> {
        let query = match_query(song, artists);
        let found = self.search_tracks(&query, Some(1))?;
        Ok(found.tracks.items.first().map(|t| t.summary()))
    }
}
