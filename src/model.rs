use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackSearchResponse {
    pub tracks: TrackPage,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,

    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub limit: Option<u32>,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub previous: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub artists: Vec<Artist>,

    #[serde(default)]
    pub album: Option<Album>,

    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Album {
    pub name: String,

    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub url: String,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Flattened view of a track for setlist display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,

    pub lookup_key: String,
}

impl Track {
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }

    pub fn summary(&self) -> TrackSummary {
        let artists = self.artist_names();
        TrackSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            lookup_key: lookup_key(&self.name, &artists),
            album_name: self.album.as_ref().map(|a| a.name.clone()),
            image_url: self
                .album
                .as_ref()
                .and_then(|a| a.images.first())
                .map(|i| i.url.clone()),
            spotify_url: self
                .external_urls
                .as_ref()
                .and_then(|u| u.spotify.clone()),
            artists,
        }
    }
}

/// Case-insensitive identity of a song, used to avoid adding it twice.
pub fn lookup_key<S: AsRef<str>>(name: &str, artists: &[S]) -> String {
    std::iter::once(name)
        .chain(artists.iter().map(|a| a.as_ref()))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Search text used to find the catalog entry for a stored setlist song.
pub fn match_query<S: AsRef<str>>(song: &str, artists: &[S]) -> String {
    let joined = std::iter::once(song)
        .chain(artists.iter().map(|a| a.as_ref()))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        song.to_string()
    } else {
        joined
    }
}
