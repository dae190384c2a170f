use crate::error::{GamecastError, GamecastResult};

const PROGRESSIVE_TOKEN: &str = "mp4";
const ADAPTIVE_TOKEN: &str = "m3u8";

/// Bitrate labels from best to worst.
pub const BITRATE_PREFERENCE: &[&str] = &["4000K", "2500K", "1800K", "1200K", "800K", "450K"];

/// A playback entry that carries at least a name or a url. Only
/// [`PlaybackVariant::from_parts`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackVariant {
    encoding_name: String,
    url: String,
}

impl PlaybackVariant {
    /// Builds a variant from optional feed fields. One of the two may be
    /// missing; losing both leaves nothing to select on.
    pub fn from_parts(
        item_id: &str,
        index: usize,
        name: Option<String>,
        url: Option<String>,
    ) -> GamecastResult<Self> {
        let name = name.filter(|s| !s.trim().is_empty());
        let url = url.filter(|s| !s.trim().is_empty());
        if name.is_none() && url.is_none() {
            return Err(GamecastError::MalformedVariant {
                item_id: item_id.to_string(),
                index,
            });
        }
        Ok(Self {
            encoding_name: name.unwrap_or_default(),
            url: url.unwrap_or_default(),
        })
    }

    pub fn encoding_name(&self) -> &str {
        &self.encoding_name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn is_progressive(&self) -> bool {
        if self.url.is_empty() {
            return false;
        }
        let name = self.encoding_name.to_lowercase();
        let url = self.url.to_lowercase();
        let progressive = name.contains(PROGRESSIVE_TOKEN) || url.contains(PROGRESSIVE_TOKEN);
        let adaptive = name.contains(ADAPTIVE_TOKEN) || url.contains(ADAPTIVE_TOKEN);
        progressive && !adaptive
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightItem {
    pub id: String,
    pub title: String,
    pub blurb: Option<String>,
    pub playback_variants: Vec<PlaybackVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPlayback {
    pub url: String,
}

/// A highlight paired with whatever playback could be chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRow {
    pub id: String,
    pub title: String,
    pub blurb: Option<String>,
    pub playback: Option<SelectedPlayback>,
}

pub fn select_best_playback(variants: &[PlaybackVariant]) -> Option<SelectedPlayback> {
    let playable: Vec<&PlaybackVariant> = variants.iter().filter(|v| v.is_progressive()).collect();

    BITRATE_PREFERENCE
        .iter()
        .find_map(|label| {
            playable
                .iter()
                .find(|v| v.encoding_name.to_uppercase().contains(label))
        })
        .or_else(|| playable.first())
        .map(|v| SelectedPlayback { url: v.url.clone() })
}

pub fn select_highlights(items: &[HighlightItem]) -> Vec<HighlightRow> {
    items
        .iter()
        .map(|item| {
            let playback = select_best_playback(&item.playback_variants);
            if playback.is_none() {
                tracing::debug!(id = %item.id, "no progressive playback for highlight");
            }
            HighlightRow {
                id: item.id.clone(),
                title: item.title.clone(),
                blurb: item.blurb.clone(),
                playback,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(name: &str, url: &str) -> PlaybackVariant {
        PlaybackVariant::from_parts("t", 0, Some(name.to_string()), Some(url.to_string()))
            .expect("test variants carry a name")
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_best_playback(&[]).is_none());
    }

    #[test]
    fn adaptive_stream_is_excluded() {
        let variants = vec![
            variant("HTTP_CLOUD_WIRED_60", "https://cdn.example/master.m3u8"),
            variant("1200K mp4", "https://cdn.example/clip_1200K.mp4"),
        ];
        let selected = select_best_playback(&variants).expect("mp4 should be selected");
        assert_eq!(selected.url, "https://cdn.example/clip_1200K.mp4");
    }

    #[test]
    fn higher_bitrate_wins_regardless_of_order() {
        let variants = vec![
            variant("mp4 800K", "https://cdn.example/a.mp4"),
            variant("mp4 1800K", "https://cdn.example/b.mp4"),
        ];
        let selected = select_best_playback(&variants).unwrap();
        assert_eq!(selected.url, "https://cdn.example/b.mp4");
    }

    #[test]
    fn unlabeled_progressive_falls_back_to_first() {
        let variants = vec![
            variant("mp4Avc", "https://cdn.example/avc.mp4"),
            variant("highBit", "https://cdn.example/high.mp4"),
        ];
        let selected = select_best_playback(&variants).unwrap();
        assert_eq!(selected.url, "https://cdn.example/avc.mp4");
    }

    #[test]
    fn token_match_is_case_insensitive() {
        let variants = vec![
            variant("FLASH_2500K_1280X720", "https://cdn.example/clip.MP4"),
            variant("hls", "https://cdn.example/clip.M3U8"),
        ];
        let selected = select_best_playback(&variants).unwrap();
        assert_eq!(selected.url, "https://cdn.example/clip.MP4");
    }

    #[test]
    fn only_adaptive_variants_select_nothing() {
        let variants = vec![variant("hls", "https://cdn.example/master.m3u8")];
        assert!(select_best_playback(&variants).is_none());
    }

    #[test]
    fn variant_needs_name_or_url() {
        assert!(PlaybackVariant::from_parts("h1", 0, Some("mp4Avc".into()), None).is_ok());
        let err = PlaybackVariant::from_parts("h1", 2, None, Some(" ".into())).unwrap_err();
        assert!(matches!(err, GamecastError::MalformedVariant { index: 2, .. }));
    }

    #[test]
    fn blank_variant_cannot_be_built() {
        let err = PlaybackVariant::from_parts("h9", 0, Some(String::new()), Some(String::new()))
            .unwrap_err();
        assert!(matches!(err, GamecastError::MalformedVariant { ref item_id, index: 0 } if item_id == "h9"));
    }

    #[test]
    fn missing_name_reads_as_empty() {
        let v = PlaybackVariant::from_parts("h1", 0, None, Some("https://cdn.example/a.mp4".into()))
            .unwrap();
        assert_eq!(v.encoding_name(), "");
        assert_eq!(v.url(), "https://cdn.example/a.mp4");
    }

    #[test]
    fn adaptive_label_is_filtered_before_ranking() {
        let variants = vec![
            variant("HLS_4000K", "https://cdn.example/hi.m3u8"),
            variant("FLASH_800K", "https://cdn.example/lo.mp4"),
        ];
        let selected = select_best_playback(&variants).unwrap();
        assert_eq!(selected.url, "https://cdn.example/lo.mp4");
    }

    #[test]
    fn fallback_skips_leading_adaptive_variant() {
        let variants = vec![
            variant("hls", "https://cdn.example/master.m3u8"),
            variant("mp4Avc", "https://cdn.example/avc.mp4"),
        ];
        let selected = select_best_playback(&variants).unwrap();
        assert_eq!(selected.url, "https://cdn.example/avc.mp4");
    }

    #[test]
    fn variant_without_url_is_never_selected() {
        let variants = vec![variant("mp4Avc 1800K", "")];
        assert!(select_best_playback(&variants).is_none());
    }

    #[test]
    fn highlight_rows_keep_unplayable_items() {
        let items = vec![HighlightItem {
            id: "h1".to_string(),
            title: "Recap".to_string(),
            blurb: None,
            playback_variants: vec![variant("hls", "https://cdn.example/master.m3u8")],
        }];
        let rows = select_highlights(&items);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].playback.is_none());
    }
}
