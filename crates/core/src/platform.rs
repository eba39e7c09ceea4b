//! Canonical platform identity tables.
//!
//! The society's statements carry human-readable licensee/sender strings
//! ("Spotify AB", "Amazon Music GmbH"); distributor exports carry retailer
//! labels with their own spelling ("Amazon Ad-Supported", "iTunes & Apple
//! Music"). Reconciliation can only pair the two streams if both resolve
//! into one shared key space: `canonical_platform_key` for the society
//! side and `normalize_retailer` for the distributor side land on the same
//! keys by construction.

/// Display info for a recognized platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub name: &'static str,
    pub color: &'static str,
    pub tag: PlatformTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTag {
    Streaming,
    Social,
    Radio,
    Download,
    Other,
}

/// Known platform name fragments, matched case-insensitively as substrings.
/// Order matters: more specific fragments come before their prefixes
/// ("youtube music" before "youtube").
const PLATFORM_TABLE: &[(&str, PlatformInfo)] = &[
    ("spotify", PlatformInfo { name: "Spotify", color: "#1DB954", tag: PlatformTag::Streaming }),
    ("apple music", PlatformInfo { name: "Apple Music", color: "#FC3C44", tag: PlatformTag::Streaming }),
    ("apple_music", PlatformInfo { name: "Apple Music", color: "#FC3C44", tag: PlatformTag::Streaming }),
    ("deezer", PlatformInfo { name: "Deezer", color: "#A238FF", tag: PlatformTag::Streaming }),
    ("tidal", PlatformInfo { name: "Tidal", color: "#000000", tag: PlatformTag::Streaming }),
    ("amazon music", PlatformInfo { name: "Amazon Music", color: "#25D1DA", tag: PlatformTag::Streaming }),
    ("amazon_music", PlatformInfo { name: "Amazon Music", color: "#25D1DA", tag: PlatformTag::Streaming }),
    ("amazon unlimited", PlatformInfo { name: "Amazon Music", color: "#25D1DA", tag: PlatformTag::Streaming }),
    ("amazon prime", PlatformInfo { name: "Amazon Music", color: "#25D1DA", tag: PlatformTag::Streaming }),
    ("amazon ad", PlatformInfo { name: "Amazon Music", color: "#25D1DA", tag: PlatformTag::Streaming }),
    ("amazon", PlatformInfo { name: "Amazon Music", color: "#25D1DA", tag: PlatformTag::Streaming }),
    ("youtube music", PlatformInfo { name: "YouTube Music", color: "#FF0000", tag: PlatformTag::Streaming }),
    ("youtube red", PlatformInfo { name: "YouTube Premium", color: "#FF0000", tag: PlatformTag::Streaming }),
    ("youtube premium", PlatformInfo { name: "YouTube Premium", color: "#FF0000", tag: PlatformTag::Streaming }),
    ("youtube", PlatformInfo { name: "YouTube", color: "#FF0000", tag: PlatformTag::Social }),
    ("tiktok", PlatformInfo { name: "TikTok", color: "#010101", tag: PlatformTag::Social }),
    ("instagram", PlatformInfo { name: "Instagram", color: "#E4405F", tag: PlatformTag::Social }),
    ("facebook", PlatformInfo { name: "Facebook", color: "#1877F2", tag: PlatformTag::Social }),
    ("meta", PlatformInfo { name: "Meta", color: "#1877F2", tag: PlatformTag::Social }),
    ("google", PlatformInfo { name: "Google", color: "#4285F4", tag: PlatformTag::Social }),
    ("xandrie", PlatformInfo { name: "Qobuz", color: "#1A8FE3", tag: PlatformTag::Streaming }),
    ("qobuz", PlatformInfo { name: "Qobuz", color: "#1A8FE3", tag: PlatformTag::Streaming }),
    ("soundcloud", PlatformInfo { name: "SoundCloud", color: "#FF5500", tag: PlatformTag::Streaming }),
    ("netflix", PlatformInfo { name: "Netflix", color: "#E50914", tag: PlatformTag::Streaming }),
    ("itunes store", PlatformInfo { name: "iTunes Store", color: "#FB5BC5", tag: PlatformTag::Download }),
    ("itunes", PlatformInfo { name: "iTunes", color: "#FB5BC5", tag: PlatformTag::Download }),
    ("pandora", PlatformInfo { name: "Pandora", color: "#005483", tag: PlatformTag::Streaming }),
    ("shazam", PlatformInfo { name: "Shazam", color: "#0088FF", tag: PlatformTag::Other }),
    ("napster", PlatformInfo { name: "Napster", color: "#000000", tag: PlatformTag::Streaming }),
    ("rhapsody", PlatformInfo { name: "Napster", color: "#000000", tag: PlatformTag::Streaming }),
    ("awa", PlatformInfo { name: "AWA", color: "#FC4E51", tag: PlatformTag::Streaming }),
    ("anghami", PlatformInfo { name: "Anghami", color: "#7B2BFC", tag: PlatformTag::Streaming }),
    ("peloton", PlatformInfo { name: "Peloton", color: "#D42A2A", tag: PlatformTag::Other }),
    ("snapchat", PlatformInfo { name: "Snapchat", color: "#FFFC00", tag: PlatformTag::Social }),
    ("snap", PlatformInfo { name: "Snapchat", color: "#FFFC00", tag: PlatformTag::Social }),
    ("audiomack", PlatformInfo { name: "Audiomack", color: "#FAA61A", tag: PlatformTag::Streaming }),
    ("media net", PlatformInfo { name: "MediaNet", color: "#333333", tag: PlatformTag::Streaming }),
    ("medianet", PlatformInfo { name: "MediaNet", color: "#333333", tag: PlatformTag::Streaming }),
    ("iheartradio", PlatformInfo { name: "iHeartRadio", color: "#C6002B", tag: PlatformTag::Radio }),
    ("iheart", PlatformInfo { name: "iHeartRadio", color: "#C6002B", tag: PlatformTag::Radio }),
    ("touchtunes", PlatformInfo { name: "TouchTunes", color: "#FF6B35", tag: PlatformTag::Other }),
    ("jiosaavn", PlatformInfo { name: "JioSaavn", color: "#2BC5B4", tag: PlatformTag::Streaming }),
    ("saavn", PlatformInfo { name: "JioSaavn", color: "#2BC5B4", tag: PlatformTag::Streaming }),
    ("boomplay", PlatformInfo { name: "Boomplay", color: "#F24C27", tag: PlatformTag::Streaming }),
    ("netease", PlatformInfo { name: "NetEase", color: "#C20C0C", tag: PlatformTag::Streaming }),
    ("tencent", PlatformInfo { name: "Tencent Music", color: "#1DB954", tag: PlatformTag::Streaming }),
    ("hoopla", PlatformInfo { name: "Hoopla", color: "#E8541E", tag: PlatformTag::Streaming }),
    ("resso", PlatformInfo { name: "Resso", color: "#25F4EE", tag: PlatformTag::Streaming }),
];

/// Distributor retailer labels → canonical platform key. Exact lookup keys,
/// lower-cased. The values are keys of `PLATFORM_TABLE`.
const RETAILER_TABLE: &[(&str, &str)] = &[
    ("spotify", "spotify"),
    ("apple music", "apple music"),
    ("itunes", "itunes"),
    ("itunes store", "itunes"),
    ("itunes & apple music", "apple music"),
    ("deezer", "deezer"),
    ("tidal", "tidal"),
    ("amazon music unlimited", "amazon"),
    ("amazon music", "amazon"),
    ("amazon ad supported", "amazon"),
    ("amazon ad-supported", "amazon"),
    ("amazon prime", "amazon"),
    ("amazon", "amazon"),
    ("youtube", "youtube"),
    ("youtube premium", "youtube music"),
    ("youtube music", "youtube music"),
    ("youtube red", "youtube music"),
    ("youtube ad supported", "youtube"),
    ("youtube ad-supported", "youtube"),
    ("youtube music premium", "youtube music"),
    ("tiktok", "tiktok"),
    ("facebook", "facebook"),
    ("instagram", "instagram"),
    ("meta", "meta"),
    ("google play", "google"),
    ("google", "google"),
    ("soundcloud", "soundcloud"),
    ("pandora", "pandora"),
    ("shazam", "shazam"),
    ("napster", "napster"),
    ("rhapsody", "napster"),
    ("qobuz", "qobuz"),
    ("xandrie", "qobuz"),
    ("audiomack", "audiomack"),
    ("anghami", "anghami"),
    ("boomplay", "boomplay"),
    ("jiosaavn", "jiosaavn"),
    ("saavn", "jiosaavn"),
    ("netease", "netease"),
    ("tencent", "tencent"),
    ("iheartradio", "iheartradio"),
    ("iheart", "iheartradio"),
    ("awa", "awa"),
    ("snap", "snapchat"),
    ("snapchat", "snapchat"),
    ("peloton", "peloton"),
    ("media net", "medianet"),
    ("medianet", "medianet"),
    ("netflix", "netflix"),
    ("hoopla", "hoopla"),
    ("resso", "resso"),
];

/// Identify a platform from a society licensee/sender string.
/// Returns `None` when nothing matches (caller falls back to the raw name).
pub fn identify_platform(raw: &str) -> Option<&'static PlatformInfo> {
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_lowercase();
    PLATFORM_TABLE
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, info)| info)
}

/// Canonical platform key for a society platform display string: the first
/// matching table fragment, folded through the retailer alias table so that
/// "amazon music", "amazon prime" and "amazon ad" all collapse onto one key.
/// Unmatched names fall back to the lower-cased raw string.
pub fn canonical_platform_key(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    for (key, _) in PLATFORM_TABLE {
        if lower.contains(key) {
            // Alias fold keeps the society key space identical to the
            // distributor key space; without it "amazon music" (society)
            // and "amazon" (distributor) would never pair up.
            return normalize_retailer(key);
        }
    }
    lower
}

/// Normalize a distributor retailer label onto the shared canonical key
/// space. Exact match first, then bidirectional substring match, else the
/// lower-cased raw string. Empty input → "unknown".
pub fn normalize_retailer(retailer: &str) -> String {
    let lower = retailer.trim().to_lowercase();
    if lower.is_empty() {
        return "unknown".to_string();
    }
    if let Some((_, canonical)) = RETAILER_TABLE.iter().find(|(key, _)| *key == lower) {
        return (*canonical).to_string();
    }
    for (key, canonical) in RETAILER_TABLE {
        if lower.contains(key) || key.contains(lower.as_str()) {
            return (*canonical).to_string();
        }
    }
    lower
}

/// Display name for a canonical key or raw platform string.
pub fn platform_display_name(raw: &str) -> String {
    identify_platform(raw)
        .map(|info| info.name.to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn platform_color(raw: &str) -> &'static str {
    identify_platform(raw).map(|info| info.color).unwrap_or("#6b7280")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_identification() {
        assert_eq!(identify_platform("Spotify AB").unwrap().name, "Spotify");
        assert_eq!(identify_platform("YT YouTube Music Premium").unwrap().name, "YouTube Music");
        assert!(identify_platform("Dorfmusikverein Hintertupfing").is_none());
        assert!(identify_platform("").is_none());
    }

    #[test]
    fn canonical_keys_are_shared_across_sources() {
        // Society licensee and distributor retailer land on one key.
        assert_eq!(canonical_platform_key("Amazon Music GmbH"), "amazon");
        assert_eq!(normalize_retailer("Amazon Ad-Supported"), "amazon");

        assert_eq!(canonical_platform_key("Spotify AB"), "spotify");
        assert_eq!(normalize_retailer("Spotify"), "spotify");

        assert_eq!(canonical_platform_key("YouTube Music"), "youtube music");
        assert_eq!(normalize_retailer("YouTube Music Premium"), "youtube music");
    }

    #[test]
    fn retailer_exact_before_substring() {
        assert_eq!(normalize_retailer("iTunes & Apple Music"), "apple music");
        assert_eq!(normalize_retailer("YouTube Premium"), "youtube music");
        assert_eq!(normalize_retailer("Xandrie"), "qobuz");
    }

    #[test]
    fn retailer_fallbacks() {
        assert_eq!(normalize_retailer(""), "unknown");
        assert_eq!(normalize_retailer("Some Local Webshop"), "some local webshop");
    }

    #[test]
    fn display_name_falls_back_to_raw() {
        assert_eq!(platform_display_name("spotify"), "Spotify");
        assert_eq!(platform_display_name("Radio Ehrenfeld"), "Radio Ehrenfeld");
    }
}
