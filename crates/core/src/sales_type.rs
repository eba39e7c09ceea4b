//! Distributor sales-description classifier.

use crate::entry::SalesType;

/// Classify a free-form sales description ("Streaming (Ad-Supported)",
/// "Permanent Download", …) into the canonical [`SalesType`]. Exact table
/// lookup first, then a keyword cascade, fallback `Other`.
pub fn classify_sales_type(description: &str) -> SalesType {
    let lower = description.trim().to_lowercase();
    if lower.is_empty() {
        return SalesType::Other;
    }

    if let Some(exact) = exact_lookup(&lower) {
        return exact;
    }

    if lower.contains("ad-supported") || lower.contains("ad supported") || lower.contains("free") {
        return SalesType::StreamingAd;
    }
    if lower.contains("subscription") || lower.contains("premium") {
        return SalesType::StreamingSubscription;
    }
    if lower.contains("video") {
        return SalesType::StreamingVideo;
    }
    if lower.contains("download") && lower.contains("album") {
        return SalesType::DownloadAlbum;
    }
    if lower.contains("download") {
        return SalesType::DownloadTrack;
    }
    if lower.contains("stream") {
        return SalesType::StreamingSubscription;
    }

    SalesType::Other
}

fn exact_lookup(lower: &str) -> Option<SalesType> {
    let sales_type = match lower {
        "streaming (subscription)" | "streaming subscription" | "subscription streaming"
        | "stream" | "streaming" => SalesType::StreamingSubscription,
        "streaming (ad-supported)" | "streaming ad-supported" | "ad-supported streaming" => {
            SalesType::StreamingAd
        }
        "download (track)" | "download track" | "download" | "permanent download" => {
            SalesType::DownloadTrack
        }
        "download (album)" | "download album" => SalesType::DownloadAlbum,
        "streaming (video)" | "video" | "music video" => SalesType::StreamingVideo,
        "ringtone" | "other" => SalesType::Other,
        _ => return None,
    };
    Some(sales_type)
}
