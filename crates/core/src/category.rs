//! Society category (Sparte) and role reference tables.
//!
//! The society labels revenue with either a short abbreviation ("MOD S",
//! "GOP", "FS VR") or, in the compact statement format, a numeric/alpha
//! category code ("12", "R5", "ME01"). Both spaces map onto the same
//! canonical [`CategoryGroup`]. Lookups are total: unknown codes resolve to
//! `Other`.

use crate::entry::CategoryGroup;

/// Map a raw category code or abbreviation to its canonical group.
/// Exact match first, then upper-cased, else `Other`.
pub fn category_group_for(code: &str) -> CategoryGroup {
    let trimmed = code.trim();
    if let Some(group) = lookup_group(trimmed) {
        return group;
    }
    lookup_group(&trimmed.to_uppercase()).unwrap_or(CategoryGroup::Other)
}

fn lookup_group(code: &str) -> Option<CategoryGroup> {
    use CategoryGroup::*;
    let group = match code {
        // Online: streaming
        "MOD S" | "MOD S VR" | "VOD S" | "VOD S VR" => Streaming,
        // Online: download (KMOD = ringtones)
        "MOD D" | "MOD D VR" | "VOD D" | "VOD D VR" | "KMOD" | "KMOD VR" => Download,
        // Online: mixed/social platforms (GOP = YouTube, TikTok etc.)
        "GOP" | "GOP VR" | "WEB" | "WEB VR" => SocialPlatforms,
        // Radio, incl. grand rights
        "R" | "R VR" | "R GR" | "R GR VR" => Radio,
        // Television, cinema and sound film
        "FS" | "FS VR" | "FS GR" | "FS GR VR" | "T" | "T FS" | "T FS VR" | "TD" | "TD VR" => {
            Television
        }
        // Broadcaster media libraries, kept distinct from TV for analysis
        "MED" | "MED VR" => MediaLibraries,
        // Live performance and playback
        "U" | "UD" | "M" | "M UD" | "MD" | "E" | "ED" | "EM" | "BM" | "DK" | "DK VR" => Live,
        // Physical carriers
        "PHONO VR" | "BT VR" => Physical,
        "A" | "A VR" => International,
        // Supplements
        "ZSL" => Other,

        // Compact-format category codes: live
        "D2" | "E1" | "E2" | "E7" | "E8" | "U1" | "U2" | "U7" | "U8" | "M1" => Live,
        // Radio codes
        "R1" | "R2" | "R3" | "R4" => Radio,
        // TV / film codes
        "R5" | "R6" | "R7" | "R8" | "T1" | "T2" | "T3" | "T4" | "T7" => Television,
        "ME01" | "ME02" => MediaLibraries,
        // Online codes
        "10" | "11" | "14" | "15" | "28" | "29" => Download,
        "12" | "13" | "16" | "17" => Streaming,
        "18" | "19" | "26" | "27" => SocialPlatforms,
        "20" | "25" => Physical,
        "30" | "40" => International,
        _ => return None,
    };
    Some(group)
}

/// Resolve a compact-format category code to its display abbreviation
/// ("12" → "MOD S"). Codes that already are abbreviations are not listed.
pub fn abbreviation_for_code(code: &str) -> Option<&'static str> {
    let abbr = match code.trim() {
        "DK" => "DK",
        "D2" => "DK VR",
        "E1" => "E",
        "E2" => "BM",
        "E7" => "EM",
        "E8" => "ED",
        "R1" => "R",
        "R2" => "R VR",
        "R3" => "R GR",
        "R4" => "R GR VR",
        "R5" => "FS",
        "R6" => "FS VR",
        "R7" => "FS GR",
        "R8" => "FS GR VR",
        "T1" => "T",
        "T2" => "TD",
        "T3" => "T FS",
        "T4" => "T FS VR",
        "T7" => "TD VR",
        "U1" => "U",
        "U2" => "M",
        "U7" => "M UD",
        "U8" => "UD",
        "M1" => "MD",
        "10" => "MOD D",
        "11" => "MOD D VR",
        "12" => "MOD S",
        "13" => "MOD S VR",
        "14" => "VOD D",
        "15" => "VOD D VR",
        "16" => "VOD S",
        "17" => "VOD S VR",
        "18" => "GOP",
        "19" => "GOP VR",
        "20" => "PHONO VR",
        "25" => "BT VR",
        "26" => "WEB",
        "27" => "WEB VR",
        "28" => "KMOD",
        "29" => "KMOD VR",
        "30" => "A VR",
        "40" => "A",
        "ME01" => "MED",
        "ME02" => "MED VR",
        _ => return None,
    };
    Some(abbr)
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Professional-category codes (0-9) used by the compact statement format.
pub fn role_for_professional_category(code: &str) -> Option<&'static str> {
    let role = match code.trim() {
        "0" => "VG",       // collecting society itself
        "1" | "6" => "K",  // composer (6 = special account)
        "2" | "7" => "B",  // arranger
        "3" | "8" => "T",  // author/lyricist
        "4" | "5" | "9" => "V", // publisher (5 = theatrical)
        _ => return None,
    };
    Some(role)
}

/// Role codes (0-5) used by the detail statement formats.
pub fn role_for_role_code(code: &str) -> Option<&'static str> {
    let role = match code.trim() {
        "0" => "VG",
        "1" => "K",
        "2" => "B",
        "3" => "T",
        "4" | "5" => "V",
        _ => return None,
    };
    Some(role)
}

/// Legacy German text role names.
pub fn role_for_text(name: &str) -> Option<&'static str> {
    let role = match name.trim().to_lowercase().as_str() {
        "komponist" => "K",
        "textdichter" => "T",
        "bearbeiter" => "B",
        "verleger" | "verlag" => "V",
        _ => return None,
    };
    Some(role)
}

pub fn role_label(role: &str) -> &'static str {
    match role {
        "K" => "Komponist",
        "T" => "Textdichter",
        "V" => "Verleger",
        "B" => "Bearbeiter",
        "VG" => "Verwertungsgesellschaft",
        _ => "Unbekannt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_map_to_groups() {
        assert_eq!(category_group_for("MOD S"), CategoryGroup::Streaming);
        assert_eq!(category_group_for("GOP"), CategoryGroup::SocialPlatforms);
        assert_eq!(category_group_for("FS VR"), CategoryGroup::Television);
        assert_eq!(category_group_for("PHONO VR"), CategoryGroup::Physical);
        assert_eq!(category_group_for("A"), CategoryGroup::International);
    }

    #[test]
    fn numeric_codes_map_to_groups() {
        assert_eq!(category_group_for("12"), CategoryGroup::Streaming);
        assert_eq!(category_group_for("18"), CategoryGroup::SocialPlatforms);
        assert_eq!(category_group_for("R5"), CategoryGroup::Television);
        assert_eq!(category_group_for("ME01"), CategoryGroup::MediaLibraries);
    }

    #[test]
    fn case_normalized_fallback() {
        // "Phono VR" appears in some legacy exports with mixed case.
        assert_eq!(category_group_for("Phono VR"), CategoryGroup::Physical);
        assert_eq!(category_group_for("mod s"), CategoryGroup::Streaming);
    }

    #[test]
    fn unknown_codes_are_other_never_panic() {
        assert_eq!(category_group_for(""), CategoryGroup::Other);
        assert_eq!(category_group_for("XYZZY"), CategoryGroup::Other);
        assert_eq!(category_group_for("99"), CategoryGroup::Other);
        assert_eq!(category_group_for("ZSL"), CategoryGroup::Other);
    }

    #[test]
    fn code_to_abbreviation() {
        assert_eq!(abbreviation_for_code("12"), Some("MOD S"));
        assert_eq!(abbreviation_for_code("R5"), Some("FS"));
        assert_eq!(abbreviation_for_code("XX"), None);
    }

    #[test]
    fn role_resolution() {
        assert_eq!(role_for_professional_category("1"), Some("K"));
        assert_eq!(role_for_professional_category("9"), Some("V"));
        assert_eq!(role_for_role_code("3"), Some("T"));
        assert_eq!(role_for_text("Verleger"), Some("V"));
        assert_eq!(role_for_text("komponist"), Some("K"));
        assert_eq!(role_for_text("dj"), None);
    }
}
