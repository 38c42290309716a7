// Rank tiers: maps a skill rating to its named competitive band.

/// A named rank band and the minimum SR needed to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTier {
    pub name: &'static str,
    pub min: i64,
}

/// Label used when a player has no usable SR.
pub const UNRANKED: &str = "Unranked";

/// Tier table, highest band first.
pub const RANKS: [RankTier; 19] = [
    RankTier { name: "Iridescent", min: 10000 },
    RankTier { name: "Crimson III", min: 9100 },
    RankTier { name: "Crimson II", min: 8300 },
    RankTier { name: "Crimson I", min: 7500 },
    RankTier { name: "Diamond III", min: 6800 },
    RankTier { name: "Diamond II", min: 6100 },
    RankTier { name: "Diamond I", min: 5400 },
    RankTier { name: "Platinum III", min: 4800 },
    RankTier { name: "Platinum II", min: 4200 },
    RankTier { name: "Platinum I", min: 3600 },
    RankTier { name: "Gold III", min: 3100 },
    RankTier { name: "Gold II", min: 2600 },
    RankTier { name: "Gold I", min: 2100 },
    RankTier { name: "Silver III", min: 1700 },
    RankTier { name: "Silver II", min: 1300 },
    RankTier { name: "Silver I", min: 900 },
    RankTier { name: "Bronze III", min: 600 },
    RankTier { name: "Bronze II", min: 300 },
    RankTier { name: "Bronze I", min: 0 },
];

/// Name of the tier for `score`.
///
/// Absent or NaN scores are `"Unranked"`. A score below every threshold
/// (only possible for negative values) falls back to the lowest tier.
pub fn classify(score: Option<f64>) -> &'static str {
    let Some(score) = score.filter(|s| !s.is_nan()) else {
        return UNRANKED;
    };
    RANKS
        .iter()
        .find(|tier| score >= tier.min as f64)
        .map(|tier| tier.name)
        .unwrap_or(RANKS[RANKS.len() - 1].name)
}

/// Convenience wrapper for integer SR values as parsed from sheets.
pub fn classify_sr(sr: Option<i64>) -> &'static str {
    classify(sr.map(|v| v as f64))
}

/// Position of a tier counted from the bottom (`Bronze I` = 0). `None` for
/// names outside the table, including `"Unranked"`.
pub fn tier_index(name: &str) -> Option<usize> {
    RANKS
        .iter()
        .position(|tier| tier.name == name)
        .map(|pos| RANKS.len() - 1 - pos)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_strictly_descending() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].min > pair[1].min, "{:?} vs {:?}", pair[0], pair[1]);
        }
        assert_eq!(RANKS[RANKS.len() - 1].min, 0);
    }

    #[test]
    fn absent_and_nan_are_unranked() {
        assert_eq!(classify(None), "Unranked");
        assert_eq!(classify(Some(f64::NAN)), "Unranked");
        assert_eq!(classify_sr(None), "Unranked");
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(classify(Some(0.0)), "Bronze I");
        assert_eq!(classify(Some(299.0)), "Bronze I");
        assert_eq!(classify(Some(300.0)), "Bronze II");
        assert_eq!(classify(Some(2100.0)), "Gold I");
        assert_eq!(classify(Some(5399.0)), "Platinum III");
        assert_eq!(classify(Some(5400.0)), "Diamond I");
        assert_eq!(classify(Some(9999.0)), "Crimson III");
        assert_eq!(classify(Some(10000.0)), "Iridescent");
        assert_eq!(classify(Some(250000.0)), "Iridescent");
    }

    #[test]
    fn every_boundary_maps_to_its_own_tier() {
        for tier in RANKS.iter() {
            assert_eq!(classify_sr(Some(tier.min)), tier.name);
        }
    }

    #[test]
    fn negative_score_falls_back_to_lowest_tier() {
        assert_eq!(classify(Some(-1.0)), "Bronze I");
        assert_eq!(classify(Some(f64::NEG_INFINITY)), "Bronze I");
    }

    #[test]
    fn classification_is_monotonic() {
        let mut last = 0;
        for sr in (0..=12_000).step_by(25) {
            let idx = tier_index(classify_sr(Some(sr))).expect("known tier");
            assert!(idx >= last, "tier dropped at sr {sr}");
            last = idx;
        }
        assert_eq!(last, RANKS.len() - 1);
    }

    #[test]
    fn tier_index_unknown_names() {
        assert_eq!(tier_index("Bronze I"), Some(0));
        assert_eq!(tier_index("Iridescent"), Some(18));
        assert_eq!(tier_index("Unranked"), None);
    }
}
