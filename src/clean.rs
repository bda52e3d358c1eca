use crate::models::{modality, JobOffer};

/// Raw study-level phrasings seen on the two boards, mapped to canonical
/// tiers. Open vocabulary: anything not listed here passes through unchanged,
/// and adding a new phrasing is a one-line change.
const STUDY_LEVELS: [(&str, &str); 17] = [
    ("Master or PhD", "bac+5 or bac+7"),
    ("Bachelor (4 years)", "bac+4"),
    ("High school diploma with Bac+2 or plus", "bac+2"),
    ("Master's Degree", "bac+5"),
    ("Master's Degree or equivalent experience", "bac+5"),
    ("Qualification avant bac", "< bac"),
    (
        "Qualification avant bac, Bac, Bac+1 & Bac+2",
        "< bac, bac, bac+1, bac+2",
    ),
    ("Secondary education", "> bac"),
    ("Bachelor (BA, BSc)", "bac+3"),
    ("Associate (AA, AS)", "bac+2"),
    ("High school diploma", "bac"),
    (
        "Bac+2, Bac+3, Bac+4 & Bac+5 et plus",
        "bac+2, bac+3, bac+4, bac+5 et plus",
    ),
    ("Bac+3, Bac+4 & Bac+5 et plus", "bac+3, bac+4, bac+5 et plus"),
    ("Bac+4 & Bac+5 et plus", "bac+4, bac+5 et plus"),
    ("Bac+5 et plus", "bac+5 et plus"),
    ("Doctorat", "bac+8"),
    ("Bac+2 & Bac+3", "bac+2, bac+3"),
];

fn canonical_study_level(raw: &str) -> Option<&'static str> {
    STUDY_LEVELS
        .iter()
        .find(|(phrase, _)| *phrase == raw)
        .map(|(_, tier)| *tier)
}

/// Canonicalize the whole batch in place, once all pages are collected:
/// study levels through the vocabulary table, missing flexible_hours to 0,
/// the modality sentinel to None. Idempotent, so re-running a cleaned
/// artifact through this pass is harmless.
pub fn normalize(offers: &mut [JobOffer]) {
    for offer in offers.iter_mut() {
        if let Some(level) = offer.study_level.as_deref() {
            if let Some(tier) = canonical_study_level(level) {
                offer.study_level = Some(tier.to_string());
            }
        }
        if offer.flexible_hours.is_none() {
            offer.flexible_hours = Some(0);
        }
        if offer.modality.as_deref() == Some(modality::NOT_SPECIFIED) {
            offer.modality = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_with_level(level: &str) -> JobOffer {
        let mut offer = JobOffer::new();
        offer.study_level = Some(level.to_string());
        offer
    }

    #[test]
    fn test_every_table_entry_maps_exactly() {
        for (raw, tier) in STUDY_LEVELS {
            let mut batch = vec![offer_with_level(raw)];
            normalize(&mut batch);
            assert_eq!(batch[0].study_level.as_deref(), Some(tier), "for {raw:?}");
        }
    }

    #[test]
    fn test_doctorat_maps_to_bac8() {
        let mut batch = vec![offer_with_level("Doctorat")];
        normalize(&mut batch);
        assert_eq!(batch[0].study_level.as_deref(), Some("bac+8"));
    }

    #[test]
    fn test_unknown_study_level_passes_through() {
        let mut batch = vec![offer_with_level("Formation continue")];
        normalize(&mut batch);
        assert_eq!(batch[0].study_level.as_deref(), Some("Formation continue"));
    }

    #[test]
    fn test_missing_flexible_hours_becomes_zero() {
        let mut batch = vec![JobOffer::new()];
        normalize(&mut batch);
        assert_eq!(batch[0].flexible_hours, Some(0));
    }

    #[test]
    fn test_present_flexible_hours_untouched() {
        let mut offer = JobOffer::new();
        offer.flexible_hours = Some(1);
        let mut batch = vec![offer];
        normalize(&mut batch);
        assert_eq!(batch[0].flexible_hours, Some(1));
    }

    #[test]
    fn test_modality_sentinel_becomes_none() {
        let mut offer = JobOffer::new();
        offer.modality = Some(modality::NOT_SPECIFIED.to_string());
        offer.flexible_hours = Some(0);
        let mut batch = vec![offer];
        normalize(&mut batch);
        assert_eq!(batch[0].modality, None);
        assert_eq!(batch[0].flexible_hours, Some(0));
    }

    #[test]
    fn test_real_modality_untouched() {
        let mut offer = JobOffer::new();
        offer.modality = Some(modality::HYBRID.to_string());
        let mut batch = vec![offer];
        normalize(&mut batch);
        assert_eq!(batch[0].modality.as_deref(), Some(modality::HYBRID));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut offer = offer_with_level("Master's Degree");
        offer.modality = Some(modality::NOT_SPECIFIED.to_string());
        let mut once = vec![offer, offer_with_level("Bac+5 et plus"), JobOffer::new()];

        normalize(&mut once);
        let mut twice = once.clone();
        normalize(&mut twice);

        assert_eq!(once, twice);
    }
}
