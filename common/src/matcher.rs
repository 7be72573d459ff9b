//! 名簿照合
//!
//! 1. 名簿が空 → NoReferenceData
//! 2. 完全一致 → ExactMatch
//! 3. 挿入順に走査し、類似度が閾値以上の最初のエントリ → PossibleTypo
//! 4. それ以外 → NoMatch
//!
//! 3 は「最良」ではなく「最初」の候補を返す。走査順は名簿の挿入順で固定。

use crate::directory::ReferenceDirectory;
use crate::error::{Error, Result};
use crate::similarity;
use crate::types::{DecodedEvent, DirectoryEntry, MatchNote, MatchResult, PlateString};
use serde::{Deserialize, Serialize};

/// 類似度の既定閾値
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// 照合オプション
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    /// この値以上で誤認識候補とみなす（境界を含む）
    pub similarity_threshold: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl MatchOptions {
    pub fn with_threshold(similarity_threshold: f64) -> Result<Self> {
        let options = Self { similarity_threshold };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(Error::Config(format!(
                "similarity threshold must be within 0.0..=1.0, got {}",
                t
            )));
        }
        Ok(())
    }
}

/// 名簿を借用して照合するエンジン
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'a> {
    directory: &'a ReferenceDirectory,
    options: MatchOptions,
}

impl<'a> MatchEngine<'a> {
    pub fn new(directory: &'a ReferenceDirectory, options: MatchOptions) -> Self {
        Self { directory, options }
    }

    /// 1イベントを照合（失敗はすべて `note` で表現）
    pub fn resolve(&self, event: &DecodedEvent) -> MatchResult {
        let unmatched = |note| MatchResult {
            scan_time: event.scan_time,
            plate: event.plate.clone(),
            room_id: String::new(),
            occupant_name: String::new(),
            note,
        };

        if self.directory.is_empty() {
            return unmatched(MatchNote::NoReferenceData);
        }

        if let Some(entry) = self.directory.get(&event.plate) {
            return MatchResult {
                scan_time: event.scan_time,
                plate: event.plate.clone(),
                room_id: entry.room_id.clone(),
                occupant_name: entry.occupant_name.clone(),
                note: MatchNote::ExactMatch,
            };
        }

        match self.find_typo_candidate(&event.plate) {
            Some((entry, score)) => unmatched(MatchNote::PossibleTypo {
                candidate: entry.plate.clone(),
                score,
            }),
            None => unmatched(MatchNote::NoMatch),
        }
    }

    /// 閾値以上で、かつナンバーが異なる最初のエントリ
    fn find_typo_candidate(&self, plate: &PlateString) -> Option<(&'a DirectoryEntry, f64)> {
        let threshold = self.options.similarity_threshold;
        let plate_len = plate.char_len();

        self.directory.entries().iter().find_map(|entry| {
            if entry.plate == *plate {
                return None;
            }
            // 文字数だけで閾値に届かないものは計算しない（走査順は不変）
            if similarity::upper_bound(plate_len, entry.plate.char_len()) < threshold {
                return None;
            }
            let score = similarity::ratio(plate.as_str(), entry.plate.as_str());
            (score >= threshold).then_some((entry, score))
        })
    }
}

/// 1イベントを照合
pub fn resolve(
    event: &DecodedEvent,
    directory: &ReferenceDirectory,
    options: &MatchOptions,
) -> MatchResult {
    MatchEngine::new(directory, *options).resolve(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::ScanTime;

    fn entry(plate: &str, room: &str, name: &str) -> DirectoryEntry {
        DirectoryEntry {
            plate: PlateString::new(plate),
            room_id: room.into(),
            occupant_name: name.into(),
        }
    }

    fn event(plate: &str) -> DecodedEvent {
        DecodedEvent {
            scan_time: ScanTime::from_millis(1_700_000_000_000).unwrap(),
            plate: PlateString::new(plate),
        }
    }

    #[test]
    fn test_empty_directory_is_no_reference_data() {
        let directory = ReferenceDirectory::empty();
        let result = resolve(&event("AB123"), &directory, &MatchOptions::default());
        assert_eq!(result.note, MatchNote::NoReferenceData);
        assert!(result.room_id.is_empty());
    }

    #[test]
    fn test_exact_match_fills_fields() {
        let directory = ReferenceDirectory::from_entries(vec![entry("AB123", "101", "Smith")]);
        let result = resolve(&event("ab 123"), &directory, &MatchOptions::default());
        assert_eq!(result.note, MatchNote::ExactMatch);
        assert_eq!(result.room_id, "101");
        assert_eq!(result.occupant_name, "Smith");
    }

    #[test]
    fn test_exact_match_beats_earlier_near_duplicates() {
        let directory = ReferenceDirectory::from_entries(vec![
            entry("AB1234E", "1", "Near"),
            entry("AB12346", "2", "Near"),
            entry("AB12345", "3", "Exact"),
        ]);
        let result = resolve(&event("AB12345"), &directory, &MatchOptions::default());
        assert_eq!(result.note, MatchNote::ExactMatch);
        assert_eq!(result.room_id, "3");
    }

    #[test]
    fn test_possible_typo_seven_chars() {
        let directory = ReferenceDirectory::from_entries(vec![
            entry("ZZ99999", "9", "Other"),
            entry("AB12345", "101", "Smith"),
        ]);
        let result = resolve(&event("AB1234E"), &directory, &MatchOptions::default());
        match result.note {
            MatchNote::PossibleTypo { candidate, score } => {
                assert_eq!(candidate.as_str(), "AB12345");
                assert!((score - 12.0 / 14.0).abs() < 1e-9);
            }
            other => panic!("unexpected note: {:?}", other),
        }
        assert!(result.room_id.is_empty());
        assert!(result.occupant_name.is_empty());
    }

    #[test]
    fn test_one_char_off_five_chars_depends_on_threshold() {
        let directory = ReferenceDirectory::from_entries(vec![entry("AB123", "101", "Smith")]);

        let strict = resolve(&event("AB12E"), &directory, &MatchOptions::default());
        assert_eq!(strict.note, MatchNote::NoMatch);

        let relaxed = MatchOptions::with_threshold(0.8).unwrap();
        let result = resolve(&event("AB12E"), &directory, &relaxed);
        assert!(matches!(
            result.note,
            MatchNote::PossibleTypo { ref candidate, .. } if candidate.as_str() == "AB123"
        ));
    }

    #[test]
    fn test_threshold_boundary_inclusive() {
        let directory = ReferenceDirectory::from_entries(vec![entry("ABCDEFGHIJKLMNOPQRST", "1", "A")]);
        let scanned = event("ABCD1FGHI2KLMN3PQRST");

        let at = resolve(&scanned, &directory, &MatchOptions::with_threshold(0.85).unwrap());
        assert!(matches!(at.note, MatchNote::PossibleTypo { .. }));

        let above = resolve(&scanned, &directory, &MatchOptions::with_threshold(0.850001).unwrap());
        assert_eq!(above.note, MatchNote::NoMatch);
    }

    #[test]
    fn test_just_below_threshold_rejected() {
        // 16/19 一致 → 32/38 ≈ 0.842
        let directory = ReferenceDirectory::from_entries(vec![entry("ABCDEFGHIJKLMNOPQRS", "1", "A")]);
        let result = resolve(&event("ABCD1FGHI2KLMN3PQRS"), &directory, &MatchOptions::default());
        assert_eq!(result.note, MatchNote::NoMatch);
    }

    #[test]
    fn test_first_qualifying_candidate_wins() {
        // 2件目の方がスコアが高い（0.875 > 0.75）が、1件目を返す
        let directory = ReferenceDirectory::from_entries(vec![
            entry("ABCDEFXY", "1", "First"),
            entry("ABCDEFGX", "2", "Second"),
        ]);
        let options = MatchOptions::with_threshold(0.7).unwrap();
        let result = resolve(&event("ABCDEFGH"), &directory, &options);
        match result.note {
            MatchNote::PossibleTypo { candidate, score } => {
                assert_eq!(candidate.as_str(), "ABCDEFXY");
                assert!((score - 0.75).abs() < 1e-9);
            }
            other => panic!("unexpected note: {:?}", other),
        }
    }

    #[test]
    fn test_first_match_deterministic_with_equal_scores() {
        let directory = ReferenceDirectory::from_entries(vec![
            entry("AB12346", "1", "First"),
            entry("AB12347", "2", "Second"),
        ]);
        for _ in 0..3 {
            let result = resolve(&event("AB12345"), &directory, &MatchOptions::default());
            assert!(matches!(
                result.note,
                MatchNote::PossibleTypo { ref candidate, .. } if candidate.as_str() == "AB12346"
            ));
        }
    }

    #[test]
    fn test_no_match() {
        let directory = ReferenceDirectory::from_entries(vec![entry("XY9876", "5", "Doe")]);
        let result = resolve(&event("AB123"), &directory, &MatchOptions::default());
        assert_eq!(result.note, MatchNote::NoMatch);
    }

    #[test]
    fn test_length_pruning_keeps_results() {
        let directory = ReferenceDirectory::from_entries(vec![
            entry("A", "1", "Short"),
            entry("AB123456789", "2", "Long"),
            entry("AB12345", "3", "Close"),
        ]);
        let result = resolve(&event("AB1234E"), &directory, &MatchOptions::default());
        assert!(matches!(
            result.note,
            MatchNote::PossibleTypo { ref candidate, .. } if candidate.as_str() == "AB12345"
        ));
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(MatchOptions::with_threshold(1.5).is_err());
        assert!(MatchOptions::with_threshold(-0.1).is_err());
        assert!(MatchOptions::with_threshold(f64::NAN).is_err());
        assert!(MatchOptions::with_threshold(0.0).is_ok());
        assert!(MatchOptions::with_threshold(1.0).is_ok());
    }
}
