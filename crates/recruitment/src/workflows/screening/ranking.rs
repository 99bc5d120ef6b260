use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::store::ClassificationMap;

/// One candidate's position inside an area bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub area: String,
    #[serde(rename = "cv")]
    pub candidate: String,
    #[serde(rename = "puntaje")]
    pub score: usize,
}

/// Candidates of a single area sorted by score, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRanking {
    pub area: String,
    pub entries: Vec<RankingEntry>,
}

#[derive(Serialize)]
struct BucketItem<'a> {
    cv: &'a str,
    puntaje: usize,
}

/// Per-area rankings, buckets ordered by first appearance in the classification map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    buckets: Vec<AreaRanking>,
}

impl Ranking {
    pub fn buckets(&self) -> &[AreaRanking] {
        &self.buckets
    }

    pub fn bucket(&self, area: &str) -> Option<&AreaRanking> {
        self.buckets.iter().find(|bucket| bucket.area == area)
    }

    /// Flat `(area, candidate, score)` rows in bucket order then rank order.
    pub fn rows(&self) -> impl Iterator<Item = &RankingEntry> {
        self.buckets.iter().flat_map(|bucket| bucket.entries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            let items: Vec<BucketItem<'_>> = bucket
                .entries
                .iter()
                .map(|entry| BucketItem {
                    cv: &entry.candidate,
                    puntaje: entry.score,
                })
                .collect();
            map.serialize_entry(&bucket.area, &items)?;
        }
        map.end()
    }
}

/// Number of distinct defined areas among `labels`.
pub fn candidate_score<S: AsRef<str>>(labels: &[String], defined_areas: &[S]) -> usize {
    let mut counted: Vec<&str> = Vec::new();
    for label in labels {
        let label = label.as_str();
        if is_defined(label, defined_areas) && !counted.contains(&label) {
            counted.push(label);
        }
    }
    counted.len()
}

fn is_defined<S: AsRef<str>>(label: &str, defined_areas: &[S]) -> bool {
    defined_areas.iter().any(|area| area.as_ref() == label)
}

/// Builds the per-area ranking.
///
/// A candidate's score is computed once from all of its labels and the same value is
/// reused in every bucket the candidate lands in. Labels that are not defined areas
/// (such as the unclassified fallback or areas removed from the rule set) neither score
/// nor open a bucket. Buckets are stably sorted, so equal scores keep map order.
pub fn rank<S: AsRef<str>>(classifications: &ClassificationMap, defined_areas: &[S]) -> Ranking {
    let mut buckets: Vec<AreaRanking> = Vec::new();

    for entry in classifications.iter() {
        let score = candidate_score(&entry.areas, defined_areas);
        let mut placed: Vec<&str> = Vec::new();

        for label in &entry.areas {
            let label = label.as_str();
            if !is_defined(label, defined_areas) || placed.contains(&label) {
                continue;
            }
            placed.push(label);

            let ranked = RankingEntry {
                area: label.to_string(),
                candidate: entry.filename.clone(),
                score,
            };
            match buckets.iter_mut().find(|bucket| bucket.area == label) {
                Some(bucket) => bucket.entries.push(ranked),
                None => buckets.push(AreaRanking {
                    area: label.to_string(),
                    entries: vec![ranked],
                }),
            }
        }
    }

    for bucket in &mut buckets {
        bucket.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }

    Ranking { buckets }
}
