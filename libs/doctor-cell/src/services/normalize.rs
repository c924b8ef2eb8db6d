use chrono::NaiveDate;
use tracing::debug;

/// Fuzzy normalization of free-text doctor / location / DOB input against
/// the clinic's fixed reference lists. Returning `None` is an expected
/// outcome that callers treat as a hard precondition failure.
pub trait Normalizer {
    fn normalize_doctor(&self, input: &str) -> Option<String>;
    fn normalize_location(&self, input: &str) -> Option<String>;
    fn parse_dob(&self, input: &str) -> Option<NaiveDate>;
}

const DOCTOR_THRESHOLD: f64 = 0.65;
const LOCATION_THRESHOLD: f64 = 0.60;

const DOB_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Default normalizer backed by the clinic's roster and sites.
pub struct ClinicDirectory {
    doctors: Vec<String>,
    locations: Vec<String>,
}

impl Default for ClinicDirectory {
    fn default() -> Self {
        Self {
            doctors: vec![
                "Dr. Priya Rao".to_string(),
                "Dr. Mehul Shah".to_string(),
                "Dr. Ananya Iyer".to_string(),
            ],
            locations: vec![
                "MG Road Clinic".to_string(),
                "HSR Layout Clinic".to_string(),
                "Indiranagar Clinic".to_string(),
            ],
        }
    }
}

impl ClinicDirectory {
    pub fn new(doctors: Vec<String>, locations: Vec<String>) -> Self {
        Self { doctors, locations }
    }

    fn best_match<'a>(input: &str, candidates: &'a [String], threshold: f64) -> Option<&'a str> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut best: Option<(&str, f64)> = None;
        for candidate in candidates {
            let score = similarity(input, candidate);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) if score > threshold => {
                debug!("'{}' normalized to '{}' (score {:.2})", input, candidate, score);
                Some(candidate)
            }
            Some((candidate, score)) => {
                debug!("'{}' rejected: best '{}' scored {:.2}", input, candidate, score);
                None
            }
            None => None,
        }
    }
}

impl Normalizer for ClinicDirectory {
    fn normalize_doctor(&self, input: &str) -> Option<String> {
        Self::best_match(input, &self.doctors, DOCTOR_THRESHOLD).map(str::to_string)
    }

    fn normalize_location(&self, input: &str) -> Option<String> {
        Self::best_match(input, &self.locations, LOCATION_THRESHOLD).map(str::to_string)
    }

    fn parse_dob(&self, input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        DOB_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
    }
}

/// Similarity in [0, 1]. A substring hit scores high so partial inputs
/// like "priya" still resolve; otherwise normalized edit distance.
fn similarity(input: &str, candidate: &str) -> f64 {
    let a = input.to_lowercase();
    let b = candidate.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.len() >= 3 && b.contains(&a) {
        return 0.9;
    }

    let dist = edit_distance(&a, &b) as f64;
    let len_sum = (a.chars().count() + b.chars().count()) as f64;
    if len_sum == 0.0 {
        return 0.0;
    }
    (len_sum - 2.0 * dist).max(0.0) / len_sum
}

/// Levenshtein edit distance, two-row rolling buffer.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if n == 0 {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
