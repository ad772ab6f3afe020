use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Post;

pub const CAMPAIGN_HASHTAG: &str = "#Elecciones4M";

/// Posts known to be bookkeeping noise in the May 4th collection.
pub const NOISE_IDS: [i64; 11] = [
    1389714946599137283,
    1389714670081265669,
    1389714532499697667,
    1389715033786040322,
    1389714949367336965,
    1389714934095880192,
    1389714915737448451,
    1389714894241554438,
    1389714495413555202,
    1389715170969231361,
    1389715027356266502,
];

// Greedy up to the last colon of the line, like a retweet header "RT @user:".
static REPOST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RT.*:").expect("valid repost marker regex"));

const LINK_MARKERS: [&str; 2] = ["//t.co", "//t.c\u{2026}"];

/// Fixed inputs of the cleaning stage.
#[derive(Debug, Clone)]
pub struct CleaningRules {
    pub campaign_hashtag: String,
    pub noise_ids: HashSet<i64>,
}

impl CleaningRules {
    pub fn new(campaign_hashtag: impl Into<String>, noise_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            campaign_hashtag: campaign_hashtag.into(),
            noise_ids: noise_ids.into_iter().collect(),
        }
    }
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self::new(CAMPAIGN_HASHTAG, NOISE_IDS)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input: usize,
    pub dropped_empty: usize,
    pub dropped_links: usize,
    pub dropped_noise: usize,
    pub dropped_duplicates: usize,
    pub output: usize,
}

#[cfg(test)]
pub fn normalize(records: &[Post], rules: &CleaningRules) -> Result<Vec<Post>> {
    normalize_with_report(records, rules).map(|(records, _)| records)
}

/// Cleans post text and drops posts that carry no usable signal.
///
/// Text rewrites run first (repost header, line breaks, campaign hashtag),
/// then posts left with no text are excluded, then posts containing shortened
/// links, then noise ids, then duplicates of an earlier normalized text.
/// Input order is preserved.
pub fn normalize_with_report(
    records: &[Post],
    rules: &CleaningRules,
) -> Result<(Vec<Post>, CleaningReport)> {
    let mut report = CleaningReport {
        input: records.len(),
        ..Default::default()
    };
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut cleaned = Vec::with_capacity(records.len());

    for post in records {
        if post.text.is_empty() {
            return Err(AppError::InvalidRecord {
                location: format!("post {}", post.id),
                reason: "missing text".to_string(),
            });
        }

        let text = clean_text(&post.text, &rules.campaign_hashtag);

        if text.is_empty() {
            report.dropped_empty += 1;
            continue;
        }
        if contains_link(&text) {
            report.dropped_links += 1;
            continue;
        }
        if rules.noise_ids.contains(&post.id) {
            report.dropped_noise += 1;
            continue;
        }
        if !seen.insert(text.clone()) {
            report.dropped_duplicates += 1;
            continue;
        }

        cleaned.push(post.with_text(text));
    }

    report.output = cleaned.len();
    tracing::info!(
        input = report.input,
        empty = report.dropped_empty,
        links = report.dropped_links,
        noise = report.dropped_noise,
        duplicates = report.dropped_duplicates,
        output = report.output,
        "Normalized posts"
    );

    Ok((cleaned, report))
}

/// Applies the rewrites until none of them matches any more, then trims.
///
/// Every rewrite only deletes text, so the loop terminates.
pub fn clean_text(text: &str, hashtag: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = rewrite(&current, hashtag);
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

fn rewrite(text: &str, hashtag: &str) -> String {
    let stripped = REPOST_MARKER.replace_all(text, "");
    let single_line: String = stripped.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    if hashtag.is_empty() {
        single_line
    } else {
        single_line.replace(hashtag, "")
    }
}

fn contains_link(text: &str) -> bool {
    LINK_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(id: i64, text: &str) -> Post {
        Post {
            id,
            text: text.to_string(),
            len: text.chars().count(),
            created_at: Utc.with_ymd_and_hms(2021, 5, 4, 21, 0, 0).unwrap(),
            source: "Twitter for Android".to_string(),
            likes: 0,
            reposts: 0,
        }
    }

    fn texts(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn strips_repost_header_newline_and_hashtag() {
        let rules = CleaningRules::default();
        let out = normalize(&[post(1, "RT @user: Viva la #Elecciones4M libertad\n")], &rules).unwrap();
        assert_eq!(texts(&out), vec!["Viva la  libertad"]);
    }

    #[test]
    fn repost_marker_is_greedy_to_last_colon_on_the_line() {
        assert_eq!(clean_text("RT @a: dice: hola", CAMPAIGN_HASHTAG), "hola");
        assert_eq!(clean_text("rt @a: hola", CAMPAIGN_HASHTAG), "rt @a: hola");
    }

    #[test]
    fn line_join_cannot_leave_a_repost_marker_behind() {
        let text = clean_text("RT @a\nb: texto", CAMPAIGN_HASHTAG);
        assert_eq!(text, "texto");
        assert!(!REPOST_MARKER.is_match(&text));
    }

    #[test]
    fn nested_hashtag_is_fully_removed() {
        let text = clean_text("#Elecc#Elecciones4Miones4M fin", CAMPAIGN_HASHTAG);
        assert_eq!(text, "fin");
    }

    #[test]
    fn carriage_returns_are_removed() {
        assert_eq!(clean_text("uno\r\ndos", CAMPAIGN_HASHTAG), "unodos");
    }

    #[test]
    fn posts_with_links_are_dropped_not_stripped() {
        let rules = CleaningRules::default();
        let input = vec![
            post(1, "mira https://t.co/abc123"),
            post(2, "cortado https://t.c\u{2026}"),
            post(3, "sin enlace"),
        ];
        let (out, report) = normalize_with_report(&input, &rules).unwrap();
        assert_eq!(texts(&out), vec!["sin enlace"]);
        assert_eq!(report.dropped_links, 2);
    }

    #[test]
    fn noise_ids_are_dropped() {
        let rules = CleaningRules::default();
        let input = vec![post(NOISE_IDS[0], "ruido"), post(7, "señal")];
        let out = normalize(&input, &rules).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out.iter().all(|p| !rules.noise_ids.contains(&p.id)));
    }

    #[test]
    fn duplicates_keep_first_occurrence_in_order() {
        let rules = CleaningRules::default();
        let input = vec![
            post(1, "RT @a: hola"),
            post(2, "adiós"),
            post(3, "RT @b: hola"),
            post(4, "hola #Elecciones4M"),
            post(5, "otro"),
        ];
        let (out, report) = normalize_with_report(&input, &rules).unwrap();
        assert_eq!(out.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 5]);
        assert_eq!(report.dropped_duplicates, 2);

        let unique: HashSet<&str> = out.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(unique.len(), out.len());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let rules = CleaningRules::default();
        let input = vec![
            post(1, "RT @a: Viva #Elecciones4M\r\n"),
            post(2, "RT x\ny: z"),
            post(3, "  espacios  "),
            post(4, "RT @b: Viva "),
            post(5, "https://t.co/x"),
            post(NOISE_IDS[3], "ruido"),
            post(6, "RT @a: #Elecciones4M"),
            post(7, "\r\n#Elecciones4M  "),
        ];
        let once = normalize(&input, &rules).unwrap();
        let twice = normalize(&once, &rules).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn posts_cleaned_to_nothing_are_dropped() {
        let rules = CleaningRules::default();
        let input = vec![post(1, "RT @PPMadrid: #Elecciones4M"), post(2, "hola")];
        let (out, report) = normalize_with_report(&input, &rules).unwrap();
        assert_eq!(texts(&out), vec!["hola"]);
        assert_eq!(report.dropped_empty, 1);
        assert_eq!(report.output, 1);
        assert!(out.iter().all(|p| !p.text.is_empty()));
    }

    #[test]
    fn metadata_is_carried_over_unchanged() {
        let rules = CleaningRules::default();
        let mut original = post(9, "RT @a: hola");
        original.likes = 12;
        original.reposts = 3;
        let out = normalize(std::slice::from_ref(&original), &rules).unwrap();
        assert_eq!(out[0].likes, 12);
        assert_eq!(out[0].reposts, 3);
        assert_eq!(out[0].len, original.len);
        assert_eq!(original.text, "RT @a: hola");
    }

    #[test]
    fn missing_text_aborts() {
        let rules = CleaningRules::default();
        let err = normalize(&[post(1, "ok"), post(2, "")], &rules).unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord { .. }));
    }

    #[test]
    fn empty_input_is_fine() {
        let out = normalize(&[], &CleaningRules::default()).unwrap();
        assert!(out.is_empty());
    }
}
