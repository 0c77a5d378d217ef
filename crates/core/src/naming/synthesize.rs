//! Candidate name synthesis from tags.

use crate::extractor::{TagSet, TagValue};

/// Builds the pre-slug candidate name for a file.
///
/// Values are taken in the order of `wanted`. Tags that are absent or blank
/// are skipped without leaving an empty segment behind. Returns an empty
/// string when none of the wanted tags has a value.
///
/// A `/` inside a value is turned into `-`, so only the separator can
/// introduce a path break.
pub fn synthesize(tags: &TagSet, wanted: &[String], separator: &str) -> String {
    wanted
        .iter()
        .filter_map(|name| tags.get(name).and_then(TagValue::first))
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.replace('/', "-"))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn addicted() -> TagSet {
        TagSet::new()
            .with("album", "Addicted")
            .with("title", "Numbered")
            .with("track", vec!["9".to_string(), "12".to_string()])
    }

    #[test]
    fn test_joins_in_requested_order() {
        let tags = TagSet::new()
            .with("artist", "Paradise Lost")
            .with("title", "Victim Of The Past");
        assert_eq!(
            synthesize(&tags, &names(&["artist", "title"]), "-"),
            "Paradise Lost-Victim Of The Past"
        );
        assert_eq!(
            synthesize(&tags, &names(&["title", "artist"]), " by "),
            "Victim Of The Past by Paradise Lost"
        );
    }

    #[test]
    fn test_slash_in_value_is_not_a_path_break() {
        let tags = TagSet::new()
            .with("artist", "AC/DC")
            .with("title", "Back In Black");
        assert_eq!(
            synthesize(&tags, &names(&["artist", "title"]), "-"),
            "AC-DC-Back In Black"
        );
        assert_eq!(
            synthesize(&tags, &names(&["artist", "title"]), "/"),
            "AC-DC/Back In Black"
        );
    }

    #[test]
    fn test_multi_value_contributes_first_element() {
        assert_eq!(
            synthesize(&addicted(), &names(&["album", "track", "title"]), "-"),
            "Addicted-9-Numbered"
        );
    }

    #[test]
    fn test_missing_tags_leave_no_gap() {
        assert_eq!(
            synthesize(&addicted(), &names(&["genre", "album", "title"]), "-"),
            "Addicted-Numbered"
        );
    }

    #[test]
    fn test_all_missing_is_empty() {
        let tags = TagSet::new().with("artist", "Paradise Lost").with("genre", " ");
        assert_eq!(synthesize(&tags, &names(&["album", "track"]), "-"), "");
        assert_eq!(synthesize(&tags, &names(&["genre"]), "-"), "");
        assert_eq!(synthesize(&tags, &[], "-"), "");
    }
}
