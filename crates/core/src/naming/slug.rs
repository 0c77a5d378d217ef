//! Slug transform turning free text into a filesystem-safe file name.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Runs of characters that may not appear in a slug.
static UNSAFE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"));

/// Turns arbitrary text into a token that is safe as a path segment.
///
/// Implementations must be deterministic and free of side effects.
pub trait Slugifier: Send + Sync {
    /// Slugifies `text`, lower-casing it unless `keep_case` is set.
    fn slugify(&self, text: &str, keep_case: bool) -> String;
}

/// Default slugifier.
///
/// Latin letters with diacritics are folded to ASCII, apostrophes are
/// dropped and every other run of non-alphanumeric characters becomes a
/// single `-`. A `/` splits the text into separately slugified segments so
/// that a separator of `/` produces a nested name; empty segments vanish,
/// which keeps the result relative and free of `..`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSlugifier;

impl StandardSlugifier {
    fn segment(text: &str, keep_case: bool) -> String {
        let mut folded = String::with_capacity(text.len());
        for ch in text.chars() {
            match transliterate(ch) {
                Some(replacement) => folded.push_str(replacement),
                None => folded.push(ch),
            }
        }

        let slug = UNSAFE_RUN.replace_all(&folded, "-");
        let slug = slug.trim_matches('-');
        if keep_case {
            slug.to_string()
        } else {
            slug.to_ascii_lowercase()
        }
    }
}

impl Slugifier for StandardSlugifier {
    fn slugify(&self, text: &str, keep_case: bool) -> String {
        text.split('/')
            .map(|segment| Self::segment(segment, keep_case))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn transliterate(ch: char) -> Option<&'static str> {
    let replacement = match ch {
        '\'' | '’' | '‘' | '`' => "",
        '&' => "-and-",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Č' => "C",
        'ç' | 'ć' | 'č' => "c",
        'Ď' | 'Đ' | 'Ð' => "D",
        'ď' | 'đ' | 'ð' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'Ğ' => "G",
        'ğ' => "g",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'Ł' => "L",
        'ł' => "l",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ñ' | 'ń' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ř' => "R",
        'ř' => "r",
        'Ś' | 'Š' | 'Ş' => "S",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'Ť' | 'Ţ' => "T",
        'ť' | 'ţ' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'Ý' | 'Ÿ' => "Y",
        'ý' | 'ÿ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(replacement)
}
