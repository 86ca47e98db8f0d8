//! Sort keys for album titles and artist names.

/// Normalize a display string into its sort key.
///
/// - Lowercases
/// - Folds common Latin diacritics ("Björk" sorts with "bjork")
/// - Drops a leading article ("The Beatles" sorts under "b")
/// - Collapses whitespace
pub fn to_sortable(s: &str) -> String {
    let folded: String = s.to_lowercase().chars().flat_map(fold_diacritic).collect();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    for prefix in ["the ", "a ", "an "] {
        if let Some(rest) = collapsed.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    collapsed
}

/// Fold one lowercase character to its unaccented form.
fn fold_diacritic(c: char) -> FoldIter {
    let folded: &'static str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return FoldIter::Char(Some(c)),
    };
    FoldIter::Str(folded.chars())
}

enum FoldIter {
    Char(Option<char>),
    Str(std::str::Chars<'static>),
}

impl Iterator for FoldIter {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            FoldIter::Char(c) => c.take(),
            FoldIter::Str(chars) => chars.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_article() {
        assert_eq!(to_sortable("The Beatles"), "beatles");
        assert_eq!(to_sortable("A Tribe Called Quest"), "tribe called quest");
        assert_eq!(to_sortable("An Horse"), "horse");
        // Not an article
        assert_eq!(to_sortable("Theatre"), "theatre");
        // Nothing left after the article
        assert_eq!(to_sortable("The "), "the");
    }

    #[test]
    fn test_folds_diacritics_and_case() {
        assert_eq!(to_sortable("Björk"), "bjork");
        assert_eq!(to_sortable("SIGUR RÓS"), "sigur ros");
        assert_eq!(to_sortable("Straße"), "strasse");
        assert_eq!(to_sortable("Beyoncé"), to_sortable("beyonce"));
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(to_sortable("  Kind   of  Blue "), "kind of blue");
        assert_eq!(to_sortable(""), "");
    }
}
