//! Multi-valued text columns.
//!
//! `Artists`, `AlbumArtists`, `Genres` and `Composers` hold several values in
//! one column. Each value is wrapped in [`DELIMITER`] on both sides, so
//! `["Air", "Beck"]` is stored as `¡Air¡¡Beck¡`. Matching a single value is a
//! `LIKE '%¡value¡%'`, which only hits whole values: `Art` does not match
//! `¡Artemis¡`.

use smallvec::SmallVec;

/// Wraps every value of a multi-valued column.
pub const DELIMITER: char = '¡';

/// Escape character used in generated `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Join values into the stored column form. Blank values are dropped.
pub fn join<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: String = values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| format!("{DELIMITER}{v}{DELIMITER}"))
        .collect();

    if joined.is_empty() { None } else { Some(joined) }
}

/// Split a stored column back into its values.
///
/// A plain value without delimiters (older rows) comes back as itself.
pub fn split(column: Option<&str>) -> SmallVec<[String; 4]> {
    let Some(column) = column else {
        return SmallVec::new();
    };

    column
        .split(DELIMITER)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// `LIKE` pattern matching one whole value inside a stored column.
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 6);
    pattern.push('%');
    pattern.push(DELIMITER);
    for c in value.trim().chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push(DELIMITER);
    pattern.push('%');
    pattern
}
