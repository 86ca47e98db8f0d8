//! Typed query filters.
//!
//! A [`Predicate`] is a small tree over named [`Column`]s. It compiles into a
//! SQLx [`QueryBuilder`], with every value sent as a bound parameter, so the
//! repository can append "extra filters" to its base queries without ever
//! formatting user input into SQL.
//!
//! # Example
//!
//! ```ignore
//! let filter = Predicate::artists(&["Air"], ArtistType::All)
//!     .and(Predicate::genres(&["Electronic"]));
//! let tracks = repo.get_visible_tracks(Some(filter)).await;
//! ```

use sqlx::{QueryBuilder, Sqlite};

use crate::model::multi_value::{self, LIKE_ESCAPE};
use crate::model::{ArtistType, to_safe_path};

/// Columns that filters may reference.
///
/// Track columns are qualified with `t`, album columns with `a`, folder
/// columns with `f`, matching the aliases used by the repository queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    TrackId,
    Path,
    SafePath,
    Artists,
    AlbumArtists,
    Genres,
    Composers,
    AlbumKey,
    AlbumTitle,
    Year,
    Rating,
    Love,
    NeedsIndexing,
    NeedsAlbumArtworkIndexing,
    IndexingSuccess,
    ShowInCollection,
    AlbumLove,
}

impl Column {
    /// Qualified SQL name.
    pub fn as_sql(self) -> &'static str {
        match self {
            Column::TrackId => "t.TrackID",
            Column::Path => "t.Path",
            Column::SafePath => "t.SafePath",
            Column::Artists => "t.Artists",
            Column::AlbumArtists => "t.AlbumArtists",
            Column::Genres => "t.Genres",
            Column::Composers => "t.Composers",
            Column::AlbumKey => "t.AlbumKey",
            Column::AlbumTitle => "t.AlbumTitle",
            Column::Year => "t.Year",
            Column::Rating => "t.Rating",
            Column::Love => "t.Love",
            Column::NeedsIndexing => "t.NeedsIndexing",
            Column::NeedsAlbumArtworkIndexing => "t.NeedsAlbumArtworkIndexing",
            Column::IndexingSuccess => "t.IndexingSuccess",
            Column::ShowInCollection => "f.ShowInCollection",
            Column::AlbumLove => "a.AlbumLove",
        }
    }
}

/// A bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Filter expression over [`Column`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Always true
    True,
    /// `column = value`
    Eq(Column, Value),
    /// `column IN (values)`; empty list matches nothing
    In(Column, Vec<String>),
    /// `column IS NOT NULL AND column <> ''`
    NotEmpty(Column),
    /// Multi-valued column contains any of the values (OR of `LIKE`)
    HasAnyValue(Column, Vec<String>),
    /// All children hold; empty is true
    And(Vec<Predicate>),
    /// Any child holds; empty is false
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Predicate::Eq(column, value.into())
    }

    pub fn in_list<I, S>(column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Predicate::In(
            column,
            values.into_iter().map(|v| v.as_ref().to_string()).collect(),
        )
    }

    pub fn has_any_value<I, S>(column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Predicate::HasAnyValue(
            column,
            values.into_iter().map(|v| v.as_ref().to_string()).collect(),
        )
    }

    /// Tracks at any of these paths (compared by safe path).
    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Predicate::In(
            Column::SafePath,
            paths.into_iter().map(|p| to_safe_path(p.as_ref())).collect(),
        )
    }

    /// Tracks belonging to any of these album keys.
    pub fn album_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::in_list(Column::AlbumKey, keys)
    }

    /// Tracks with any of these genres.
    pub fn genres<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::has_any_value(Column::Genres, genres)
    }

    /// Tracks by any of these artists, on the columns `artist_type` selects.
    pub fn artists<S: AsRef<str>>(artists: &[S], artist_type: ArtistType) -> Self {
        let track = || Self::has_any_value(Column::Artists, artists);
        let album = || Self::has_any_value(Column::AlbumArtists, artists);
        match artist_type {
            ArtistType::All => Predicate::Or(vec![track(), album()]),
            ArtistType::Track => track(),
            ArtistType::Album => album(),
        }
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut a), Predicate::And(b)) => {
                a.extend(b);
                Predicate::And(a)
            }
            (Predicate::And(mut a), p) => {
                a.push(p);
                Predicate::And(a)
            }
            (p, q) => Predicate::And(vec![p, q]),
        }
    }

    /// Disjunction.
    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::Or(mut a), p) => {
                a.push(p);
                Predicate::Or(a)
            }
            (p, q) => Predicate::Or(vec![p, q]),
        }
    }

    /// Append this predicate to `qb` as a parenthesized boolean expression.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Predicate::True => {
                qb.push("1");
            }
            Predicate::Eq(column, value) => {
                qb.push(column.as_sql()).push(" = ");
                push_value(qb, value);
            }
            Predicate::In(_, values) if values.is_empty() => {
                qb.push("0");
            }
            Predicate::In(column, values) => {
                qb.push(column.as_sql()).push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    qb.push_bind(value.clone());
                }
                qb.push(")");
            }
            Predicate::NotEmpty(column) => {
                let col = column.as_sql();
                qb.push(format!("({col} IS NOT NULL AND {col} <> '')"));
            }
            Predicate::HasAnyValue(_, values) if values.is_empty() => {
                qb.push("0");
            }
            Predicate::HasAnyValue(column, values) => {
                qb.push("(");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(column.as_sql()).push(" LIKE ");
                    qb.push_bind(multi_value::like_pattern(value));
                    qb.push(format!(" ESCAPE '{LIKE_ESCAPE}'"));
                }
                qb.push(")");
            }
            Predicate::And(children) => push_joined(qb, children, " AND ", "1"),
            Predicate::Or(children) => push_joined(qb, children, " OR ", "0"),
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Int(v) => {
            qb.push_bind(*v);
        }
        Value::Text(v) => {
            qb.push_bind(v.clone());
        }
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Sqlite>,
    children: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if children.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        child.push_sql(qb);
    }
    qb.push(")");
}
