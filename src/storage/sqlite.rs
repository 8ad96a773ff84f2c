//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the MovieStore trait.

use crate::model::MovieRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{MovieStore, StorageError, StorageResult};
use crate::storage::{ImportSummary, MovieFilter, Page, StoredMovie};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

/// Largest page size served by `list_movies` and `search_movies`
pub const MAX_PAGE_SIZE: u32 = 100;

const MOVIE_COLUMNS: &str =
    "m.id, m.title, m.release_year, m.rating, m.plot, m.created_at, m.updated_at";

/// The three credit roles and their join tables
#[derive(Debug, Clone, Copy)]
enum Role {
    Director,
    Writer,
    Star,
}

impl Role {
    const ALL: [Role; 3] = [Role::Director, Role::Writer, Role::Star];

    fn table(self) -> &'static str {
        match self {
            Self::Director => "movie_directors",
            Self::Writer => "movie_writers",
            Self::Star => "movie_stars",
        }
    }

    fn names(self, record: &MovieRecord) -> &[String] {
        match self {
            Self::Director => &record.director,
            Self::Writer => &record.writer,
            Self::Star => &record.star,
        }
    }
}

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Missing parent directories of `path` are created.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened movie database at {}", path.display());
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Runs a movie query and attaches credits to every row
    ///
    /// `where_sql` is either empty or starts with `WHERE` and refers to the
    /// movies table as `m`; `values` bind its numbered parameters.
    fn query_page(
        &self,
        where_sql: &str,
        mut values: Vec<Value>,
        page: u32,
        page_size: u32,
    ) -> StorageResult<Page<StoredMovie>> {
        if page == 0 || page_size == 0 {
            return Err(StorageError::InvalidPage { page, page_size });
        }
        let page_size = page_size.min(MAX_PAGE_SIZE);

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM movies m {}", where_sql),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let limit_idx = values.len() + 1;
        values.push(Value::Integer(i64::from(page_size)));
        values.push(Value::Integer(
            i64::from(page - 1) * i64::from(page_size),
        ));

        let sql = format!(
            "SELECT {} FROM movies m {}
             ORDER BY m.release_year DESC, m.title ASC, m.id ASC
             LIMIT ?{} OFFSET ?{}",
            MOVIE_COLUMNS,
            where_sql,
            limit_idx,
            limit_idx + 1
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut items = stmt
            .query_map(params_from_iter(values.iter()), movie_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for movie in &mut items {
            movie.directors = self.credits(Role::Director, movie.id)?;
            movie.writers = self.credits(Role::Writer, movie.id)?;
            movie.stars = self.credits(Role::Star, movie.id)?;
        }

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or(0),
            page,
            page_size,
        })
    }

    /// Names credited in `role` for a movie, in position order
    fn credits(&self, role: Role, movie_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT p.name FROM {} r
             JOIN persons p ON p.id = r.person_id
             WHERE r.movie_id = ?1
             ORDER BY r.position ASC, r.id ASC",
            role.table()
        ))?;

        let names = stmt
            .query_map(params![movie_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

impl MovieStore for SqliteStorage {
    fn import_records(&mut self, records: &[MovieRecord]) -> StorageResult<ImportSummary> {
        let now = Utc::now().to_rfc3339();
        let mut summary = ImportSummary {
            total_scraped: records.len(),
            ..ImportSummary::default()
        };

        let tx = self.conn.transaction()?;

        for record in records {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM movies WHERE title = ?1",
                    params![record.title],
                    |row| row.get(0),
                )
                .optional()?;

            let movie_id = match existing {
                Some(id) => {
                    tracing::debug!("Movie already stored: {}", record.title);
                    summary.duplicates.push(record.title.clone());
                    id
                }
                None => {
                    tx.execute(
                        "INSERT INTO movies (title, release_year, rating, plot, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                        params![
                            record.title,
                            record.release_year,
                            storable_rating(record),
                            record.plot,
                            now
                        ],
                    )?;
                    summary.added += 1;
                    tx.last_insert_rowid()
                }
            };

            for role in Role::ALL {
                for (position, name) in role.names(record).iter().enumerate() {
                    let person_id = get_or_create_person(&tx, name, &now)?;
                    tx.execute(
                        &format!(
                            "INSERT OR IGNORE INTO {} (movie_id, person_id, position)
                             VALUES (?1, ?2, ?3)",
                            role.table()
                        ),
                        params![movie_id, person_id, position as i64],
                    )?;
                }
            }
        }

        tx.commit()?;

        tracing::info!(
            "Stored {} new movies ({} scraped, {} duplicates)",
            summary.added,
            summary.total_scraped,
            summary.duplicates.len()
        );
        Ok(summary)
    }

    fn list_movies(&self, page: u32, page_size: u32) -> StorageResult<Page<StoredMovie>> {
        self.query_page("", Vec::new(), page, page_size)
    }

    fn search_movies(
        &self,
        filter: &MovieFilter,
        page: u32,
        page_size: u32,
    ) -> StorageResult<Page<StoredMovie>> {
        if filter.is_empty() {
            return self.list_movies(page, page_size);
        }

        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            values.push(Value::Text(like_pattern(title)));
            clauses.push(format!("m.title LIKE ?{} ESCAPE '\\'", values.len()));
        }

        if let Some(year) = filter.year.as_deref().filter(|y| !y.is_empty()) {
            values.push(Value::Text(year.to_string()));
            clauses.push(format!("m.release_year = ?{}", values.len()));
        }

        if let Some(person) = filter.person.as_deref().filter(|p| !p.is_empty()) {
            values.push(Value::Text(like_pattern(person)));
            let idx = values.len();
            let per_role: Vec<String> = Role::ALL
                .iter()
                .map(|role| {
                    format!(
                        "SELECT r.movie_id FROM {} r JOIN persons p ON p.id = r.person_id
                         WHERE p.name LIKE ?{} ESCAPE '\\'",
                        role.table(),
                        idx
                    )
                })
                .collect();
            clauses.push(format!("m.id IN ({})", per_role.join(" UNION ")));
        }

        if let Some(min_rating) = filter.min_rating {
            values.push(Value::Real(min_rating));
            clauses.push(format!("m.rating >= ?{}", values.len()));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        self.query_page(&where_sql, values, page, page_size)
    }

    fn count_movies(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMovie> {
    Ok(StoredMovie {
        id: row.get(0)?,
        title: row.get(1)?,
        release_year: row.get(2)?,
        rating: row.get(3)?,
        plot: row.get(4)?,
        directors: Vec::new(),
        writers: Vec::new(),
        stars: Vec::new(),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn get_or_create_person(conn: &Connection, name: &str, now: &str) -> StorageResult<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM persons WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO persons (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![name, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Ratings outside 0.0..=10.0 are stored as unknown
fn storable_rating(record: &MovieRecord) -> Option<f64> {
    match record.rating {
        Some(rating) if (0.0..=10.0).contains(&rating) => Some(rating),
        Some(rating) => {
            tracing::warn!(
                "Dropping out-of-range rating {} for {}",
                rating,
                record.title
            );
            None
        }
        None => None,
    }
}

/// Wraps `needle` for a `LIKE ... ESCAPE '\'` substring match
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
