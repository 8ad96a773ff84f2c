//! Database schema definitions
//!
//! Movies and people are stored once each; the three credit roles are
//! ordered join tables between them.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Scraped movies, one row per distinct title
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    release_year TEXT,
    rating REAL CHECK (rating IS NULL OR (rating >= 0.0 AND rating <= 10.0)),
    plot TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_movies_title ON movies(title);
CREATE INDEX IF NOT EXISTS idx_movies_release_year ON movies(release_year);
CREATE INDEX IF NOT EXISTS idx_movies_rating ON movies(rating);

-- Directors, writers and stars share one table
CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS movie_directors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
    person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE(movie_id, person_id)
);

CREATE TABLE IF NOT EXISTS movie_writers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
    person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE(movie_id, person_id)
);

-- Billing order lives in position
CREATE TABLE IF NOT EXISTS movie_stars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
    person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    position INTEGER NOT NULL DEFAULT 0,
    character_name TEXT NOT NULL DEFAULT '',
    UNIQUE(movie_id, person_id)
);

CREATE INDEX IF NOT EXISTS idx_movie_directors_person ON movie_directors(person_id);
CREATE INDEX IF NOT EXISTS idx_movie_writers_person ON movie_writers(person_id);
CREATE INDEX IF NOT EXISTS idx_movie_stars_person ON movie_stars(person_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
