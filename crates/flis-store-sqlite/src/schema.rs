//! SQL schema for the FLIS SQLite store.
//!
//! Executed once at connection startup. Entity-to-entity references carry
//! no delete action (NO ACTION, checked at end of statement), which makes
//! them "protected": deleting a row that is still referenced fails with a
//! constraint violation. Two references cascade instead: `country`
//! references, so deleting a country removes its tenant data in one
//! statement, and `interlinks.gmt_id`, so deleting a GMT removes the
//! interlinks built on it. End-of-statement checking is what lets a
//! country cascade take protected rows with it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS countries (
    iso   TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sources (
    id                  INTEGER PRIMARY KEY,
    country             TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    short_name          TEXT NOT NULL,
    long_name           TEXT NOT NULL,
    year_of_publication TEXT NOT NULL,
    author              TEXT NOT NULL,
    url                 TEXT NOT NULL,
    summary             TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS trends (
    id          INTEGER PRIMARY KEY,
    country     TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code        TEXT NOT NULL,
    description TEXT NOT NULL,
    source_id   INTEGER NOT NULL REFERENCES sources(id),
    ownership   TEXT NOT NULL,
    summary     TEXT NOT NULL DEFAULT '',
    file_path   TEXT
);

-- The four lookup tables share one shape; see CategoryKind.
CREATE TABLE IF NOT EXISTS thematic_categories (
    id          INTEGER PRIMARY KEY,
    country     TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS geographical_scales (
    id          INTEGER PRIMARY KEY,
    country     TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS geographical_coverages (
    id          INTEGER PRIMARY KEY,
    country     TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS steep_categories (
    id          INTEGER PRIMARY KEY,
    country     TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS timelines (
    id      INTEGER PRIMARY KEY,
    country TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    title   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS scenarios (
    id          INTEGER PRIMARY KEY,
    country     TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS indicators (
    id                       INTEGER PRIMARY KEY,
    country                  TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code                     TEXT NOT NULL,
    description              TEXT NOT NULL,
    thematic_category_id     INTEGER NOT NULL REFERENCES thematic_categories(id),
    geographical_scale_id    INTEGER REFERENCES geographical_scales(id),
    geographical_coverage_id INTEGER REFERENCES geographical_coverages(id),
    timeline_id              INTEGER NOT NULL REFERENCES timelines(id),
    source_id                INTEGER NOT NULL REFERENCES sources(id),
    base_year                TEXT NOT NULL,
    end_year                 TEXT NOT NULL,
    ownership                TEXT NOT NULL,
    file_path                TEXT
);

-- The seven foresight tables share one shape; see ForesightKind. The url
-- column is populated only for GMTs but exists everywhere so the queries
-- stay uniform.
CREATE TABLE IF NOT EXISTS gmts (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS flis_models (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS horizon_scannings (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS methods_tools (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS uncertainties (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS wild_cards (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS early_warnings (
    id                INTEGER PRIMARY KEY,
    country           TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    code              TEXT NOT NULL,
    steep_category_id INTEGER REFERENCES steep_categories(id),
    description       TEXT NOT NULL,
    source_id         INTEGER NOT NULL REFERENCES sources(id),
    url               TEXT,
    ownership         TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    file_path         TEXT
);

CREATE TABLE IF NOT EXISTS interlinks (
    id             INTEGER PRIMARY KEY,
    country        TEXT NOT NULL REFERENCES countries(iso) ON DELETE CASCADE,
    gmt_id         INTEGER NOT NULL REFERENCES gmts(id) ON DELETE CASCADE,
    trend_id       INTEGER NOT NULL REFERENCES trends(id),
    indicator_1_id INTEGER NOT NULL REFERENCES indicators(id),
    indicator_2_id INTEGER REFERENCES indicators(id),
    indicator_3_id INTEGER REFERENCES indicators(id),
    indicator_4_id INTEGER REFERENCES indicators(id)
);

CREATE INDEX IF NOT EXISTS sources_country_idx     ON sources(country);
CREATE INDEX IF NOT EXISTS trends_country_idx      ON trends(country);
CREATE INDEX IF NOT EXISTS thematic_country_idx    ON thematic_categories(country);
CREATE INDEX IF NOT EXISTS geo_scale_country_idx   ON geographical_scales(country);
CREATE INDEX IF NOT EXISTS geo_cov_country_idx     ON geographical_coverages(country);
CREATE INDEX IF NOT EXISTS steep_country_idx       ON steep_categories(country);
CREATE INDEX IF NOT EXISTS timelines_country_idx   ON timelines(country);
CREATE INDEX IF NOT EXISTS scenarios_country_idx   ON scenarios(country);
CREATE INDEX IF NOT EXISTS indicators_country_idx  ON indicators(country);
CREATE INDEX IF NOT EXISTS gmts_country_idx        ON gmts(country);
CREATE INDEX IF NOT EXISTS flis_models_country_idx ON flis_models(country);
CREATE INDEX IF NOT EXISTS horizon_country_idx     ON horizon_scannings(country);
CREATE INDEX IF NOT EXISTS methods_country_idx     ON methods_tools(country);
CREATE INDEX IF NOT EXISTS uncert_country_idx      ON uncertainties(country);
CREATE INDEX IF NOT EXISTS wild_cards_country_idx  ON wild_cards(country);
CREATE INDEX IF NOT EXISTS early_country_idx       ON early_warnings(country);
CREATE INDEX IF NOT EXISTS interlinks_country_idx  ON interlinks(country);
CREATE INDEX IF NOT EXISTS interlinks_gmt_idx      ON interlinks(gmt_id);

PRAGMA user_version = 1;
";
