//! [`SqliteStore`] — the SQLite implementation of [`FlisStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, params};

use flis_core::{
  category::{Category, CategoryKind, NewCategory},
  country::{Country, NewCountry},
  foresight::{ForesightItem, ForesightKind, NewForesightItem},
  indicator::{Indicator, NewIndicator},
  interlink::{Interlink, NewInterlink},
  scenario::{NewScenario, Scenario},
  source::{NewSource, Source},
  store::{DeleteOutcome, FlisStore, ListQuery},
  timeline::{NewTimeline, Timeline},
  trend::{NewTrend, Trend},
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A FLIS catalogue backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a country/id-scoped DELETE, translating affected-row counts and
  /// protected-reference failures into a [`DeleteOutcome`].
  async fn delete_scoped(
    &self,
    sql: String,
    country: String,
    id: i64,
  ) -> Result<DeleteOutcome> {
    let res = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params![country, id])?))
      .await;

    match res {
      Ok(0) => Ok(DeleteOutcome::NotFound),
      Ok(_) => Ok(DeleteOutcome::Deleted),
      Err(e) if is_constraint_violation(&e) => Ok(DeleteOutcome::Protected),
      Err(e) => Err(Error::Database(e)),
    }
  }

  async fn count_scoped(&self, sql: String, country: String) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params![country], |row| row.get(0))?)
      })
      .await?;
    Ok(n as usize)
  }
}

/// True for any constraint failure: primary-key collisions on insert,
/// protected foreign keys on delete.
fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

/// SQLite's LIMIT treats -1 as "no limit".
fn window(query: ListQuery) -> (i64, i64) {
  (
    query.limit.map(|l| l as i64).unwrap_or(-1),
    query.offset as i64,
  )
}

// ─── Kind → table mapping ────────────────────────────────────────────────────

fn category_table(kind: CategoryKind) -> &'static str {
  match kind {
    CategoryKind::Thematic => "thematic_categories",
    CategoryKind::GeographicalScale => "geographical_scales",
    CategoryKind::GeographicalCoverage => "geographical_coverages",
    CategoryKind::Steep => "steep_categories",
  }
}

fn foresight_table(kind: ForesightKind) -> &'static str {
  match kind {
    ForesightKind::Gmt => "gmts",
    ForesightKind::FlisModel => "flis_models",
    ForesightKind::HorizonScanning => "horizon_scannings",
    ForesightKind::MethodTool => "methods_tools",
    ForesightKind::Uncertainty => "uncertainties",
    ForesightKind::WildCard => "wild_cards",
    ForesightKind::EarlyWarning => "early_warnings",
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

const SOURCE_COLS: &str =
  "id, country, short_name, long_name, year_of_publication, author, url, summary";

fn source_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Source> {
  Ok(Source {
    id:                  row.get(0)?,
    country:             row.get(1)?,
    short_name:          row.get(2)?,
    long_name:           row.get(3)?,
    year_of_publication: row.get(4)?,
    author:              row.get(5)?,
    url:                 row.get(6)?,
    summary:             row.get(7)?,
  })
}

const TREND_COLS: &str =
  "id, country, code, description, source_id, ownership, summary, file_path";

fn trend_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Trend> {
  Ok(Trend {
    id:          row.get(0)?,
    country:     row.get(1)?,
    code:        row.get(2)?,
    description: row.get(3)?,
    source_id:   row.get(4)?,
    ownership:   row.get(5)?,
    summary:     row.get(6)?,
    file_path:   row.get(7)?,
  })
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
  Ok(Category {
    id:          row.get(0)?,
    country:     row.get(1)?,
    code:        row.get(2)?,
    description: row.get(3)?,
  })
}

fn timeline_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Timeline> {
  Ok(Timeline {
    id:      row.get(0)?,
    country: row.get(1)?,
    title:   row.get(2)?,
  })
}

fn scenario_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Scenario> {
  Ok(Scenario {
    id:          row.get(0)?,
    country:     row.get(1)?,
    code:        row.get(2)?,
    description: row.get(3)?,
  })
}

const INDICATOR_COLS: &str = "id, country, code, description, \
   thematic_category_id, geographical_scale_id, geographical_coverage_id, \
   timeline_id, source_id, base_year, end_year, ownership, file_path";

fn indicator_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Indicator> {
  Ok(Indicator {
    id:                       row.get(0)?,
    country:                  row.get(1)?,
    code:                     row.get(2)?,
    description:              row.get(3)?,
    thematic_category_id:     row.get(4)?,
    geographical_scale_id:    row.get(5)?,
    geographical_coverage_id: row.get(6)?,
    timeline_id:              row.get(7)?,
    source_id:                row.get(8)?,
    base_year:                row.get(9)?,
    end_year:                 row.get(10)?,
    ownership:                row.get(11)?,
    file_path:                row.get(12)?,
  })
}

const FORESIGHT_COLS: &str = "id, country, code, steep_category_id, \
   description, source_id, url, ownership, summary, file_path";

fn foresight_from_row(
  kind: ForesightKind,
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<ForesightItem> {
  Ok(ForesightItem {
    id:                row.get(0)?,
    country:           row.get(1)?,
    kind,
    code:              row.get(2)?,
    steep_category_id: row.get(3)?,
    description:       row.get(4)?,
    source_id:         row.get(5)?,
    url:               row.get(6)?,
    ownership:         row.get(7)?,
    summary:           row.get(8)?,
    file_path:         row.get(9)?,
  })
}

const INTERLINK_COLS: &str = "id, country, gmt_id, trend_id, \
   indicator_1_id, indicator_2_id, indicator_3_id, indicator_4_id";

fn interlink_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Interlink> {
  Ok(Interlink {
    id:             row.get(0)?,
    country:        row.get(1)?,
    gmt_id:         row.get(2)?,
    trend_id:       row.get(3)?,
    indicator_1_id: row.get(4)?,
    indicator_2_id: row.get(5)?,
    indicator_3_id: row.get(6)?,
    indicator_4_id: row.get(7)?,
  })
}

// ─── FlisStore impl ──────────────────────────────────────────────────────────

impl FlisStore for SqliteStore {
  type Error = Error;

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn add_country(&self, country: NewCountry) -> Result<bool> {
    let res = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO countries (iso, name) VALUES (?1, ?2)",
          params![country.iso, country.name],
        )?)
      })
      .await;

    match res {
      Ok(_) => Ok(true),
      Err(e) if is_constraint_violation(&e) => Ok(false),
      Err(e) => Err(Error::Database(e)),
    }
  }

  async fn get_country(&self, iso: &str) -> Result<Option<Country>> {
    let iso = iso.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT iso, name FROM countries WHERE iso = ?1",
              params![iso],
              |row| Ok(Country { iso: row.get(0)?, name: row.get(1)? }),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT iso, name FROM countries ORDER BY iso")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Country { iso: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn update_country(&self, iso: &str, name: &str) -> Result<bool> {
    let iso = iso.to_owned();
    let name = name.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE countries SET name = ?2 WHERE iso = ?1",
          params![iso, name],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_country(&self, iso: &str) -> Result<DeleteOutcome> {
    let iso = iso.to_owned();
    let res = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM countries WHERE iso = ?1", params![iso])?)
      })
      .await;

    match res {
      Ok(0) => Ok(DeleteOutcome::NotFound),
      Ok(_) => Ok(DeleteOutcome::Deleted),
      Err(e) if is_constraint_violation(&e) => Ok(DeleteOutcome::Protected),
      Err(e) => Err(Error::Database(e)),
    }
  }

  // ── Sources ───────────────────────────────────────────────────────────────

  async fn add_source(&self, source: NewSource) -> Result<Source> {
    let fields = source.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sources (country, short_name, long_name,
             year_of_publication, author, url, summary)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            fields.country,
            fields.short_name,
            fields.long_name,
            fields.year_of_publication,
            fields.author,
            fields.url,
            fields.summary,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Source {
      id,
      country:             source.country,
      short_name:          source.short_name,
      long_name:           source.long_name,
      year_of_publication: source.year_of_publication,
      author:              source.author,
      url:                 source.url,
      summary:             source.summary,
    })
  }

  async fn get_source(&self, country: &str, id: i64) -> Result<Option<Source>> {
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SOURCE_COLS} FROM sources WHERE country = ?1 AND id = ?2"
              ),
              params![country, id],
              source_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_sources(
    &self,
    country: &str,
    query: ListQuery,
  ) -> Result<Vec<Source>> {
    let country = country.to_owned();
    let (limit, offset) = window(query);
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SOURCE_COLS} FROM sources
           WHERE country = ?1 ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(params![country, limit, offset], source_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn count_sources(&self, country: &str) -> Result<usize> {
    self
      .count_scoped(
        "SELECT COUNT(*) FROM sources WHERE country = ?1".into(),
        country.to_owned(),
      )
      .await
  }

  async fn update_source(
    &self,
    country: &str,
    id: i64,
    fields: NewSource,
  ) -> Result<bool> {
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE sources SET country = ?3, short_name = ?4, long_name = ?5,
             year_of_publication = ?6, author = ?7, url = ?8, summary = ?9
           WHERE country = ?1 AND id = ?2",
          params![
            country,
            id,
            fields.country,
            fields.short_name,
            fields.long_name,
            fields.year_of_publication,
            fields.author,
            fields.url,
            fields.summary,
          ],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_source(&self, country: &str, id: i64) -> Result<DeleteOutcome> {
    self
      .delete_scoped(
        "DELETE FROM sources WHERE country = ?1 AND id = ?2".into(),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Trends ────────────────────────────────────────────────────────────────

  async fn add_trend(&self, trend: NewTrend) -> Result<Trend> {
    let fields = trend.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO trends (country, code, description, source_id,
             ownership, summary, file_path)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            fields.country,
            fields.code,
            fields.description,
            fields.source_id,
            fields.ownership,
            fields.summary,
            fields.file_path,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Trend {
      id,
      country:     trend.country,
      code:        trend.code,
      description: trend.description,
      source_id:   trend.source_id,
      ownership:   trend.ownership,
      summary:     trend.summary,
      file_path:   trend.file_path,
    })
  }

  async fn get_trend(&self, country: &str, id: i64) -> Result<Option<Trend>> {
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {TREND_COLS} FROM trends WHERE country = ?1 AND id = ?2"
              ),
              params![country, id],
              trend_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_trends(
    &self,
    country: &str,
    query: ListQuery,
  ) -> Result<Vec<Trend>> {
    let country = country.to_owned();
    let (limit, offset) = window(query);
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TREND_COLS} FROM trends
           WHERE country = ?1 ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(params![country, limit, offset], trend_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn count_trends(&self, country: &str) -> Result<usize> {
    self
      .count_scoped(
        "SELECT COUNT(*) FROM trends WHERE country = ?1".into(),
        country.to_owned(),
      )
      .await
  }

  async fn update_trend(
    &self,
    country: &str,
    id: i64,
    fields: NewTrend,
  ) -> Result<bool> {
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE trends SET country = ?3, code = ?4, description = ?5,
             source_id = ?6, ownership = ?7, summary = ?8, file_path = ?9
           WHERE country = ?1 AND id = ?2",
          params![
            country,
            id,
            fields.country,
            fields.code,
            fields.description,
            fields.source_id,
            fields.ownership,
            fields.summary,
            fields.file_path,
          ],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_trend(&self, country: &str, id: i64) -> Result<DeleteOutcome> {
    self
      .delete_scoped(
        "DELETE FROM trends WHERE country = ?1 AND id = ?2".into(),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Categories ────────────────────────────────────────────────────────────

  async fn add_category(
    &self,
    kind: CategoryKind,
    category: NewCategory,
  ) -> Result<Category> {
    let table = category_table(kind);
    let fields = category.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} (country, code, description) VALUES (?1, ?2, ?3)"
          ),
          params![fields.country, fields.code, fields.description],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Category {
      id,
      country:     category.country,
      code:        category.code,
      description: category.description,
    })
  }

  async fn get_category(
    &self,
    kind: CategoryKind,
    country: &str,
    id: i64,
  ) -> Result<Option<Category>> {
    let table = category_table(kind);
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT id, country, code, description FROM {table}
                 WHERE country = ?1 AND id = ?2"
              ),
              params![country, id],
              category_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_categories(
    &self,
    kind: CategoryKind,
    country: &str,
  ) -> Result<Vec<Category>> {
    let table = category_table(kind);
    let country = country.to_owned();
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT id, country, code, description FROM {table}
           WHERE country = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(params![country], category_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn update_category(
    &self,
    kind: CategoryKind,
    country: &str,
    id: i64,
    fields: NewCategory,
  ) -> Result<bool> {
    let table = category_table(kind);
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!(
            "UPDATE {table} SET country = ?3, code = ?4, description = ?5
             WHERE country = ?1 AND id = ?2"
          ),
          params![country, id, fields.country, fields.code, fields.description],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_category(
    &self,
    kind: CategoryKind,
    country: &str,
    id: i64,
  ) -> Result<DeleteOutcome> {
    let table = category_table(kind);
    self
      .delete_scoped(
        format!("DELETE FROM {table} WHERE country = ?1 AND id = ?2"),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Timelines ─────────────────────────────────────────────────────────────

  async fn add_timeline(&self, timeline: NewTimeline) -> Result<Timeline> {
    let fields = timeline.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO timelines (country, title) VALUES (?1, ?2)",
          params![fields.country, fields.title],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Timeline { id, country: timeline.country, title: timeline.title })
  }

  async fn get_timeline(&self, country: &str, id: i64) -> Result<Option<Timeline>> {
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, country, title FROM timelines
               WHERE country = ?1 AND id = ?2",
              params![country, id],
              timeline_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_timelines(&self, country: &str) -> Result<Vec<Timeline>> {
    let country = country.to_owned();
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, country, title FROM timelines
           WHERE country = ?1 ORDER BY id",
        )?;
        let rows = stmt
          .query_map(params![country], timeline_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn update_timeline(
    &self,
    country: &str,
    id: i64,
    fields: NewTimeline,
  ) -> Result<bool> {
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE timelines SET country = ?3, title = ?4
           WHERE country = ?1 AND id = ?2",
          params![country, id, fields.country, fields.title],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_timeline(&self, country: &str, id: i64) -> Result<DeleteOutcome> {
    self
      .delete_scoped(
        "DELETE FROM timelines WHERE country = ?1 AND id = ?2".into(),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Scenarios ─────────────────────────────────────────────────────────────

  async fn add_scenario(&self, scenario: NewScenario) -> Result<Scenario> {
    let fields = scenario.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO scenarios (country, code, description) VALUES (?1, ?2, ?3)",
          params![fields.country, fields.code, fields.description],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Scenario {
      id,
      country:     scenario.country,
      code:        scenario.code,
      description: scenario.description,
    })
  }

  async fn get_scenario(&self, country: &str, id: i64) -> Result<Option<Scenario>> {
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, country, code, description FROM scenarios
               WHERE country = ?1 AND id = ?2",
              params![country, id],
              scenario_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_scenarios(&self, country: &str) -> Result<Vec<Scenario>> {
    let country = country.to_owned();
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, country, code, description FROM scenarios
           WHERE country = ?1 ORDER BY id",
        )?;
        let rows = stmt
          .query_map(params![country], scenario_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn update_scenario(
    &self,
    country: &str,
    id: i64,
    fields: NewScenario,
  ) -> Result<bool> {
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE scenarios SET country = ?3, code = ?4, description = ?5
           WHERE country = ?1 AND id = ?2",
          params![country, id, fields.country, fields.code, fields.description],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_scenario(&self, country: &str, id: i64) -> Result<DeleteOutcome> {
    self
      .delete_scoped(
        "DELETE FROM scenarios WHERE country = ?1 AND id = ?2".into(),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Indicators ────────────────────────────────────────────────────────────

  async fn add_indicator(&self, indicator: NewIndicator) -> Result<Indicator> {
    let fields = indicator.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO indicators (country, code, description,
             thematic_category_id, geographical_scale_id,
             geographical_coverage_id, timeline_id, source_id,
             base_year, end_year, ownership, file_path)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          params![
            fields.country,
            fields.code,
            fields.description,
            fields.thematic_category_id,
            fields.geographical_scale_id,
            fields.geographical_coverage_id,
            fields.timeline_id,
            fields.source_id,
            fields.base_year,
            fields.end_year,
            fields.ownership,
            fields.file_path,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Indicator {
      id,
      country:                  indicator.country,
      code:                     indicator.code,
      description:              indicator.description,
      thematic_category_id:     indicator.thematic_category_id,
      geographical_scale_id:    indicator.geographical_scale_id,
      geographical_coverage_id: indicator.geographical_coverage_id,
      timeline_id:              indicator.timeline_id,
      source_id:                indicator.source_id,
      base_year:                indicator.base_year,
      end_year:                 indicator.end_year,
      ownership:                indicator.ownership,
      file_path:                indicator.file_path,
    })
  }

  async fn get_indicator(&self, country: &str, id: i64) -> Result<Option<Indicator>> {
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INDICATOR_COLS} FROM indicators
                 WHERE country = ?1 AND id = ?2"
              ),
              params![country, id],
              indicator_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_indicators(&self, country: &str) -> Result<Vec<Indicator>> {
    let country = country.to_owned();
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INDICATOR_COLS} FROM indicators
           WHERE country = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(params![country], indicator_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn update_indicator(
    &self,
    country: &str,
    id: i64,
    fields: NewIndicator,
  ) -> Result<bool> {
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE indicators SET country = ?3, code = ?4, description = ?5,
             thematic_category_id = ?6, geographical_scale_id = ?7,
             geographical_coverage_id = ?8, timeline_id = ?9, source_id = ?10,
             base_year = ?11, end_year = ?12, ownership = ?13, file_path = ?14
           WHERE country = ?1 AND id = ?2",
          params![
            country,
            id,
            fields.country,
            fields.code,
            fields.description,
            fields.thematic_category_id,
            fields.geographical_scale_id,
            fields.geographical_coverage_id,
            fields.timeline_id,
            fields.source_id,
            fields.base_year,
            fields.end_year,
            fields.ownership,
            fields.file_path,
          ],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_indicator(&self, country: &str, id: i64) -> Result<DeleteOutcome> {
    self
      .delete_scoped(
        "DELETE FROM indicators WHERE country = ?1 AND id = ?2".into(),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Foresight items ───────────────────────────────────────────────────────

  async fn add_foresight(
    &self,
    kind: ForesightKind,
    item: NewForesightItem,
  ) -> Result<ForesightItem> {
    let table = foresight_table(kind);
    let fields = item.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} (country, code, steep_category_id,
               description, source_id, url, ownership, summary, file_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          params![
            fields.country,
            fields.code,
            fields.steep_category_id,
            fields.description,
            fields.source_id,
            fields.url,
            fields.ownership,
            fields.summary,
            fields.file_path,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ForesightItem {
      id,
      country:           item.country,
      kind,
      code:              item.code,
      steep_category_id: item.steep_category_id,
      description:       item.description,
      source_id:         item.source_id,
      url:               item.url,
      ownership:         item.ownership,
      summary:           item.summary,
      file_path:         item.file_path,
    })
  }

  async fn get_foresight(
    &self,
    kind: ForesightKind,
    country: &str,
    id: i64,
  ) -> Result<Option<ForesightItem>> {
    let table = foresight_table(kind);
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {FORESIGHT_COLS} FROM {table}
                 WHERE country = ?1 AND id = ?2"
              ),
              params![country, id],
              |row| foresight_from_row(kind, row),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_foresight(
    &self,
    kind: ForesightKind,
    country: &str,
    query: ListQuery,
  ) -> Result<Vec<ForesightItem>> {
    let table = foresight_table(kind);
    let country = country.to_owned();
    let (limit, offset) = window(query);
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FORESIGHT_COLS} FROM {table}
           WHERE country = ?1 ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(params![country, limit, offset], |row| {
            foresight_from_row(kind, row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn count_foresight(
    &self,
    kind: ForesightKind,
    country: &str,
  ) -> Result<usize> {
    let table = foresight_table(kind);
    self
      .count_scoped(
        format!("SELECT COUNT(*) FROM {table} WHERE country = ?1"),
        country.to_owned(),
      )
      .await
  }

  async fn update_foresight(
    &self,
    kind: ForesightKind,
    country: &str,
    id: i64,
    fields: NewForesightItem,
  ) -> Result<bool> {
    let table = foresight_table(kind);
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!(
            "UPDATE {table} SET country = ?3, code = ?4,
               steep_category_id = ?5, description = ?6, source_id = ?7,
               url = ?8, ownership = ?9, summary = ?10, file_path = ?11
             WHERE country = ?1 AND id = ?2"
          ),
          params![
            country,
            id,
            fields.country,
            fields.code,
            fields.steep_category_id,
            fields.description,
            fields.source_id,
            fields.url,
            fields.ownership,
            fields.summary,
            fields.file_path,
          ],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_foresight(
    &self,
    kind: ForesightKind,
    country: &str,
    id: i64,
  ) -> Result<DeleteOutcome> {
    let table = foresight_table(kind);
    self
      .delete_scoped(
        format!("DELETE FROM {table} WHERE country = ?1 AND id = ?2"),
        country.to_owned(),
        id,
      )
      .await
  }

  // ── Interlinks ────────────────────────────────────────────────────────────

  async fn add_interlink(&self, interlink: NewInterlink) -> Result<Interlink> {
    let fields = interlink.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interlinks (country, gmt_id, trend_id,
             indicator_1_id, indicator_2_id, indicator_3_id, indicator_4_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            fields.country,
            fields.gmt_id,
            fields.trend_id,
            fields.indicator_1_id,
            fields.indicator_2_id,
            fields.indicator_3_id,
            fields.indicator_4_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Interlink {
      id,
      country:        interlink.country,
      gmt_id:         interlink.gmt_id,
      trend_id:       interlink.trend_id,
      indicator_1_id: interlink.indicator_1_id,
      indicator_2_id: interlink.indicator_2_id,
      indicator_3_id: interlink.indicator_3_id,
      indicator_4_id: interlink.indicator_4_id,
    })
  }

  async fn get_interlink(&self, country: &str, id: i64) -> Result<Option<Interlink>> {
    let country = country.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INTERLINK_COLS} FROM interlinks
                 WHERE country = ?1 AND id = ?2"
              ),
              params![country, id],
              interlink_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_interlinks(
    &self,
    country: &str,
    query: ListQuery,
  ) -> Result<Vec<Interlink>> {
    let country = country.to_owned();
    let (limit, offset) = window(query);
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INTERLINK_COLS} FROM interlinks
           WHERE country = ?1 ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(params![country, limit, offset], interlink_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn count_interlinks(&self, country: &str) -> Result<usize> {
    self
      .count_scoped(
        "SELECT COUNT(*) FROM interlinks WHERE country = ?1".into(),
        country.to_owned(),
      )
      .await
  }

  async fn update_interlink(
    &self,
    country: &str,
    id: i64,
    fields: NewInterlink,
  ) -> Result<bool> {
    let country = country.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE interlinks SET country = ?3, gmt_id = ?4, trend_id = ?5,
             indicator_1_id = ?6, indicator_2_id = ?7, indicator_3_id = ?8,
             indicator_4_id = ?9
           WHERE country = ?1 AND id = ?2",
          params![
            country,
            id,
            fields.country,
            fields.gmt_id,
            fields.trend_id,
            fields.indicator_1_id,
            fields.indicator_2_id,
            fields.indicator_3_id,
            fields.indicator_4_id,
          ],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_interlink(&self, country: &str, id: i64) -> Result<DeleteOutcome> {
    self
      .delete_scoped(
        "DELETE FROM interlinks WHERE country = ?1 AND id = ?2".into(),
        country.to_owned(),
        id,
      )
      .await
  }
}
