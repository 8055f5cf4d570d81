use std::path::Path;

use rusqlite::{
    types::{FromSql, FromSqlResult, ToSqlOutput, Value, ValueRef},
    Connection, OpenFlags, ToSql,
};
use tracing::{debug, info, instrument};

use crate::error::CinestatError;

use super::records::{BoxOfficeRow, FieldValue, RatingRow, RuntimeRow, StockRow};

/// Read-only access to the collected movie and stock tables.
pub trait MovieStore {
    fn box_office_rows(&self) -> Result<Vec<BoxOfficeRow>, CinestatError>;
    fn rating_rows(&self) -> Result<Vec<RatingRow>, CinestatError>;
    fn runtime_rows(&self) -> Result<Vec<RuntimeRow>, CinestatError>;
    fn stock_rows(&self) -> Result<Vec<StockRow>, CinestatError>;
}

impl FromSql for FieldValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null | ValueRef::Blob(_) => FieldValue::Null,
            ValueRef::Integer(i) => FieldValue::Integer(i),
            ValueRef::Real(r) => FieldValue::Real(r),
            ValueRef::Text(t) => FieldValue::Text(String::from_utf8_lossy(t).into_owned()),
        })
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Real(r) => ToSqlOutput::Owned(Value::Real(*r)),
            FieldValue::Text(t) => ToSqlOutput::Borrowed(ValueRef::Text(t.as_bytes())),
        })
    }
}

/// SQLite database written by the collectors, opened read-only.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    #[instrument(skip(db_path), fields(path = %db_path.as_ref().display()))]
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, CinestatError> {
        let conn = Connection::open_with_flags(
            db_path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.pragma_update(None, "query_only", true)?;
        info!("Opened movie database");
        Ok(Self { conn })
    }

    fn read_rows<T, F>(&self, sql: &str, map: F) -> Result<Vec<T>, CinestatError>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], map)?
            .collect::<Result<Vec<T>, _>>()?;
        debug!(rows = rows.len(), sql, "Read rows");
        Ok(rows)
    }
}

impl MovieStore for SqliteStore {
    fn box_office_rows(&self) -> Result<Vec<BoxOfficeRow>, CinestatError> {
        self.read_rows("SELECT id, year, box FROM BoxInfo", |row| {
            Ok(BoxOfficeRow {
                id: row.get(0)?,
                year: row.get(1)?,
                gross: row.get(2)?,
            })
        })
    }

    fn rating_rows(&self) -> Result<Vec<RatingRow>, CinestatError> {
        self.read_rows("SELECT id, Rating, Year FROM Movies", |row| {
            Ok(RatingRow {
                id: row.get(0)?,
                rating: row.get(1)?,
                year: row.get(2)?,
            })
        })
    }

    fn runtime_rows(&self) -> Result<Vec<RuntimeRow>, CinestatError> {
        self.read_rows(
            "SELECT Runtimes.id, Runtimes.Runtimes, Movies.Year
             FROM Runtimes INNER JOIN Movies ON Movies.id = Runtimes.id",
            |row| {
                Ok(RuntimeRow {
                    id: row.get(0)?,
                    runtime: row.get(1)?,
                    year: row.get(2)?,
                })
            },
        )
    }

    fn stock_rows(&self) -> Result<Vec<StockRow>, CinestatError> {
        self.read_rows("SELECT Date, Price FROM Stock", |row| {
            Ok(StockRow {
                date: row.get(0)?,
                price: row.get(1)?,
            })
        })
    }
}

/// Rows held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub box_office: Vec<BoxOfficeRow>,
    pub ratings: Vec<RatingRow>,
    pub runtimes: Vec<RuntimeRow>,
    pub stocks: Vec<StockRow>,
}

impl MemoryStore {
    /// Adds one film to every movie table.
    pub fn with_movie(
        mut self,
        id: i64,
        year: i32,
        rating: impl Into<FieldValue>,
        runtime: impl Into<FieldValue>,
        gross: impl Into<FieldValue>,
    ) -> Self {
        let year = FieldValue::Integer(year as i64);
        self.box_office.push(BoxOfficeRow {
            id,
            year: year.clone(),
            gross: gross.into(),
        });
        self.ratings.push(RatingRow {
            id,
            rating: rating.into(),
            year: year.clone(),
        });
        self.runtimes.push(RuntimeRow {
            id,
            runtime: runtime.into(),
            year,
        });
        self
    }

    pub fn with_stock(mut self, date: impl Into<FieldValue>, price: impl Into<FieldValue>) -> Self {
        self.stocks.push(StockRow {
            date: date.into(),
            price: price.into(),
        });
        self
    }
}

impl MovieStore for MemoryStore {
    fn box_office_rows(&self) -> Result<Vec<BoxOfficeRow>, CinestatError> {
        Ok(self.box_office.clone())
    }

    fn rating_rows(&self) -> Result<Vec<RatingRow>, CinestatError> {
        Ok(self.ratings.clone())
    }

    fn runtime_rows(&self) -> Result<Vec<RuntimeRow>, CinestatError> {
        Ok(self.runtimes.clone())
    }

    fn stock_rows(&self) -> Result<Vec<StockRow>, CinestatError> {
        Ok(self.stocks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::write_fixture_database;
    use tempfile::NamedTempFile;

    fn fixture() -> MemoryStore {
        MemoryStore::default()
            .with_movie(1, 2001, 8.5, "152 min", 871_500_000i64)
            .with_movie(2, 2002, "N/A", "N/A", FieldValue::Null)
            .with_stock("2001", 105.2)
            .with_stock("2002", 98.7)
    }

    #[test]
    fn test_sqlite_store_reads_loosely_typed_cells() {
        let file = NamedTempFile::new().unwrap();
        write_fixture_database(file.path(), &fixture()).unwrap();

        let store = SqliteStore::open(file.path()).unwrap();

        let box_rows = store.box_office_rows().unwrap();
        assert_eq!(box_rows.len(), 2);
        assert_eq!(box_rows[0].gross, FieldValue::Integer(871_500_000));
        assert_eq!(box_rows[1].gross, FieldValue::Null);

        let ratings = store.rating_rows().unwrap();
        assert_eq!(ratings[0].rating, FieldValue::Real(8.5));
        assert_eq!(ratings[1].rating, FieldValue::Text("N/A".to_string()));

        let runtimes = store.runtime_rows().unwrap();
        assert_eq!(runtimes[0].runtime, FieldValue::Text("152 min".to_string()));
        assert_eq!(runtimes[0].year.as_year(), Some(2001));

        let stocks = store.stock_rows().unwrap();
        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].date.as_year(), Some(2001));
        assert_eq!(stocks[1].price.as_number(), Some(98.7));
    }

    #[test]
    fn test_sqlite_store_is_read_only() {
        let file = NamedTempFile::new().unwrap();
        write_fixture_database(file.path(), &fixture()).unwrap();
        let store = SqliteStore::open(file.path()).unwrap();
        let result = store
            .conn
            .execute("INSERT INTO Stock (Date, Price) VALUES ('2003', 1.0)", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_sqlite_store_missing_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(matches!(
            SqliteStore::open(&path),
            Err(CinestatError::SqliteError(_))
        ));
    }

    #[test]
    fn test_memory_store_keeps_insertion_order() {
        let store = fixture();
        let ids: Vec<i64> = store.box_office_rows().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
