use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::models::JobOffer;

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

#[derive(Debug, Default, PartialEq)]
pub struct LoadStats {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Database {
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobharvest") {
            Ok(proj_dirs.data_dir().join("offers.db"))
        } else {
            Ok(PathBuf::from("offers.db"))
        }
    }

    pub fn init(&self) -> Result<()> {
        // offer_id is owned by the table; the scraped site id is never loaded.
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS offers (
                offer_id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company_name TEXT,
                location TEXT,
                description TEXT,
                experience TEXT,
                study_level TEXT,
                sector_activity TEXT,
                skills TEXT,
                modality TEXT CHECK (modality IN ('OnSite', 'Hybrid', 'Remote')),
                flexible_hours INTEGER NOT NULL DEFAULT 0 CHECK (flexible_hours IN (0, 1)),
                basic_salary TEXT,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                date_publication TEXT,
                date_expiration TEXT,
                offer_url TEXT,
                created_at TEXT,
                updated_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_offers_status ON offers(status);
            CREATE INDEX IF NOT EXISTS idx_offers_publication ON offers(date_publication);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='offers'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!(
                "Database not initialized. Run 'jobharvest init' first."
            ));
        }
        Ok(())
    }

    /// Best-effort batch load. Rows without a title are logged and skipped;
    /// a row the database rejects is logged with the offer's title and the
    /// batch continues. One transaction, committed after every row has been
    /// attempted, so everything that succeeded stays in.
    pub fn load_offers(&mut self, offers: &[JobOffer]) -> Result<LoadStats> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin transaction")?;
        let mut stats = LoadStats::default();

        for offer in offers {
            let Some(title) = offer.title.as_deref() else {
                eprintln!(
                    "Skipping offer with no title (url: {})",
                    offer.offer_url.as_deref().unwrap_or("unknown")
                );
                stats.skipped += 1;
                continue;
            };

            let result = tx.execute(
                "INSERT INTO offers (
                    title, company_name, location, description, experience,
                    study_level, sector_activity, skills, modality, flexible_hours,
                    basic_salary, status, date_publication, date_expiration,
                    offer_url, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    title,
                    offer.company_name,
                    offer.location,
                    offer.description,
                    offer.experience,
                    offer.study_level,
                    offer.sector_activity,
                    offer.skills,
                    offer.modality,
                    offer.flexible_hours.unwrap_or(0),
                    offer.basic_salary,
                    offer.status,
                    offer.date_publication,
                    offer.date_expiration,
                    offer.offer_url,
                    offer.created_at,
                    offer.updated_at,
                ],
            );

            match result {
                Ok(_) => stats.inserted += 1,
                Err(e) => {
                    stats.failed += 1;
                    eprintln!("Failed to insert offer '{}': {}", title, e);
                }
            }
        }

        tx.commit().context("Failed to commit offer batch")?;
        Ok(stats)
    }

    pub fn count_offers(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM offers", [], |row| row.get(0))?;
        Ok(count)
    }
}
