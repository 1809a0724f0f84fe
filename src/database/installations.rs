/// Installation CRUD
use rusqlite::{params, OptionalExtension, Row};

use super::{Installation, NewInstallation, Page, SqliteStore};
use crate::errors::StoreError;

const COLUMNS: &str = "id_installation, id_branch, name, installed_on, operational_status, \
                       description, usage_type, created_at";

fn row_to_installation(row: &Row<'_>) -> rusqlite::Result<Installation> {
    Ok(Installation {
        id: row.get(0)?,
        branch_id: row.get(1)?,
        name: row.get(2)?,
        installed_on: row.get(3)?,
        operational_status: row.get(4)?,
        description: row.get(5)?,
        usage_type: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl SqliteStore {
    pub async fn create_installation(
        &self,
        new: NewInstallation,
    ) -> Result<Installation, StoreError> {
        self.with_write(move |conn| {
            conn.execute(
                "INSERT INTO installation
                    (id_branch, name, installed_on, operational_status, description, usage_type)
                 VALUES (?1, ?2, ?3, COALESCE(?4, 'active'), ?5, COALESCE(?6, 'aquaculture'))",
                params![
                    new.branch_id,
                    new.name,
                    new.installed_on,
                    new.operational_status,
                    new.description,
                    new.usage_type
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {} FROM installation WHERE id_installation = ?1", COLUMNS),
                params![id],
                row_to_installation,
            )
            .map_err(StoreError::from)
        })
        .await
    }

    pub async fn get_installation(&self, id: i64) -> Result<Option<Installation>, StoreError> {
        self.with_read(move |conn| {
            let found = conn
                .query_row(
                    &format!("SELECT {} FROM installation WHERE id_installation = ?1", COLUMNS),
                    params![id],
                    row_to_installation,
                )
                .optional()?;
            Ok(found)
        })
        .await
    }

    /// Installations by id, optionally for one branch
    pub async fn list_installations(
        &self,
        branch_id: Option<i64>,
        page: Page,
    ) -> Result<Vec<Installation>, StoreError> {
        self.with_read(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM installation
                 WHERE (?1 IS NULL OR id_branch = ?1)
                 ORDER BY id_installation
                 LIMIT ?2 OFFSET ?3",
                COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![branch_id, page.limit, page.offset], row_to_installation)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Returns false when nothing was deleted
    pub async fn delete_installation(&self, id: i64) -> Result<bool, StoreError> {
        self.with_write(move |conn| {
            let changed =
                conn.execute("DELETE FROM installation WHERE id_installation = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
    }
}
