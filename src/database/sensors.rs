/// Sensor catalog and sensor installation CRUD
use rusqlite::{params, OptionalExtension, Row};

use super::{NewSensorInstallation, NewSensorType, Page, SensorInstallation, SensorType, SqliteStore};
use crate::errors::StoreError;

const CATALOG_COLUMNS: &str =
    "id_sensor, sensor, description, model, brand, measurement_range, unit";
const INSTALLED_SELECT: &str = "
    SELECT si.id_sensor_installed, si.id_installation, si.id_sensor, sc.sensor, sc.unit,
           si.installed_on, si.description, si.id_reading
    FROM sensor_installed si
    JOIN sensor_catalog sc ON sc.id_sensor = si.id_sensor";

fn row_to_sensor_type(row: &Row<'_>) -> rusqlite::Result<SensorType> {
    Ok(SensorType {
        id: row.get(0)?,
        sensor: row.get(1)?,
        description: row.get(2)?,
        model: row.get(3)?,
        brand: row.get(4)?,
        measurement_range: row.get(5)?,
        unit: row.get(6)?,
    })
}

fn row_to_sensor_installation(row: &Row<'_>) -> rusqlite::Result<SensorInstallation> {
    Ok(SensorInstallation {
        id: row.get(0)?,
        installation_id: row.get(1)?,
        sensor_id: row.get(2)?,
        sensor: row.get(3)?,
        unit: row.get(4)?,
        installed_on: row.get(5)?,
        description: row.get(6)?,
        last_reading_id: row.get(7)?,
    })
}

impl SqliteStore {
    // =========================================================================
    // SENSOR CATALOG
    // =========================================================================

    pub async fn create_sensor_type(&self, new: NewSensorType) -> Result<SensorType, StoreError> {
        self.with_write(move |conn| {
            conn.execute(
                "INSERT INTO sensor_catalog
                    (sensor, description, model, brand, measurement_range, unit)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new.sensor,
                    new.description,
                    new.model,
                    new.brand,
                    new.measurement_range,
                    new.unit
                ],
            )?;
            Ok(SensorType {
                id: conn.last_insert_rowid(),
                sensor: new.sensor,
                description: new.description,
                model: new.model,
                brand: new.brand,
                measurement_range: new.measurement_range,
                unit: new.unit,
            })
        })
        .await
    }

    pub async fn get_sensor_type(&self, id: i64) -> Result<Option<SensorType>, StoreError> {
        self.with_read(move |conn| {
            let found = conn
                .query_row(
                    &format!("SELECT {} FROM sensor_catalog WHERE id_sensor = ?1", CATALOG_COLUMNS),
                    params![id],
                    row_to_sensor_type,
                )
                .optional()?;
            Ok(found)
        })
        .await
    }

    pub async fn list_sensor_types(&self, page: Page) -> Result<Vec<SensorType>, StoreError> {
        self.with_read(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM sensor_catalog ORDER BY id_sensor LIMIT ?1 OFFSET ?2",
                CATALOG_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![page.limit, page.offset], row_to_sensor_type)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Fails with a constraint violation while any installation still uses it
    pub async fn delete_sensor_type(&self, id: i64) -> Result<bool, StoreError> {
        self.with_write(move |conn| {
            let changed =
                conn.execute("DELETE FROM sensor_catalog WHERE id_sensor = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
    }

    // =========================================================================
    // SENSOR INSTALLATIONS
    // =========================================================================

    pub async fn create_sensor_installation(
        &self,
        new: NewSensorInstallation,
    ) -> Result<SensorInstallation, StoreError> {
        self.with_write(move |conn| {
            conn.execute(
                "INSERT INTO sensor_installed (id_installation, id_sensor, installed_on, description)
                 VALUES (?1, ?2, ?3, ?4)",
                params![new.installation_id, new.sensor_id, new.installed_on, new.description],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("{} WHERE si.id_sensor_installed = ?1", INSTALLED_SELECT),
                params![id],
                row_to_sensor_installation,
            )
            .map_err(StoreError::from)
        })
        .await
    }

    pub async fn get_sensor_installation(
        &self,
        id: i64,
    ) -> Result<Option<SensorInstallation>, StoreError> {
        self.with_read(move |conn| {
            let found = conn
                .query_row(
                    &format!("{} WHERE si.id_sensor_installed = ?1", INSTALLED_SELECT),
                    params![id],
                    row_to_sensor_installation,
                )
                .optional()?;
            Ok(found)
        })
        .await
    }

    pub async fn list_sensor_installations(
        &self,
        installation_id: Option<i64>,
        page: Page,
    ) -> Result<Vec<SensorInstallation>, StoreError> {
        self.with_read(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{}
                 WHERE (?1 IS NULL OR si.id_installation = ?1)
                 ORDER BY si.id_sensor_installed
                 LIMIT ?2 OFFSET ?3",
                INSTALLED_SELECT
            ))?;
            let rows = stmt
                .query_map(
                    params![installation_id, page.limit, page.offset],
                    row_to_sensor_installation,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Removes the sensor installation and, by cascade, its readings
    pub async fn delete_sensor_installation(&self, id: i64) -> Result<bool, StoreError> {
        self.with_write(move |conn| {
            let changed = conn.execute(
                "DELETE FROM sensor_installed WHERE id_sensor_installed = ?1",
                params![id],
            )?;
            Ok(changed > 0)
        })
        .await
    }
}
