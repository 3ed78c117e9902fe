//! # Band Store
//!
//! SQLite persistence for bands and slides. The store is the single source of truth
//! once a change has been persisted: every mutation loads the current rows, applies the
//! change through the shared band model (`common::model`), and writes the result back in
//! one transaction. A rejected change leaves the database untouched.
//!
//! ## Tables
//!
//! - `bands`: one row per band. `payload` holds the type-specific JSON (slideshow
//!   payloads are stored without their slides), `visual` the presentation settings.
//! - `slides`: one row per slideshow slide, ranked by `position` within its band.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use common::model::{
    Band, BandKind, BandPayload, ImageRef, Page, Slide, SlideDraft, VisualConfig,
};
use common::reorder::ReorderIntent;
use common::upload::UploadSlot;
use common::BandError;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Band(#[from] BandError),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the store lock was poisoned")]
    Poisoned,
}

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS bands (
        id       TEXT PRIMARY KEY,
        page_id  TEXT NOT NULL,
        kind     TEXT NOT NULL,
        position INTEGER NOT NULL,
        payload  TEXT NOT NULL,
        visual   TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS bands_by_page ON bands (page_id, position);
    CREATE TABLE IF NOT EXISTS slides (
        id              TEXT PRIMARY KEY,
        band_id         TEXT NOT NULL REFERENCES bands (id) ON DELETE CASCADE,
        position        INTEGER NOT NULL,
        image           TEXT NOT NULL,
        alt             TEXT NOT NULL DEFAULT '',
        title           TEXT NOT NULL DEFAULT '',
        subtitle        TEXT NOT NULL DEFAULT '',
        link            TEXT NOT NULL DEFAULT '',
        seo_title       TEXT NOT NULL DEFAULT '',
        seo_description TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS slides_by_band ON slides (band_id, position);
";

/// Shared handle on the database, registered as `web::Data<BandStore>`.
pub struct BandStore {
    conn: Mutex<Connection>,
}

impl BandStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Ordered bands of a page with their slides. Unknown pages are empty.
    pub fn read_page(&self, page_id: &str) -> Result<Vec<Band>, StoreError> {
        Ok(self.load_page(page_id)?.into_bands())
    }

    pub fn load_page(&self, page_id: &str) -> Result<Page, StoreError> {
        let conn = self.lock()?;
        load_page(&conn, page_id)
    }

    pub fn band(&self, band_id: &str) -> Result<Band, StoreError> {
        let conn = self.lock()?;
        read_band(&conn, band_id)
    }

    /// Appends a band to a page. A missing payload means the empty payload of `kind`.
    pub fn create_band(
        &self,
        page_id: &str,
        kind: &str,
        payload: Option<BandPayload>,
        visual: VisualConfig,
    ) -> Result<Band, StoreError> {
        let payload = match payload {
            Some(payload) => payload,
            None => BandKind::from_str(kind)?.empty_payload(),
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut page = load_page(&tx, page_id)?;
        let band = page.add_band(kind, payload, visual)?.clone();
        insert_band(&tx, &band)?;
        for slide in band.slides() {
            insert_slide(&tx, slide)?;
        }
        tx.commit()?;

        info!("Created {} band {} on page {}", band.kind(), band.id, page_id);
        Ok(band)
    }

    /// Updates the payload and visual settings of an existing band.
    ///
    /// The page, the type and the order are never changed here. For slideshows the
    /// slide set must match the stored one; slide content is updated, positions are kept.
    pub fn save_band(&self, band: &Band) -> Result<Band, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let stored = read_band(&tx, &band.id)?;
        if stored.page_id != band.page_id {
            return Err(BandError::validation("a band cannot move to another page").into());
        }
        if stored.kind() != band.kind() {
            return Err(BandError::validation(format!(
                "band type cannot change from {} to {}",
                stored.kind(),
                band.kind()
            ))
            .into());
        }

        let mut updated = band.clone();
        updated.order = stored.order;
        match (&mut updated.payload, &stored.payload) {
            (BandPayload::Slideshow(show), _) => {
                let stored_slides: HashMap<&str, &Slide> = stored
                    .slides()
                    .iter()
                    .map(|slide| (slide.id.as_str(), slide))
                    .collect();
                let incoming: HashSet<&str> = show.slides.iter().map(|s| s.id.as_str()).collect();
                if incoming.len() != show.slides.len()
                    || incoming != stored_slides.keys().copied().collect::<HashSet<_>>()
                {
                    return Err(BandError::validation(
                        "slides are added, removed and reordered through the slide endpoints",
                    )
                    .into());
                }
                for slide in &mut show.slides {
                    if let Some(kept) = stored_slides.get(slide.id.as_str()) {
                        slide.position = kept.position;
                        keep_stored_image(&mut slide.image, &kept.image);
                    }
                }
                show.slides.sort_by_key(|slide| slide.position);
            }
            (BandPayload::Product(product), BandPayload::Product(kept)) => {
                keep_stored_image(&mut product.image, &kept.image);
            }
            _ => {}
        }
        updated.validate()?;

        tx.execute(
            "UPDATE bands SET payload = ?1, visual = ?2 WHERE id = ?3",
            params![
                payload_json(&updated.payload)?,
                serde_json::to_string(&updated.visual)?,
                &updated.id
            ],
        )?;
        for slide in updated.slides() {
            update_slide_content(&tx, slide)?;
        }
        tx.commit()?;

        info!("Saved band {}", updated.id);
        Ok(updated)
    }

    /// Deletes a band and its slides, compacting the order of the bands after it.
    pub fn delete_band(&self, band_id: &str) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let band = read_band(&tx, band_id)?;
        let mut page = load_page(&tx, &band.page_id)?;
        page.remove_band(band_id)?;

        tx.execute("DELETE FROM slides WHERE band_id = ?1", params![band_id])?;
        tx.execute("DELETE FROM bands WHERE id = ?1", params![band_id])?;
        write_band_positions(&tx, page.bands())?;
        tx.commit()?;

        info!("Deleted band {} from page {}", band_id, band.page_id);
        Ok(())
    }

    /// Applies a band reorder intent atomically. The intent must be a permutation of the
    /// page's current bands; otherwise nothing is written.
    pub fn reorder_bands(&self, page_id: &str, intent: &ReorderIntent) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut page = load_page(&tx, page_id)?;
        page.apply_intent(intent)?;
        write_band_positions(&tx, page.bands())?;
        tx.commit()?;

        info!("Reordered {} bands on page {}", page.bands().len(), page_id);
        Ok(())
    }

    pub fn create_slide(&self, band_id: &str, draft: SlideDraft) -> Result<Slide, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut band = read_band(&tx, band_id)?;
        let slide = band.add_slide(draft)?;
        insert_slide(&tx, &slide)?;
        tx.commit()?;

        info!("Added slide {} to band {}", slide.id, band_id);
        Ok(slide)
    }

    /// Updates the content of a slide; its band and position stay as stored.
    pub fn save_slide(&self, slide: &Slide) -> Result<Slide, StoreError> {
        let conn = self.lock()?;
        let band = read_band(&conn, &slide.band_id)?;
        let stored = band
            .slides()
            .iter()
            .find(|s| s.id == slide.id)
            .ok_or_else(|| BandError::not_found(format!("slide '{}'", slide.id)))?;

        let mut updated = slide.clone();
        updated.position = stored.position;
        keep_stored_image(&mut updated.image, &stored.image);
        updated.validate()?;
        update_slide_content(&conn, &updated)?;
        Ok(updated)
    }

    pub fn delete_slide(&self, slide_id: &str) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let band_id = slide_owner(&tx, slide_id)?;
        let mut band = read_band(&tx, &band_id)?;
        band.remove_slide(slide_id)?;

        tx.execute("DELETE FROM slides WHERE id = ?1", params![slide_id])?;
        write_slide_positions(&tx, band.slides())?;
        tx.commit()?;

        info!("Deleted slide {} from band {}", slide_id, band_id);
        Ok(())
    }

    /// Applies a slide reorder intent atomically, scoped to one band of `page_id`.
    pub fn reorder_slides(
        &self,
        page_id: &str,
        band_id: &str,
        intent: &ReorderIntent,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut band = read_band(&tx, band_id)?;
        if band.page_id != page_id {
            return Err(BandError::not_found(format!(
                "band '{band_id}' on page '{page_id}'"
            ))
            .into());
        }
        band.apply_slide_intent(intent)?;
        write_slide_positions(&tx, band.slides())?;
        tx.commit()?;

        info!("Reordered {} slides in band {}", band.slides().len(), band_id);
        Ok(())
    }

    /// Substitutes a finished upload's path into the slot's image field.
    pub fn set_image(&self, slot: &UploadSlot, path: &str) -> Result<(), StoreError> {
        let image = ImageRef::path(path);
        let conn = self.lock()?;
        match slot {
            UploadSlot::SlideImage { slide_id } => {
                let updated = conn.execute(
                    "UPDATE slides SET image = ?1 WHERE id = ?2",
                    params![serde_json::to_string(&image)?, slide_id],
                )?;
                if updated == 0 {
                    return Err(BandError::not_found(format!("slide '{slide_id}'")).into());
                }
            }
            UploadSlot::ProductImage { band_id } => {
                let mut band = read_band(&conn, band_id)?;
                match &mut band.payload {
                    BandPayload::Product(product) => product.image = image,
                    _ => {
                        return Err(BandError::validation(format!(
                            "band '{band_id}' is not a product band"
                        ))
                        .into())
                    }
                }
                conn.execute(
                    "UPDATE bands SET payload = ?1 WHERE id = ?2",
                    params![payload_json(&band.payload)?, band_id],
                )?;
            }
        }
        info!("Stored image {} for {}", path, slot);
        Ok(())
    }
}

struct BandRow {
    id: String,
    page_id: String,
    kind: String,
    position: i64,
    payload: String,
    visual: String,
}

impl BandRow {
    const COLUMNS: &'static str = "id, page_id, kind, position, payload, visual";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            page_id: row.get(1)?,
            kind: row.get(2)?,
            position: row.get(3)?,
            payload: row.get(4)?,
            visual: row.get(5)?,
        })
    }

    fn into_band(self, conn: &Connection) -> Result<Band, StoreError> {
        let kind = BandKind::from_str(&self.kind)?;
        let mut payload: BandPayload = serde_json::from_str(&self.payload)?;
        if payload.kind() != kind {
            return Err(BandError::validation(format!(
                "band '{}' is stored as {} but carries a {} payload",
                self.id,
                kind,
                payload.kind()
            ))
            .into());
        }
        if let BandPayload::Slideshow(show) = &mut payload {
            show.slides = read_slides(conn, &self.id)?;
        }

        Ok(Band {
            order: to_rank(self.position)?,
            visual: serde_json::from_str(&self.visual)?,
            id: self.id,
            page_id: self.page_id,
            payload,
        })
    }
}

struct SlideRow {
    slide: Slide,
    image: String,
    position: i64,
}

impl SlideRow {
    const COLUMNS: &'static str =
        "id, band_id, position, image, alt, title, subtitle, link, seo_title, seo_description";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            slide: Slide {
                id: row.get(0)?,
                band_id: row.get(1)?,
                position: 0,
                image: ImageRef::Missing,
                alt: row.get(4)?,
                title: row.get(5)?,
                subtitle: row.get(6)?,
                link: row.get(7)?,
                seo_title: row.get(8)?,
                seo_description: row.get(9)?,
            },
            position: row.get(2)?,
            image: row.get(3)?,
        })
    }

    fn into_slide(self) -> Result<Slide, StoreError> {
        let mut slide = self.slide;
        slide.position = to_rank(self.position)?;
        slide.image = serde_json::from_str(&self.image)?;
        Ok(slide)
    }
}

fn to_rank(position: i64) -> Result<usize, StoreError> {
    usize::try_from(position)
        .map_err(|_| BandError::invalid_ordering(format!("negative position {position}")).into())
}

fn load_page(conn: &Connection, page_id: &str) -> Result<Page, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM bands WHERE page_id = ?1 ORDER BY position",
        BandRow::COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![page_id], BandRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    let bands = rows
        .into_iter()
        .map(|row| row.into_band(conn))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::from_bands(page_id, bands)?)
}

fn read_band(conn: &Connection, band_id: &str) -> Result<Band, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM bands WHERE id = ?1", BandRow::COLUMNS),
            params![band_id],
            BandRow::from_row,
        )
        .optional()?
        .ok_or_else(|| BandError::not_found(format!("band '{band_id}'")))?;
    row.into_band(conn)
}

fn read_slides(conn: &Connection, band_id: &str) -> Result<Vec<Slide>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM slides WHERE band_id = ?1 ORDER BY position",
        SlideRow::COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![band_id], SlideRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(SlideRow::into_slide).collect()
}

fn slide_owner(conn: &Connection, slide_id: &str) -> Result<String, StoreError> {
    conn.query_row(
        "SELECT band_id FROM slides WHERE id = ?1",
        params![slide_id],
        |row| row.get::<_, String>(0),
    )
    .optional()?
    .ok_or_else(|| BandError::not_found(format!("slide '{slide_id}'")).into())
}

/// Payload JSON as stored: slideshow slides live in their own table.
fn payload_json(payload: &BandPayload) -> Result<String, StoreError> {
    let mut stored = payload.clone();
    if let BandPayload::Slideshow(show) = &mut stored {
        show.slides.clear();
    }
    Ok(serde_json::to_string(&stored)?)
}

fn insert_band(conn: &Connection, band: &Band) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO bands (id, page_id, kind, position, payload, visual)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &band.id,
            &band.page_id,
            band.kind().as_str(),
            band.order as i64,
            payload_json(&band.payload)?,
            serde_json::to_string(&band.visual)?
        ],
    )?;
    Ok(())
}

fn insert_slide(conn: &Connection, slide: &Slide) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO slides (id, band_id, position, image, alt, title, subtitle, link, seo_title, seo_description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            &slide.id,
            &slide.band_id,
            slide.position as i64,
            serde_json::to_string(&slide.image)?,
            &slide.alt,
            &slide.title,
            &slide.subtitle,
            &slide.link,
            &slide.seo_title,
            &slide.seo_description
        ],
    )?;
    Ok(())
}

/// An upload still in flight in the editor never replaces what is stored;
/// only the upload pipeline binds finished paths.
fn keep_stored_image(incoming: &mut ImageRef, stored: &ImageRef) {
    if incoming.is_pending() {
        *incoming = stored.clone();
    }
}

fn update_slide_content(conn: &Connection, slide: &Slide) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE slides SET image = ?1, alt = ?2, title = ?3, subtitle = ?4, link = ?5,
                seo_title = ?6, seo_description = ?7
         WHERE id = ?8",
        params![
            serde_json::to_string(&slide.image)?,
            &slide.alt,
            &slide.title,
            &slide.subtitle,
            &slide.link,
            &slide.seo_title,
            &slide.seo_description,
            &slide.id
        ],
    )?;
    Ok(())
}

fn write_band_positions(conn: &Connection, bands: &[Band]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("UPDATE bands SET position = ?1 WHERE id = ?2")?;
    for band in bands {
        stmt.execute(params![band.order as i64, &band.id])?;
    }
    Ok(())
}

fn write_slide_positions(conn: &Connection, slides: &[Slide]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("UPDATE slides SET position = ?1 WHERE id = ?2")?;
    for slide in slides {
        stmt.execute(params![slide.position as i64, &slide.id])?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
