use std::collections::HashSet;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::info;
use crate::db::query;
use crate::error::StoreError;
use crate::models::image::{Category, NewCategory, NewImage, PortfolioImage};

/// Lowercase, URL-safe slug: ASCII alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub fn create_category(conn: &Connection, new: NewCategory) -> Result<Category> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(StoreError::Invalid("category title must not be empty".into()).into());
    }
    let slug = match new.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => slugify(s),
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(StoreError::Invalid(format!("cannot derive a slug from {:?}", title)).into());
    }
    let taken: Option<String> = conn
        .query_row("SELECT id FROM categories WHERE slug = ?", params![slug], |r| r.get(0))
        .optional()?;
    if taken.is_some() {
        return Err(StoreError::Invalid(format!("slug {:?} is already in use", slug)).into());
    }

    let category = Category {
        id: slug.clone(),
        title: title.to_string(),
        description: new.description,
        slug,
        cover_image: new.cover_image,
        order: new.order,
        featured: new.featured,
        image_count: 0,
        created_at: chrono::Utc::now().timestamp_millis(),
    };
    conn.execute(
        "INSERT INTO categories (id, title, description, slug, cover_image, sort_order, featured, image_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
        params![
            category.id,
            category.title,
            category.description,
            category.slug,
            category.cover_image,
            category.order,
            category.featured,
            category.created_at,
        ],
    )?;
    info!(category = %category.id, "category created");
    Ok(category)
}

/// Delete a category. Its images go with it through the foreign key.
pub fn delete_category(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM categories WHERE id = ?", params![id])?;
    if deleted > 0 {
        info!(category = %id, "category deleted");
    }
    Ok(deleted > 0)
}

/// Tags are a set; keep the first occurrence of each.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

fn insert_row(tx: &Transaction<'_>, img: &PortfolioImage) -> Result<()> {
    let meta = img.metadata.clone().unwrap_or_default();
    tx.execute(
        "INSERT INTO images (id, category_id, image_path, width, height, title, description, tags, camera, lens, location, aperture, shutter_speed, iso, focal_length, featured, sort_order, date_created)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18)",
        params![
            img.id,
            img.category_id,
            img.image_path,
            img.width,
            img.height,
            img.title,
            img.description,
            serde_json::to_string(&img.tags)?,
            meta.camera,
            meta.lens,
            meta.location,
            meta.aperture,
            meta.shutter_speed,
            meta.iso,
            meta.focal_length,
            img.featured,
            img.order,
            img.date_created,
        ],
    )?;
    Ok(())
}

/// Add an image record to a category and bump the category's cached count
/// in the same transaction.
pub fn insert_image(conn: &mut Connection, category_id: &str, new: NewImage) -> Result<PortfolioImage> {
    if new.width <= 0 || new.height <= 0 {
        return Err(StoreError::Invalid(format!("image dimensions must be positive, got {}x{}", new.width, new.height)).into());
    }
    if new.image_path.trim().is_empty() {
        return Err(StoreError::Invalid("imagePath must not be empty".into()).into());
    }

    let tx = conn.transaction()?;
    let exists: Option<String> = tx
        .query_row("SELECT id FROM categories WHERE id = ?", params![category_id], |r| r.get(0))
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::NotFound(format!("category {}", category_id)).into());
    }

    // Ids are unique across the catalog since the pagination cursor is a bare id
    let id = match new.id.filter(|s| !s.trim().is_empty()) {
        Some(id) => {
            let taken: Option<String> = tx
                .query_row("SELECT category_id FROM images WHERE id = ?", params![id], |r| r.get(0))
                .optional()?;
            if let Some(owner) = taken {
                return Err(StoreError::Invalid(format!("image id {:?} is already in use in category {}", id, owner)).into());
            }
            id
        }
        None => uuid::Uuid::new_v4().to_string(),
    };

    let image = PortfolioImage {
        id,
        category_id: category_id.to_string(),
        image_path: new.image_path,
        width: new.width,
        height: new.height,
        title: new.title,
        description: new.description,
        tags: dedup_tags(new.tags),
        metadata: new.metadata.filter(|m| !m.is_empty()),
        featured: new.featured,
        order: new.order,
        date_created: new.date_created.unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
    };
    insert_row(&tx, &image)?;
    tx.execute("UPDATE categories SET image_count = image_count + 1 WHERE id = ?", params![category_id])?;
    tx.commit()?;
    Ok(image)
}

/// Delete one image and decrement its category's cached count.
/// Returns false when no such image exists in that category.
pub fn delete_image(conn: &mut Connection, category_id: &str, image_id: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    let deleted = tx.execute(
        "DELETE FROM images WHERE id = ? AND category_id = ?",
        params![image_id, category_id],
    )?;
    if deleted > 0 {
        tx.execute(
            "UPDATE categories SET image_count = MAX(image_count - ?, 0) WHERE id = ?",
            params![deleted as i64, category_id],
        )?;
    }
    tx.commit()?;
    Ok(deleted > 0)
}

/// Recompute `image_count` from the images table.
pub fn recount_images(conn: &Connection, category_id: &str) -> Result<i64> {
    if query::get_category(conn, category_id)?.is_none() {
        return Err(StoreError::NotFound(format!("category {}", category_id)).into());
    }
    let n = query::count_category_images(conn, category_id)?;
    conn.execute("UPDATE categories SET image_count = ? WHERE id = ?", params![n, category_id])?;
    Ok(n)
}
