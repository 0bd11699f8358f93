use anyhow::Result;
use rusqlite::{Connection, params, Row, OptionalExtension};
use rusqlite::types::Value;
use tracing::debug;
use crate::models::image::{Category, ImageMetadata, PortfolioImage};
use crate::models::filter::{FilterOptions, SortDirection};

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        slug: row.get("slug")?,
        cover_image: row.get("cover_image")?,
        order: row.get("sort_order")?,
        featured: row.get("featured")?,
        image_count: row.get("image_count")?,
        created_at: row.get("created_at")?,
    })
}

fn row_to_image(row: &Row<'_>) -> rusqlite::Result<PortfolioImage> {
    let tags_raw: String = row.get("tags")?;
    let tags: Vec<String> = serde_json::from_str(&tags_raw).unwrap_or_else(|e| {
        debug!("unreadable tags column {:?}: {}", tags_raw, e);
        Vec::new()
    });
    let metadata = ImageMetadata {
        camera: row.get("camera")?,
        lens: row.get("lens")?,
        location: row.get("location")?,
        aperture: row.get("aperture")?,
        shutter_speed: row.get("shutter_speed")?,
        iso: row.get("iso")?,
        focal_length: row.get("focal_length")?,
    };
    Ok(PortfolioImage {
        id: row.get("id")?,
        category_id: row.get("category_id")?,
        image_path: row.get("image_path")?,
        width: row.get("width")?,
        height: row.get("height")?,
        title: row.get("title")?,
        description: row.get("description")?,
        tags,
        metadata: if metadata.is_empty() { None } else { Some(metadata) },
        featured: row.get("featured")?,
        order: row.get("sort_order")?,
        date_created: row.get("date_created")?,
    })
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT * FROM categories ORDER BY sort_order ASC, title ASC")?;
    let items = stmt.query_map([], row_to_category)?.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_category(conn: &Connection, id: &str) -> Result<Option<Category>> {
    let category = conn
        .query_row("SELECT * FROM categories WHERE id = ?", params![id], row_to_category)
        .optional()?;
    Ok(category)
}

/// All images owned by one category in display order.
pub fn list_category_images(conn: &Connection, category_id: &str) -> Result<Vec<PortfolioImage>> {
    let mut stmt = conn.prepare("SELECT * FROM images WHERE category_id = ? ORDER BY sort_order ASC, id ASC")?;
    let items = stmt.query_map(params![category_id], row_to_image)?.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_image(conn: &Connection, category_id: &str, image_id: &str) -> Result<Option<PortfolioImage>> {
    let image = conn
        .query_row(
            "SELECT * FROM images WHERE id = ? AND category_id = ?",
            params![image_id, category_id],
            row_to_image,
        )
        .optional()?;
    Ok(image)
}

pub fn count_category_images(conn: &Connection, category_id: &str) -> Result<i64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM images WHERE category_id = ?", params![category_id], |r| r.get(0))?;
    Ok(n)
}

/// Clamp a page size into SQLite's signed range. A wrapped negative
/// `LIMIT` would mean "no limit".
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn push_any_of(where_clauses: &mut Vec<String>, params_vec: &mut Vec<Value>, column: &str, values: Option<&[String]>) {
    if let Some(values) = values {
        where_clauses.push(format!("{} IN ({})", column, placeholders(values.len())));
        params_vec.extend(values.iter().cloned().map(Value::from));
    }
}

/// Run one composite filter + sort + paginate read over images of every
/// category.
///
/// Facets combine with AND; the values selected within one facet combine
/// with OR. Results are ordered by the requested field with `id` as the tie
/// breaker so the `start_after` cursor always resumes at a stable position.
/// A cursor id that does not exist yields an empty page.
pub fn query_images(conn: &Connection, options: &FilterOptions) -> Result<Vec<PortfolioImage>> {
    if options.has_empty_selection() {
        return Ok(Vec::new());
    }

    let mut where_clauses: Vec<String> = Vec::new();
    let mut params_vec: Vec<Value> = Vec::new();

    push_any_of(&mut where_clauses, &mut params_vec, "category_id", options.categories.as_deref());
    if let Some(tags) = &options.tags {
        where_clauses.push(format!(
            "EXISTS (SELECT 1 FROM json_each(images.tags) WHERE json_each.value IN ({}))",
            placeholders(tags.len())
        ));
        params_vec.extend(tags.iter().cloned().map(Value::from));
    }
    push_any_of(&mut where_clauses, &mut params_vec, "camera", options.cameras.as_deref());
    push_any_of(&mut where_clauses, &mut params_vec, "lens", options.lenses.as_deref());
    push_any_of(&mut where_clauses, &mut params_vec, "location", options.locations.as_deref());
    push_any_of(&mut where_clauses, &mut params_vec, "aperture", options.apertures.as_deref());
    push_any_of(&mut where_clauses, &mut params_vec, "shutter_speed", options.shutter_speeds.as_deref());
    if let Some(isos) = &options.iso_values {
        where_clauses.push(format!("iso IN ({})", placeholders(isos.len())));
        params_vec.extend(isos.iter().map(|v| Value::Integer(*v)));
    }
    if let Some(range) = options.date_range {
        where_clauses.push("date_created >= ?".to_string());
        params_vec.push(Value::Integer(range.start));
        where_clauses.push("date_created <= ?".to_string());
        params_vec.push(Value::Integer(range.end));
    }
    if let Some(featured) = options.featured {
        where_clauses.push("featured = ?".to_string());
        params_vec.push(Value::Integer(i64::from(featured)));
    }

    let sort_col = options.sort_by.column();
    let order_dir = options.sort_direction.sql();

    if let Some(cursor) = &options.start_after {
        let cursor_key: Option<Value> = conn
            .query_row(&format!("SELECT {} FROM images WHERE id = ?", sort_col), params![cursor], |r| r.get(0))
            .optional()?;
        let Some(cursor_key) = cursor_key else {
            debug!("pagination cursor {} not found, returning empty page", cursor);
            return Ok(Vec::new());
        };
        let cmp = match options.sort_direction {
            SortDirection::Asc => ">",
            SortDirection::Desc => "<",
        };
        where_clauses.push(format!("({col} {cmp} ? OR ({col} = ? AND id > ?))", col = sort_col, cmp = cmp));
        params_vec.push(cursor_key.clone());
        params_vec.push(cursor_key);
        params_vec.push(Value::from(cursor.clone()));
    }

    let where_sql = if where_clauses.is_empty() { String::new() } else { format!("WHERE {}", where_clauses.join(" AND ")) };
    let sql = format!(
        "SELECT * FROM images {} ORDER BY {} {}, id ASC LIMIT ?",
        where_sql, sort_col, order_dir
    );
    params_vec.push(Value::Integer(sql_limit(options.effective_limit())));

    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(rusqlite::params_from_iter(params_vec), row_to_image)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}
