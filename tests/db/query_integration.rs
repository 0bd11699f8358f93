#[path = "../common/mod.rs"]
mod common;

use common::{ids, new_image, seed_category, seed_image, setup_test_pool};
use studio_portfolio::db::query;
use studio_portfolio::models::filter::{DateRange, FilterOptions, SortDirection, SortField};
use studio_portfolio::models::image::{ImageMetadata, NewImage};

#[test]
fn test_filter_conjunction_across_facets() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Weddings");
    seed_image(&pool, &cat.id, new_image("first", "First", &["a"], Some("X")));
    seed_image(&pool, &cat.id, new_image("second", "Second", &["b"], Some("X")));
    seed_image(&pool, &cat.id, new_image("third", "Third", &["a"], Some("Y")));

    let conn = pool.get().unwrap();
    let opts = FilterOptions {
        tags: Some(vec!["a".into()]),
        cameras: Some(vec!["X".into()]),
        ..Default::default()
    };
    let result = query::query_images(&conn, &opts).unwrap();
    assert_eq!(ids(&result), vec!["first"]);
}

#[test]
fn test_any_of_within_a_facet() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Weddings");
    seed_image(&pool, &cat.id, new_image("1", "One", &["a"], None));
    seed_image(&pool, &cat.id, new_image("2", "Two", &["b", "c"], None));
    seed_image(&pool, &cat.id, new_image("3", "Three", &["d"], None));

    let conn = pool.get().unwrap();
    let opts = FilterOptions { tags: Some(vec!["a".into(), "c".into()]), ..Default::default() };
    let mut found = ids(&query::query_images(&conn, &opts).unwrap()).into_iter().map(String::from).collect::<Vec<_>>();
    found.sort();
    assert_eq!(found, vec!["1".to_string(), "2".to_string()]);
}

#[test]
fn test_pagination_cursor_has_no_gap_or_overlap() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Portraits");
    for (i, id) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        let mut img = new_image(id, id, &[], None);
        img.order = i as i64;
        seed_image(&pool, &cat.id, img);
    }

    let conn = pool.get().unwrap();
    let page1 = query::query_images(&conn, &FilterOptions { limit: Some(2), ..Default::default() }).unwrap();
    assert_eq!(ids(&page1), vec!["a", "b"]);

    let cursor = page1.last().unwrap().id.clone();
    let page2 = query::query_images(&conn, &FilterOptions { start_after: Some(cursor), ..Default::default() }).unwrap();
    assert_eq!(ids(&page2), vec!["c", "d", "e"]);
}

#[test]
fn test_pagination_with_ties_and_descending_sort() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Events");
    // Two images share a timestamp; id breaks the tie
    for (id, ts) in [("p", 3_000), ("q", 2_000), ("r", 2_000), ("s", 1_000)] {
        let mut img = new_image(id, id, &[], None);
        img.date_created = Some(ts);
        seed_image(&pool, &cat.id, img);
    }

    let conn = pool.get().unwrap();
    let base = FilterOptions { sort_by: SortField::DateCreated, sort_direction: SortDirection::Desc, ..Default::default() };
    let page1 = query::query_images(&conn, &FilterOptions { limit: Some(2), ..base.clone() }).unwrap();
    assert_eq!(ids(&page1), vec!["p", "q"]);
    let page2 = query::query_images(&conn, &FilterOptions { start_after: Some("q".into()), ..base }).unwrap();
    assert_eq!(ids(&page2), vec!["r", "s"]);
}

#[test]
fn test_date_range_is_inclusive_and_featured_filter() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Landscapes");
    for (id, ts, featured) in [("early", 100, false), ("start", 200, true), ("end", 300, false), ("late", 400, true)] {
        let mut img = new_image(id, id, &[], None);
        img.date_created = Some(ts);
        img.featured = featured;
        seed_image(&pool, &cat.id, img);
    }

    let conn = pool.get().unwrap();
    let in_range = FilterOptions {
        date_range: Some(DateRange { start: 200, end: 300 }),
        sort_by: SortField::DateCreated,
        ..Default::default()
    };
    assert_eq!(ids(&query::query_images(&conn, &in_range).unwrap()), vec!["start", "end"]);

    let featured = FilterOptions { featured: Some(true), sort_by: SortField::DateCreated, ..Default::default() };
    assert_eq!(ids(&query::query_images(&conn, &featured).unwrap()), vec!["start", "late"]);

    let not_featured = FilterOptions { featured: Some(false), sort_by: SortField::DateCreated, ..Default::default() };
    assert_eq!(ids(&query::query_images(&conn, &not_featured).unwrap()), vec!["early", "end"]);
}

#[test]
fn test_metadata_exact_match_filters() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Travel");
    let with_meta = |id: &str, meta: ImageMetadata| NewImage { metadata: Some(meta), ..new_image(id, id, &[], None) };
    seed_image(&pool, &cat.id, with_meta("lisbon", ImageMetadata {
        lens: Some("35mm f/1.4".into()),
        location: Some("Lisbon".into()),
        aperture: Some("f/2.8".into()),
        shutter_speed: Some("1/250".into()),
        iso: Some(200),
        ..Default::default()
    }));
    seed_image(&pool, &cat.id, with_meta("oslo", ImageMetadata {
        lens: Some("85mm f/1.8".into()),
        location: Some("Oslo".into()),
        aperture: Some("f/1.8".into()),
        shutter_speed: Some("1/60".into()),
        iso: Some(1600),
        ..Default::default()
    }));

    let conn = pool.get().unwrap();
    let run = |opts: FilterOptions| ids(&query::query_images(&conn, &opts).unwrap()).into_iter().map(String::from).collect::<Vec<_>>();
    assert_eq!(run(FilterOptions { lenses: Some(vec!["85mm f/1.8".into()]), ..Default::default() }), vec!["oslo"]);
    assert_eq!(run(FilterOptions { locations: Some(vec!["Lisbon".into()]), ..Default::default() }), vec!["lisbon"]);
    assert_eq!(run(FilterOptions { apertures: Some(vec!["f/1.8".into()]), ..Default::default() }), vec!["oslo"]);
    assert_eq!(run(FilterOptions { shutter_speeds: Some(vec!["1/250".into()]), ..Default::default() }), vec!["lisbon"]);
    assert_eq!(run(FilterOptions { iso_values: Some(vec![1600, 3200]), ..Default::default() }), vec!["oslo"]);
    assert!(run(FilterOptions { iso_values: Some(vec![100]), ..Default::default() }).is_empty());
}

#[test]
fn test_category_filter_spans_categories() {
    let (_tmp, pool) = setup_test_pool();
    let weddings = seed_category(&pool, "Weddings");
    let portraits = seed_category(&pool, "Portraits");
    let events = seed_category(&pool, "Events");
    seed_image(&pool, &weddings.id, new_image("w1", "W1", &[], None));
    seed_image(&pool, &portraits.id, new_image("p1", "P1", &[], None));
    seed_image(&pool, &events.id, new_image("e1", "E1", &[], None));

    let conn = pool.get().unwrap();
    let opts = FilterOptions {
        categories: Some(vec![weddings.id.clone(), events.id.clone()]),
        sort_by: SortField::Title,
        ..Default::default()
    };
    assert_eq!(ids(&query::query_images(&conn, &opts).unwrap()), vec!["e1", "w1"]);
}

#[test]
fn test_empty_selection_matches_nothing_but_absent_key_matches_all() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Weddings");
    seed_image(&pool, &cat.id, new_image("1", "One", &["a"], None));

    let conn = pool.get().unwrap();
    let empty = FilterOptions { categories: Some(vec![]), ..Default::default() };
    assert!(query::query_images(&conn, &empty).unwrap().is_empty());
    assert_eq!(query::query_images(&conn, &FilterOptions::default()).unwrap().len(), 1);
}

#[test]
fn test_default_limit_is_fifty() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Bulk");
    for i in 0..55 {
        seed_image(&pool, &cat.id, new_image(&format!("img{:02}", i), "bulk", &[], None));
    }
    let conn = pool.get().unwrap();
    assert_eq!(query::query_images(&conn, &FilterOptions::default()).unwrap().len(), 50);
    assert_eq!(query::query_images(&conn, &FilterOptions { limit: Some(60), ..Default::default() }).unwrap().len(), 55);
}

#[test]
fn test_image_paths_are_returned_untransformed() {
    let (_tmp, pool) = setup_test_pool();
    let cat = seed_category(&pool, "Weddings");
    let stored = seed_image(&pool, &cat.id, new_image("1", "One", &[], None));
    let conn = pool.get().unwrap();
    let result = query::query_images(&conn, &FilterOptions::default()).unwrap();
    assert_eq!(result[0].image_path, stored.image_path);
}
