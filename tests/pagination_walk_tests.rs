//! Walks over a profile collection through the paginator
//!
//! These tests verify that:
//! - A walk visits every row exactly once
//! - Duplicate sort values are ordered by id
//! - Inserts and deletes between pages never duplicate nor resurrect rows
//! - Backward cursors walk in descending order
//! - Filters narrow every page of a walk

use profiles::prelude::*;
use std::collections::HashSet;

fn codec() -> CursorCodec {
    CursorCodec::from_secret("walk-secret", "HS256").unwrap()
}

async fn store_with(names: &[&str]) -> InMemoryStore<Profile> {
    let store = InMemoryStore::<Profile>::new();
    for name in names {
        store
            .create(Profile::new(Uuid::new_v4(), *name, None))
            .await
            .unwrap();
    }
    store
}

fn paginator<'a>(
    codec: &'a CursorCodec,
    store: &'a InMemoryStore<Profile>,
) -> Paginator<'a, Profile, InMemoryStore<Profile>> {
    Paginator::new(&PROFILES, codec, store)
}

fn ids(page: &Page<Profile>) -> Vec<i64> {
    page.items.iter().map(|profile| profile.id).collect()
}

/// Follow next cursors until the last page, collecting every id seen
async fn walk(
    codec: &CursorCodec,
    store: &InMemoryStore<Profile>,
    filters: &FilterParams,
    limit: usize,
) -> Vec<i64> {
    let paginator = paginator(codec, store);
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = paginator
            .paginate(filters, cursor.as_deref(), Some(limit))
            .await
            .unwrap();
        assert!(page.count <= limit);
        assert_eq!(page.count, page.items.len());
        seen.extend(ids(&page));

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    seen
}

/// Ids ordered the way the collection sorts them
async fn expected_order(store: &InMemoryStore<Profile>) -> Vec<i64> {
    let mut all = store.list().await.unwrap();
    all.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.id.cmp(&b.id))
    });
    all.into_iter().map(|profile| profile.id).collect()
}

mod walk_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_names_split_across_pages() {
        let codec = codec();
        let store = store_with(&["Ana", "Ana", "Bruno"]).await;
        let paginator = paginator(&codec, &store);

        let first = paginator
            .paginate(&FilterParams::new(), None, Some(2))
            .await
            .unwrap();
        assert_eq!(ids(&first), vec![1, 2]);
        assert_eq!(first.count, 2);
        assert!(first.previous_cursor.is_none());

        let token = first.next_cursor.clone().unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(
            decoded,
            Cursor {
                previous_cursor: None,
                sort_field_key: "display_name".to_string(),
                operator: CursorOperator::Ge,
                value: SortValue::Str("Ana".to_string()),
                tie_break_id: 2,
            }
        );

        let second = paginator
            .paginate(&FilterParams::new(), Some(&token), Some(2))
            .await
            .unwrap();
        assert_eq!(ids(&second), vec![3]);
        assert!(second.next_cursor.is_none());
        assert!(second.previous_cursor.is_none());
    }

    #[tokio::test]
    async fn test_tie_break_orders_by_id() {
        let codec = codec();
        let names = ["Zed", "Zed", "Zed", "Zed", "Same", "Zed", "Zed", "Zed", "Same"];
        let store = store_with(&names).await;
        let paginator = paginator(&codec, &store);

        let first = paginator
            .paginate(&FilterParams::new(), None, Some(1))
            .await
            .unwrap();
        assert_eq!(ids(&first), vec![5]);

        let second = paginator
            .paginate(&FilterParams::new(), first.next_cursor.as_deref(), Some(1))
            .await
            .unwrap();
        assert_eq!(ids(&second), vec![9]);
    }

    #[tokio::test]
    async fn test_walk_visits_every_row_once() {
        let codec = codec();
        let names: Vec<String> = (0..23).map(|i| format!("Name {}", i % 7)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let store = store_with(&names).await;

        for limit in [1, 2, 3, 5, 7, 23, 50] {
            let seen = walk(&codec, &store, &FilterParams::new(), limit).await;
            assert_eq!(seen, expected_order(&store).await, "limit {}", limit);
        }
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let codec = codec();
        let store = InMemoryStore::<Profile>::new();
        let page = paginator(&codec, &store)
            .paginate(&FilterParams::new(), None, None)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
        assert_eq!(page.count, 0);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["next_cursor"], serde_json::Value::Null);
        assert_eq!(json["count"], 0);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_empty_page() {
        let codec = codec();
        let store = store_with(&["A", "B", "C", "D"]).await;
        let paginator = paginator(&codec, &store);

        let first = paginator
            .paginate(&FilterParams::new(), None, Some(2))
            .await
            .unwrap();
        let second = paginator
            .paginate(&FilterParams::new(), first.next_cursor.as_deref(), Some(2))
            .await
            .unwrap();
        assert_eq!(ids(&second), vec![3, 4]);
        assert!(second.next_cursor.is_none());
    }
}

mod concurrent_modification_tests {
    use super::*;

    #[tokio::test]
    async fn test_inserts_and_deletes_between_pages() {
        let codec = codec();
        let store = store_with(&["Bia", "Caio", "Davi", "Edu", "Fabi", "Gael"]).await;
        let paginator = paginator(&codec, &store);

        let first = paginator
            .paginate(&FilterParams::new(), None, Some(2))
            .await
            .unwrap();
        assert_eq!(ids(&first), vec![1, 2]);

        // Before the cursor: never shown. After it: shown once.
        let early = store
            .create(Profile::new(Uuid::new_v4(), "Aldo", None))
            .await
            .unwrap();
        let late = store
            .create(Profile::new(Uuid::new_v4(), "Duda", None))
            .await
            .unwrap();
        // Not yet seen, removed before its page
        store.delete(5).await.unwrap();

        let mut seen: Vec<i64> = ids(&first);
        let mut cursor = first.next_cursor;
        while let Some(token) = cursor {
            let page = paginator
                .paginate(&FilterParams::new(), Some(&token), Some(2))
                .await
                .unwrap();
            seen.extend(ids(&page));
            cursor = page.next_cursor;
        }

        let unique: HashSet<_> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seen.len(), "duplicate rows in {:?}", seen);
        assert!(!seen.contains(&early.id));
        assert!(seen.contains(&late.id));
        assert!(!seen.contains(&5));
        // Bia, Caio, Davi, Duda, Edu, Gael
        assert_eq!(seen, vec![1, 2, 3, late.id, 4, 6]);
    }

    #[tokio::test]
    async fn test_deleting_the_cursor_row_does_not_break_the_walk() {
        let codec = codec();
        let store = store_with(&["Ana", "Bruno", "Carla", "Dora"]).await;
        let paginator = paginator(&codec, &store);

        let first = paginator
            .paginate(&FilterParams::new(), None, Some(2))
            .await
            .unwrap();
        store.delete(2).await.unwrap();

        let second = paginator
            .paginate(&FilterParams::new(), first.next_cursor.as_deref(), Some(2))
            .await
            .unwrap();
        assert_eq!(ids(&second), vec![3, 4]);
    }
}

mod backward_tests {
    use super::*;

    #[tokio::test]
    async fn test_le_cursor_walks_descending() {
        let codec = codec();
        let store = store_with(&["Ana", "Bruno", "Carla", "Dora"]).await;
        let paginator = paginator(&codec, &store);

        let start = Cursor {
            previous_cursor: None,
            sort_field_key: "display_name".to_string(),
            operator: CursorOperator::Le,
            value: SortValue::Str("Carla".to_string()),
            tie_break_id: 3,
        };
        let token = codec.encode(&start).unwrap();

        let first = paginator
            .paginate(&FilterParams::new(), Some(&token), Some(1))
            .await
            .unwrap();
        assert_eq!(ids(&first), vec![2]);

        let next = codec.decode(first.next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(next.operator, CursorOperator::Le);
        assert_eq!(next.previous_cursor.as_deref(), Some(token.as_str()));

        let second = paginator
            .paginate(&FilterParams::new(), first.next_cursor.as_deref(), Some(1))
            .await
            .unwrap();
        assert_eq!(ids(&second), vec![1]);
        assert!(second.next_cursor.is_none());
        assert_eq!(second.previous_cursor.as_deref(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn test_strict_cursor_skips_equal_values() {
        let codec = codec();
        let store = store_with(&["Ana", "Ana", "Bruno"]).await;
        let token = codec
            .encode(&Cursor {
                previous_cursor: None,
                sort_field_key: "display_name".to_string(),
                operator: CursorOperator::Gt,
                value: SortValue::Str("Ana".to_string()),
                tie_break_id: 1,
            })
            .unwrap();

        let page = paginator(&codec, &store)
            .paginate(&FilterParams::new(), Some(&token), Some(5))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![3]);
    }

    #[tokio::test]
    async fn test_id_ordered_cursor_is_accepted() {
        let codec = codec();
        let store = store_with(&["Zoe", "Ana", "Mia"]).await;
        let token = codec
            .encode(&Cursor {
                previous_cursor: None,
                sort_field_key: "id".to_string(),
                operator: CursorOperator::Ge,
                value: SortValue::Int(1),
                tie_break_id: 1,
            })
            .unwrap();

        let page = paginator(&codec, &store)
            .paginate(&FilterParams::new(), Some(&token), Some(5))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![2, 3]);
    }
}

mod filter_tests {
    use super::*;

    async fn linked_store() -> InMemoryStore<Profile> {
        let store = InMemoryStore::<Profile>::new();
        let rows: &[(&str, &[i64], &[i64])] = &[
            ("Ana", &[1], &[10]),
            ("Bruno", &[2], &[10]),
            ("Carla", &[1, 2], &[11]),
            ("João", &[3], &[]),
            ("Joana", &[1], &[11]),
        ];
        for (name, courses, interests) in rows {
            let mut profile = Profile::new(Uuid::new_v4(), *name, None);
            profile.course_ids = courses.to_vec();
            profile.interest_ids = interests.to_vec();
            store.create(profile).await.unwrap();
        }
        store
    }

    fn filters(pairs: &[(&str, FilterValue)]) -> FilterParams {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_courses_filter_narrows_every_page() {
        let codec = codec();
        let store = linked_store().await;
        let params = filters(&[("courses_in", FilterValue::from(vec!["1"]))]);

        let seen = walk(&codec, &store, &params, 1).await;
        // Ana, Carla, Joana
        assert_eq!(seen, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_filters_combine_by_conjunction() {
        let codec = codec();
        let store = linked_store().await;
        let params = filters(&[
            ("courses_in", FilterValue::from("1,2")),
            ("interests_in", FilterValue::from("11")),
        ]);

        assert_eq!(walk(&codec, &store, &params, 10).await, vec![3, 5]);
    }

    #[tokio::test]
    async fn test_display_name_search_folds_accents() {
        let codec = codec();
        let store = linked_store().await;

        let params = filters(&[("display_name_ilike", FilterValue::from("JOÃO"))]);
        assert_eq!(walk(&codec, &store, &params, 10).await, vec![4]);

        let params = filters(&[("display_name_ilike", FilterValue::from("jo"))]);
        // Ordered by the stored name, where "Joana" < "João"
        let seen = walk(&codec, &store, &params, 1).await;
        assert_eq!(seen, vec![5, 4]);
    }
}

mod rejection_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_filter() {
        let codec = codec();
        let store = InMemoryStore::<Profile>::new();
        let mut params = FilterParams::new();
        params.insert("age_gt".to_string(), FilterValue::from("3"));

        let err = paginator(&codec, &store)
            .paginate(&params, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::UnknownFilter { name } if name == "age_gt"));
    }

    #[tokio::test]
    async fn test_zero_limit() {
        let codec = codec();
        let store = InMemoryStore::<Profile>::new();
        let err = paginator(&codec, &store)
            .paginate(&FilterParams::new(), None, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidLimit { .. }));
    }

    #[tokio::test]
    async fn test_foreign_token() {
        let store = store_with(&["Ana", "Bruno", "Carla"]).await;
        let other = CursorCodec::from_secret("someone-else", "HS256").unwrap();
        let first = paginator(&other, &store)
            .paginate(&FilterParams::new(), None, Some(1))
            .await
            .unwrap();

        let codec = codec();
        let err = paginator(&codec, &store)
            .paginate(&FilterParams::new(), first.next_cursor.as_deref(), Some(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidCursor { .. }));
    }

    #[tokio::test]
    async fn test_cursor_on_unsortable_field() {
        let codec = codec();
        let store = store_with(&["Ana"]).await;
        let token = codec
            .encode(&Cursor {
                previous_cursor: None,
                sort_field_key: "bio".to_string(),
                operator: CursorOperator::Ge,
                value: SortValue::Str("x".to_string()),
                tie_break_id: 1,
            })
            .unwrap();

        let err = paginator(&codec, &store)
            .paginate(&FilterParams::new(), Some(&token), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidCursor { .. }));
    }
}
