//! In-memory implementation of DataService for testing and development

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::field::FieldValue;
use crate::core::predicate::{Operator, OrderBy, Predicate, SortDirection};
use crate::core::service::{DataService, QueryExecutor, RowEdit};
use async_trait::async_trait;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access
/// and allocates ids from a shared counter, starting at 1.
pub struct InMemoryStore<T: Entity> {
    rows: Arc<RwLock<BTreeMap<i64, T>>>,
    next_id: Arc<AtomicI64>,
}

impl<T: Entity> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of stored rows
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<i64, T>>, StorageError> {
        self.rows.read().map_err(|e| StorageError::LockPoisoned {
            message: format!("Failed to acquire read lock: {}", e),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<i64, T>>, StorageError> {
        self.rows.write().map_err(|e| StorageError::LockPoisoned {
            message: format!("Failed to acquire write lock: {}", e),
        })
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> QueryExecutor<T> for InMemoryStore<T> {
    async fn execute_query(
        &self,
        predicate: &Predicate,
        order_by: &OrderBy,
        limit: usize,
    ) -> Result<Vec<T>, StorageError> {
        let matcher = Matcher::compile(predicate)?;
        let rows = self.read()?;

        let mut matched: Vec<&T> = rows.values().filter(|row| matcher.matches(*row)).collect();
        matched.sort_by(|a, b| compare_rows(*a, *b, order_by));

        Ok(matched.into_iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryStore<T> {
    async fn create(&self, mut entity: T) -> Result<T, StorageError> {
        let mut rows = self.write()?;

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        entity.assign_id(id);
        rows.insert(id, entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: i64) -> Result<Option<T>, StorageError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, StorageError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn update(&self, entity: T) -> Result<T, StorageError> {
        let mut rows = self.write()?;

        let id = entity.unique_id();
        let slot = rows.get_mut(&id).ok_or_else(|| StorageError::MissingRow {
            resource: T::resource_name().to_string(),
            id,
        })?;
        *slot = entity.clone();

        Ok(entity)
    }

    async fn modify<'e>(&self, id: i64, edit: RowEdit<'e, T>) -> Result<Option<T>, StorageError> {
        let mut rows = self.write()?;

        let Some(slot) = rows.get_mut(&id) else {
            return Ok(None);
        };
        let mut draft = slot.clone();
        if edit(&mut draft) {
            draft.assign_id(id);
            *slot = draft;
        }

        Ok(Some(slot.clone()))
    }

    async fn create_if_absent(
        &self,
        mut entity: T,
        existing: &Predicate,
    ) -> Result<Option<T>, StorageError> {
        let matcher = Matcher::compile(existing)?;
        let mut rows = self.write()?;

        if rows.values().any(|row| matcher.matches(row)) {
            return Ok(None);
        }
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        entity.assign_id(id);
        rows.insert(id, entity.clone());

        Ok(Some(entity))
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.write()?.remove(&id);
        Ok(())
    }

    async fn find(&self, predicate: &Predicate) -> Result<Vec<T>, StorageError> {
        let matcher = Matcher::compile(predicate)?;
        Ok(self
            .read()?
            .values()
            .filter(|row| matcher.matches(*row))
            .cloned()
            .collect())
    }
}

fn compare_rows<T: Entity>(a: &T, b: &T, order_by: &OrderBy) -> Ordering {
    let key = |row: &T| {
        row.field_value(&order_by.sort_field)
            .unwrap_or(FieldValue::Null)
    };
    let ordering = key(a)
        .sort_cmp(&key(b))
        .then_with(|| {
            let id = |row: &T| row.field_value(&order_by.unique_id).unwrap_or(FieldValue::Null);
            id(a).sort_cmp(&id(b))
        });

    match order_by.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// A predicate with its patterns compiled, evaluated row by row
///
/// Multi-valued attributes match when any of their values does; an absent
/// attribute matches no comparison.
enum Matcher<'p> {
    Compare {
        field: &'p str,
        op: Operator,
        value: &'p FieldValue,
    },
    In {
        field: &'p str,
        values: &'p [FieldValue],
    },
    Pattern {
        field: &'p str,
        regex: Regex,
    },
    And(Vec<Matcher<'p>>),
    Or(Vec<Matcher<'p>>),
}

impl<'p> Matcher<'p> {
    fn compile(predicate: &'p Predicate) -> Result<Self, StorageError> {
        Ok(match predicate {
            Predicate::Compare { field, op, value } => Matcher::Compare {
                field,
                op: *op,
                value,
            },
            Predicate::In { field, values } => Matcher::In { field, values },
            Predicate::ILike { field, pattern } => Matcher::Pattern {
                field,
                regex: like_to_regex(pattern)?,
            },
            Predicate::And(items) => Matcher::And(
                items
                    .iter()
                    .map(Matcher::compile)
                    .collect::<Result<_, _>>()?,
            ),
            Predicate::Or(items) => Matcher::Or(
                items
                    .iter()
                    .map(Matcher::compile)
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn matches<T: Entity>(&self, row: &T) -> bool {
        match self {
            Matcher::Compare { field, op, value } => row
                .field_values(field)
                .iter()
                .any(|candidate| satisfies(candidate, *op, value)),
            Matcher::In { field, values } => row
                .field_values(field)
                .iter()
                .any(|candidate| values.contains(candidate)),
            Matcher::Pattern { field, regex } => {
                row.field_values(field).iter().any(|candidate| match candidate {
                    FieldValue::String(text) => regex.is_match(text),
                    _ => false,
                })
            }
            Matcher::And(items) => items.iter().all(|item| item.matches(row)),
            Matcher::Or(items) => items.iter().any(|item| item.matches(row)),
        }
    }
}

fn satisfies(candidate: &FieldValue, op: Operator, value: &FieldValue) -> bool {
    let Some(ordering) = candidate.compare(value) else {
        return op == Operator::Ne;
    };
    match op {
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Ne => ordering != Ordering::Equal,
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Ge => ordering != Ordering::Less,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
    }
}

/// Translate an SQL `LIKE` pattern into an anchored, case-insensitive regex
fn like_to_regex(pattern: &str) -> Result<Regex, StorageError> {
    let mut source = String::from("(?is)^");
    for c in pattern.chars() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|e| StorageError::UnsupportedPredicate {
        message: format!("invalid pattern '{}': {}", pattern, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Person {
        id: i64,
        name: String,
        tags: Vec<i64>,
    }

    impl Person {
        fn new(name: &str, tags: Vec<i64>) -> Self {
            Self {
                id: 0,
                name: name.to_string(),
                tags,
            }
        }
    }

    impl Entity for Person {
        fn resource_name() -> &'static str {
            "people"
        }

        fn unique_id(&self) -> i64 {
            self.id
        }

        fn assign_id(&mut self, id: i64) {
            self.id = id;
        }

        fn field_values(&self, field: &str) -> Vec<FieldValue> {
            match field {
                "id" => vec![FieldValue::Integer(self.id)],
                "name" => vec![FieldValue::String(self.name.clone())],
                "tag" => self.tags.iter().copied().map(FieldValue::Integer).collect(),
                _ => Vec::new(),
            }
        }
    }

    async fn seeded() -> InMemoryStore<Person> {
        let store = InMemoryStore::new();
        for (name, tags) in [
            ("Bruno", vec![1]),
            ("ana", vec![1, 2]),
            ("Ana", vec![]),
            ("Carla", vec![2]),
        ] {
            store.create(Person::new(name, tags)).await.unwrap();
        }
        store
    }

    fn names(rows: &[Person]) -> Vec<&str> {
        rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_allocates_increasing_ids() {
        let store = seeded().await;
        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(store.len().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = seeded().await;
        let mut bruno = store.get(1).await.unwrap().unwrap();
        bruno.name = "Bruna".to_string();
        store.update(bruno).await.unwrap();
        assert_eq!(store.get(1).await.unwrap().unwrap().name, "Bruna");

        store.delete(1).await.unwrap();
        assert!(store.get(1).await.unwrap().is_none());

        let missing = Person {
            id: 99,
            ..Person::new("Nobody", vec![])
        };
        assert!(matches!(
            store.update(missing).await,
            Err(StorageError::MissingRow { id: 99, .. })
        ));
    }

    #[tokio::test]
    async fn test_ordering_breaks_ties_by_id() {
        let store = seeded().await;
        let order = OrderBy::new("name", "id", SortDirection::Ascending);
        let rows = store
            .execute_query(&Predicate::and(Vec::new()), &order, 10)
            .await
            .unwrap();
        // Byte order: uppercase before lowercase
        assert_eq!(names(&rows), vec!["Ana", "Bruno", "Carla", "ana"]);

        let order = OrderBy::new("name", "id", SortDirection::Descending);
        let rows = store
            .execute_query(&Predicate::and(Vec::new()), &order, 2)
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["ana", "Carla"]);
    }

    #[tokio::test]
    async fn test_multi_valued_inclusion() {
        let store = seeded().await;
        let rows = store
            .find(&Predicate::in_set("tag", vec![2_i64]))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["ana", "Carla"]);

        let rows = store
            .find(&Predicate::and(vec![
                Predicate::in_set("tag", vec![1_i64]),
                Predicate::in_set("tag", vec![2_i64]),
            ]))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["ana"]);
    }

    #[tokio::test]
    async fn test_ilike_is_case_insensitive_and_literal() {
        let store = seeded().await;
        store.create(Person::new("a.n.a", vec![])).await.unwrap();

        let rows = store.find(&Predicate::ilike("name", "%AN%")).await.unwrap();
        assert_eq!(names(&rows), vec!["ana", "Ana"]);

        let rows = store.find(&Predicate::ilike("name", "a.n%")).await.unwrap();
        assert_eq!(names(&rows), vec!["a.n.a"]);

        let rows = store.find(&Predicate::ilike("name", "_arla")).await.unwrap();
        assert_eq!(names(&rows), vec!["Carla"]);
    }

    #[tokio::test]
    async fn test_compare_and_disjunction() {
        let store = seeded().await;
        let rows = store
            .find(&Predicate::or(vec![
                Predicate::compare("id", Operator::Gt, 3_i64),
                Predicate::eq("name", "Bruno"),
            ]))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["Bruno", "Carla"]);

        // Missing attributes never compare
        let rows = store
            .find(&Predicate::compare("age", Operator::Ge, 0_i64))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_modify_commits_or_discards() {
        let store = seeded().await;

        let kept = store
            .modify(
                2,
                Box::new(|row: &mut Person| {
                    row.tags.push(9);
                    true
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.tags, vec![1, 2, 9]);

        let discarded = store
            .modify(
                2,
                Box::new(|row: &mut Person| {
                    row.tags.clear();
                    row.id = 77;
                    false
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(discarded, kept);
        assert_eq!(store.get(2).await.unwrap().unwrap().tags, vec![1, 2, 9]);

        let missing = store.modify(99, Box::new(|_: &mut Person| true)).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_create_if_absent() {
        let store = seeded().await;

        let taken = store
            .create_if_absent(Person::new("Carla", vec![]), &Predicate::eq("name", "Carla"))
            .await
            .unwrap();
        assert!(taken.is_none());
        assert_eq!(store.len().unwrap(), 4);

        let created = store
            .create_if_absent(Person::new("Dora", vec![]), &Predicate::eq("name", "Dora"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(store.len().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_clones_share_rows() {
        let store = seeded().await;
        let other = store.clone();
        other.create(Person::new("Dora", vec![])).await.unwrap();
        assert_eq!(store.len().unwrap(), 5);
        assert_eq!(store.find_one(&Predicate::eq("name", "Dora")).await.unwrap().unwrap().id, 5);
    }
}
