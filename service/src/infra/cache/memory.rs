//! In-memory [`Cache`] backend.

use std::{sync::Arc, time::Instant};

use common::operations::{Insert, Invalidate, Select};
use dashmap::DashMap;
use tracerr::Traced;

use super::{Cache, Error, Key, Scope, Ttl, Value};

/// In-process [`Cache`] backed by a concurrent map.
///
/// Entries expire lazily: an expired entry keeps occupying its slot until
/// the next lookup of its [`Key`] drops it.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Cached entries.
    entries: Arc<DashMap<Key, Entry>>,
}

/// Single [`Memory`] entry.
#[derive(Clone, Debug)]
struct Entry {
    /// Cached [`Value`].
    value: Value,

    /// [`Instant`] this [`Entry`] stops being served at.
    expires_at: Instant,
}

impl Cache<Select<Key>> for Memory {
    type Ok = Option<Value>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(key): Select<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        let hit = self.entries.get(&key).and_then(|e| {
            (Instant::now() < e.expires_at).then(|| e.value.clone())
        });
        if hit.is_none() {
            // Lazy expiry: the guard above is dropped already, so removal
            // cannot deadlock the shard.
            let _ = self
                .entries
                .remove_if(&key, |_, e| Instant::now() >= e.expires_at);
        }
        Ok(hit)
    }
}

impl Cache<Insert<(Key, Value, Ttl)>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert((key, value, ttl)): Insert<(Key, Value, Ttl)>,
    ) -> Result<Self::Ok, Self::Err> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let _ = self.entries.insert(key, entry);
        Ok(())
    }
}

impl Cache<Invalidate<Scope>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Invalidate(scope): Invalidate<Scope>,
    ) -> Result<Self::Ok, Self::Err> {
        self.entries.retain(|key, _| !scope.covers(key));
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{Insert, Invalidate, Select},
        Date, DateSpan, Money, Stay,
    };
    use rust_decimal::Decimal;

    use crate::{
        domain::room,
        infra::cache::{Cache as _, Key, Scope, Value},
        read,
    };

    use super::Memory;

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn night(d: Date) -> Value {
        Value::Night(read::price::Night {
            date: d,
            amount: Money {
                amount: Decimal::new(10000, 2),
                currency: common::Currency::Usd,
            },
            source: read::price::Source::Tariff {
                seasonal: Decimal::ONE,
                weekday: Decimal::ONE,
                occupancy: Decimal::ONE,
            },
        })
    }

    #[tokio::test]
    async fn serves_stored_entries_until_their_ttl_passes() {
        let cache = Memory::default();
        let key = Key::Price {
            room_id: room::Id::new(),
            date: date(2024, 7, 1),
        };

        cache
            .execute(Insert((
                key.clone(),
                night(date(2024, 7, 1)),
                Duration::from_secs(60),
            )))
            .await
            .unwrap();

        let hit = cache.execute(Select(key.clone())).await.unwrap();
        assert!(matches!(hit, Some(Value::Night(_))));
    }

    #[tokio::test]
    async fn expired_entries_read_back_as_absent() {
        let cache = Memory::default();
        let key = Key::Price {
            room_id: room::Id::new(),
            date: date(2024, 7, 1),
        };

        cache
            .execute(Insert((
                key.clone(),
                night(date(2024, 7, 1)),
                Duration::ZERO,
            )))
            .await
            .unwrap();

        let hit = cache.execute(Select(key.clone())).await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn span_invalidation_drops_intersecting_entries_only() {
        let cache = Memory::default();
        let room_id = room::Id::new();
        let inside = Key::Price {
            room_id,
            date: date(2024, 7, 3),
        };
        let outside = Key::Price {
            room_id,
            date: date(2024, 8, 1),
        };
        let other_room = Key::Price {
            room_id: room::Id::new(),
            date: date(2024, 7, 3),
        };
        for key in [&inside, &outside, &other_room] {
            cache
                .execute(Insert((
                    key.clone(),
                    night(date(2024, 7, 3)),
                    Duration::from_secs(60),
                )))
                .await
                .unwrap();
        }

        let span =
            DateSpan::new(date(2024, 7, 1), date(2024, 7, 5)).unwrap();
        cache
            .execute(Invalidate(Scope::Span { room_id, span }))
            .await
            .unwrap();

        assert!(cache.execute(Select(inside)).await.unwrap().is_none());
        assert!(cache.execute(Select(outside)).await.unwrap().is_some());
        assert!(cache.execute(Select(other_room)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn room_invalidation_drops_every_class_and_searches() {
        let cache = Memory::default();
        let room_id = room::Id::new();
        let stay =
            Stay::new(date(2024, 7, 1), date(2024, 7, 3)).unwrap();
        let price = Key::Price {
            room_id,
            date: date(2024, 7, 1),
        };
        let meta = Key::Room { room_id };
        let search = Key::Search {
            kind_id: None,
            stay,
        };
        let foreign = Key::Room {
            room_id: room::Id::new(),
        };
        for (key, value) in [
            (price.clone(), night(date(2024, 7, 1))),
            (meta.clone(), night(date(2024, 7, 1))),
            (search.clone(), Value::Search(vec![])),
            (foreign.clone(), Value::Search(vec![])),
        ] {
            cache
                .execute(Insert((key, value, Duration::from_secs(60))))
                .await
                .unwrap();
        }

        cache.execute(Invalidate(Scope::Room(room_id))).await.unwrap();

        assert!(cache.execute(Select(price)).await.unwrap().is_none());
        assert!(cache.execute(Select(meta)).await.unwrap().is_none());
        assert!(cache.execute(Select(search)).await.unwrap().is_none());
        assert!(cache.execute(Select(foreign)).await.unwrap().is_some());
    }
}
