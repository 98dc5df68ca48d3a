//! In-memory [`Database`] double backing the unit tests.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, Mutex, MutexGuard,
};

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact, Update},
    Date, DateSpan, DateTime, Money, Stay,
};
use rust_decimal::Decimal;
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{
        block, reservation, room, room_type, special_price, staff, waitlist,
        Block, RateChange, Reservation, Room, RoomType, SpecialPrice,
        WaitlistEntry,
    },
    infra::{cache::Memory, database, Database},
    read, Config, Service,
};

/// In-memory [`Database`] double.
///
/// Cloning shares the underlying store, so a handle kept by a test observes
/// (and may mutate) the state behind an already built [`Service`].
#[derive(Clone, Debug, Default)]
pub struct Mock {
    /// Shared store of this [`Mock`].
    store: Arc<Mutex<Store>>,
}

/// Plain-[`Vec`] tables of a [`Mock`].
#[derive(Debug, Default)]
struct Store {
    rooms: Vec<Room>,
    room_types: Vec<RoomType>,
    special_prices: Vec<SpecialPrice>,
    blocks: Vec<Block>,
    reservations: Vec<Reservation>,
    waitlist: Vec<WaitlistEntry>,
    rate_changes: Vec<RateChange>,
}

impl Mock {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    /// Stores the provided [`Room`] and returns it back.
    pub fn add_room(&self, room: Room) -> Room {
        self.store().rooms.push(room.clone());
        room
    }

    /// Stores the provided [`RoomType`] and returns it back.
    pub fn add_room_type(&self, kind: RoomType) -> RoomType {
        self.store().room_types.push(kind.clone());
        kind
    }

    /// Stores the provided [`SpecialPrice`] and returns it back.
    pub fn add_special_price(&self, special: SpecialPrice) -> SpecialPrice {
        self.store().special_prices.push(special.clone());
        special
    }

    /// Stores the provided [`Block`] and returns it back.
    pub fn add_block(&self, block: Block) -> Block {
        self.store().blocks.push(block.clone());
        block
    }

    /// Stores the provided [`Reservation`] and returns it back.
    pub fn add_reservation(&self, reservation: Reservation) -> Reservation {
        self.store().reservations.push(reservation.clone());
        reservation
    }

    /// Stores the provided [`WaitlistEntry`] and returns it back.
    pub fn add_waitlist_entry(&self, entry: WaitlistEntry) -> WaitlistEntry {
        self.store().waitlist.push(entry.clone());
        entry
    }

    /// Books the [`Room`] for the single night of the provided [`Date`],
    /// driving the occupancy ratio up.
    pub fn occupy(&self, room_id: room::Id, date: Date) {
        let stay = Stay::single_night(date).unwrap();
        let _ = self.add_reservation(reservation(room_id, stay));
    }

    /// Rewrites the nightly rate of the stored [`Room`] in place, behind
    /// any cache built on top of this [`Mock`].
    pub fn set_rate(&self, room_id: room::Id, rate: Money) {
        let mut store = self.store();
        let room = store
            .rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .expect("room is stored");
        room.rate = rate;
    }
}

/// Builds a [`Service`] over the provided [`Mock`] and a fresh in-memory
/// cache, with the default [`Config`].
pub fn service(mock: Mock) -> Service<Mock, Memory> {
    Service {
        config: Config::default(),
        database: mock,
        cache: Memory::default(),
    }
}

/// Builds an active [`Room`] with the provided nightly rate and a unique
/// number.
pub fn room(rate: Money) -> Room {
    static NUMBER: AtomicU32 = AtomicU32::new(100);

    Room {
        id: room::Id::new(),
        number: NUMBER
            .fetch_add(1, Ordering::Relaxed)
            .to_string()
            .parse()
            .unwrap(),
        kind_id: room_type::Id::new(),
        floor: 1,
        capacity: 2,
        rate,
        status: room::Status::Active,
        amenities: vec![room::Amenity::Wifi],
        allow_waitlist: false,
        allow_overbooking: false,
        max_overbooking: 0,
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    }
}

/// Builds a [`RoomType`] with the provided base rate and capacity.
pub fn room_type(base_rate: Money, capacity: room_type::Capacity) -> RoomType {
    RoomType {
        id: room_type::Id::new(),
        name: format!("standard-{}", Uuid::new_v4()).parse().unwrap(),
        base_rate,
        capacity,
        amenities: vec![room::Amenity::Wifi, room::Amenity::Tv],
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    }
}

/// Builds a [`SpecialPrice`] of the provided [`Room`] over the provided
/// window.
pub fn special_price(
    room_id: room::Id,
    price: Money,
    span: DateSpan,
) -> SpecialPrice {
    SpecialPrice {
        id: special_price::Id::new(),
        room_id,
        price,
        span,
        label: "trade fair".parse().unwrap(),
        note: None,
        created_by: staff::Id::new(),
        created_at: DateTime::now().coerce(),
    }
}

/// Builds a [`Block`] of the provided [`Room`] over the provided window.
pub fn block(room_id: room::Id, since: Date, until: Option<Date>) -> Block {
    Block {
        id: block::Id::new(),
        room_id,
        reason: "maintenance".parse().unwrap(),
        since,
        until,
        priority: 1,
        note: None,
        created_by: staff::Id::new(),
        created_at: DateTime::now().coerce(),
    }
}

/// Builds a waiting [`WaitlistEntry`] of the provided [`Room`] for the
/// provided [`Stay`].
pub fn waitlist_entry(room_id: room::Id, stay: Stay) -> WaitlistEntry {
    WaitlistEntry {
        id: waitlist::Id::new(),
        room_id,
        guest_id: crate::domain::guest::Id::new(),
        stay,
        status: waitlist::Status::Waiting,
        created_at: DateTime::now().coerce(),
        notified_at: None,
    }
}

/// Builds a confirmed [`Reservation`] of the provided [`Room`] for the
/// provided [`Stay`].
pub fn reservation(room_id: room::Id, stay: Stay) -> Reservation {
    Reservation {
        id: reservation::Id::new(),
        room_id,
        guest_id: crate::domain::guest::Id::new(),
        stay,
        status: reservation::Status::Confirmed,
        is_overbooked: false,
        total: Money {
            amount: Decimal::ZERO,
            currency: common::Currency::Usd,
        },
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    }
}

impl Database<Transact> for Mock {
    type Ok = Mock;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Room, room::Id>>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Room>, room::Id>>> for Mock {
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.store().rooms.iter().find(|r| r.id == id).cloned())
    }
}

impl Database<Select<By<Option<Room>, room::Number>>> for Mock {
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();
        Ok(self
            .store()
            .rooms
            .iter()
            .find(|r| r.number == number && r.deleted_at.is_none())
            .cloned())
    }
}

impl Database<Select<By<Vec<Room>, Option<room_type::Id>>>> for Mock {
    type Ok = Vec<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Room>, Option<room_type::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let kind_id = by.into_inner();
        let mut rooms: Vec<_> = self
            .store()
            .rooms
            .iter()
            .filter(|r| {
                r.deleted_at.is_none()
                    && kind_id.map_or(true, |k| r.kind_id == k)
            })
            .cloned()
            .collect();
        rooms.sort_by_key(|r| Uuid::from(r.id));
        Ok(rooms)
    }
}

impl Database<Insert<Room>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().rooms.push(room);
        Ok(())
    }
}

impl Database<Update<Room>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(room): Update<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.store();
        if let Some(stored) = store.rooms.iter_mut().find(|r| r.id == room.id)
        {
            *stored = room;
        }
        Ok(())
    }
}

impl Database<Select<By<Option<RoomType>, room_type::Id>>> for Mock {
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, room_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.store().room_types.iter().find(|k| k.id == id).cloned())
    }
}

impl Database<Select<By<Vec<SpecialPrice>, (room::Id, DateSpan)>>> for Mock {
    type Ok = Vec<SpecialPrice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<SpecialPrice>, (room::Id, DateSpan)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, span) = by.into_inner();
        Ok(self
            .store()
            .special_prices
            .iter()
            .filter(|s| s.room_id == room_id && s.span.overlaps(&span))
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Option<SpecialPrice>, special_price::Id>>> for Mock {
    type Ok = Option<SpecialPrice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SpecialPrice>, special_price::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .store()
            .special_prices
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

impl Database<Insert<SpecialPrice>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(special): Insert<SpecialPrice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().special_prices.push(special);
        Ok(())
    }
}

impl Database<Delete<By<SpecialPrice, special_price::Id>>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<SpecialPrice, special_price::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.store().special_prices.retain(|s| s.id != id);
        Ok(())
    }
}

impl Database<Select<By<Option<Block>, block::Id>>> for Mock {
    type Ok = Option<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Block>, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.store().blocks.iter().find(|b| b.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Block>, (room::Id, Stay)>>> for Mock {
    type Ok = Vec<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Block>, (room::Id, Stay)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, stay) = by.into_inner();
        Ok(self
            .store()
            .blocks
            .iter()
            .filter(|b| b.room_id == room_id && b.intersects(&stay))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Block>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(block): Insert<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().blocks.push(block);
        Ok(())
    }
}

impl Database<Delete<By<Block, block::Id>>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Block, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.store().blocks.retain(|b| b.id != id);
        Ok(())
    }
}

impl Database<Select<By<Vec<Reservation>, (room::Id, Stay)>>> for Mock {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, (room::Id, Stay)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, stay) = by.into_inner();
        Ok(self
            .store()
            .reservations
            .iter()
            .filter(|r| {
                r.room_id == room_id
                    && r.is_active()
                    && r.stay.intersects(&stay)
            })
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<Reservation>, (room::Id, Date)>>> for Mock {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, (room::Id, Date)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, since) = by.into_inner();
        Ok(self
            .store()
            .reservations
            .iter()
            .filter(|r| {
                r.room_id == room_id
                    && r.is_active()
                    && r.stay.check_out() > since
            })
            .cloned()
            .collect())
    }
}

impl Database<Insert<Reservation>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(reservation): Insert<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().reservations.push(reservation);
        Ok(())
    }
}

impl Database<Select<By<read::price::Occupancy, Date>>> for Mock {
    type Ok = read::price::Occupancy;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::price::Occupancy, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let date = by.into_inner();
        let store = self.store();
        let total = store
            .rooms
            .iter()
            .filter(|r| r.deleted_at.is_none())
            .count();
        if total == 0 {
            return Ok(read::price::Occupancy(Decimal::ZERO));
        }
        let occupied = store
            .rooms
            .iter()
            .filter(|room| {
                room.deleted_at.is_none()
                    && store.reservations.iter().any(|r| {
                        r.room_id == room.id
                            && r.is_active()
                            && r.stay.covers(date)
                    })
            })
            .count();
        Ok(read::price::Occupancy(
            Decimal::from(occupied) / Decimal::from(total),
        ))
    }
}

impl Database<Select<By<Vec<WaitlistEntry>, (room::Id, Date)>>> for Mock {
    type Ok = Vec<WaitlistEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<WaitlistEntry>, (room::Id, Date)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, today) = by.into_inner();
        Ok(self
            .store()
            .waitlist
            .iter()
            .filter(|e| e.room_id == room_id && e.is_waiting(today))
            .cloned()
            .collect())
    }
}

impl Database<Insert<WaitlistEntry>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<WaitlistEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().waitlist.push(entry);
        Ok(())
    }
}

impl Database<Update<WaitlistEntry>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(entry): Update<WaitlistEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.store();
        if let Some(stored) =
            store.waitlist.iter_mut().find(|e| e.id == entry.id)
        {
            *stored = entry;
        }
        Ok(())
    }
}

impl Database<Update<By<Vec<waitlist::Id>, (Date, i64)>>> for Mock {
    type Ok = Vec<waitlist::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Vec<waitlist::Id>, (Date, i64)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (today, chunk) = by.into_inner();
        let mut store = self.store();
        let mut expired = Vec::new();
        for entry in &mut store.waitlist {
            if expired.len() >= usize::try_from(chunk).unwrap() {
                break;
            }
            if entry.status == waitlist::Status::Waiting
                && entry.stay.check_in() < today
            {
                entry.status = waitlist::Status::Expired;
                expired.push(entry.id);
            }
        }
        Ok(expired)
    }
}

impl Database<Insert<RateChange>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(change): Insert<RateChange>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().rate_changes.push(change);
        Ok(())
    }
}
