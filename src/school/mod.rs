//! The school aggregate: a storage backend plus configuration and the event
//! log, exposing the front-desk operations.
//!
//! Operations that depend on the current date take a [`SafeTimeProvider`];
//! "today" is the provider's UTC calendar date.

mod classes;
mod documents;
mod instructors;
mod payments;
mod periods;
mod students;
mod users;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::config::SchoolConfig;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::password::PasswordHasher;
use crate::records::Entity;
use crate::store::{MemoryStore, Repository, Storage, Table};

/// core school struct
pub struct School<S: Storage> {
    pub store: S,
    pub config: SchoolConfig,
    pub events: EventStore,
    hasher: PasswordHasher,
}

impl<S: Storage> School<S> {
    /// wrap a backend; fails when the configuration is invalid
    pub fn new(store: S, config: SchoolConfig) -> Result<Self> {
        config.validate()?;
        let hasher = PasswordHasher::from_config(&config.security);

        tracing::debug!(
            database = %config.database.connection_url(),
            bcrypt_cost = hasher.cost(),
            "school initialised"
        );

        Ok(Self {
            store,
            config,
            events: EventStore::new(),
            hasher,
        })
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn repo<T: Entity>(&self) -> &dyn Repository<T>
    where
        S: Table<T>,
    {
        Table::<T>::table(&self.store)
    }

    fn repo_mut<T: Entity>(&mut self) -> &mut dyn Repository<T>
    where
        S: Table<T>,
    {
        Table::<T>::table_mut(&mut self.store)
    }
}

impl School<MemoryStore> {
    /// school backed by an empty in-memory store
    pub fn in_memory(config: SchoolConfig) -> Result<Self> {
        Self::new(MemoryStore::new(), config)
    }
}

fn today(time_provider: &SafeTimeProvider) -> NaiveDate {
    time_provider.now().date_naive()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    use super::School;
    use crate::config::SchoolConfig;
    use crate::store::MemoryStore;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// test clock fixed at noon UTC on the given day
    pub fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()))
    }

    pub fn school() -> School<MemoryStore> {
        School::in_memory(SchoolConfig::development()).unwrap()
    }
}
