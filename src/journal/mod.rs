mod entry;
mod store;
pub(crate) use self::entry::{Entry, NewEntry, UserId, EMOTIONS};
pub(crate) use self::store::{EntryStore, MemoryStore, StoreError};
