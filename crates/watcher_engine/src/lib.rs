//! Puzzle watcher engine: listing parser, transport, per-user fetch adapter,
//! refresh orchestration, and the durable watch-state store.
mod adapter;
mod decode;
mod fetch;
mod listing;
mod orchestrator;
mod persist;
mod repository;
mod service;
mod store;
mod types;

pub use adapter::{fetch_user, EndpointError, ListingEndpoint, DEFAULT_BASE_URL};
pub use decode::{decode_body, DecodeError};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use listing::{parse_listing, ListingError};
pub use orchestrator::{Clock, RefreshEngine};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use repository::{JsonDirRepository, MemoryRepository, RepositoryError, StateKey, StateRepository};
pub use service::Watcher;
pub use store::{StoreError, WatchStore};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
