//! Waypost: multi-provider geocoding with response caching.
//!
//! Forward-geocodes street addresses and place names, reverse-geocodes
//! coordinate pairs, and locates IP addresses. Every lookup flows through
//! one [`Engine`] value; nothing is process global, so engines with
//! different providers, keys, or caches coexist freely.
//!
//! ```no_run
//! use waypost::{Config, Engine};
//!
//! let engine = Engine::new(Config::default());
//!
//! // Forward: address text in, coordinates out.
//! let point = engine.coordinates("Eiffel Tower, Paris")?;
//!
//! // Reverse: coordinates in, display address out.
//! let address = engine.address((48.8584, 2.2945))?;
//!
//! // IP-shaped text routes to the IP provider automatically.
//! let hits = engine.search("74.200.247.59")?;
//! # let _ = (point, address, hits);
//! # Ok::<(), waypost::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod query;
pub mod registry;
pub mod result;
pub mod server;

pub use cache::{CacheStore, FileStore, MemoryStore, ResponseCache};
pub use config::Config;
pub use engine::Engine;
pub use error::Error;
pub use providers::{Provider, ProviderId};
pub use query::{Query, QueryInput};
pub use registry::Registry;
pub use result::Location;
