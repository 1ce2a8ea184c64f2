pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;

pub use engine::map_resolver::{
    resolve_map, AssetDirResolver, FixedPlatform, HostPlatform, ImageResolver, ImageTag,
    PlatformInfo, PlatformKind, PLACEHOLDER_MAP,
};
pub use engine::persistence::{JsonFileSink, MemorySink, NoopSink, PersistenceSink};
pub use error::{EncounterError, NpcError, PersistError, Roster};
pub use model::encounter::{Encounter, EncounterContext, EncounterId};
pub use model::encounter_data::{EncounterData, DEFAULT_ENVIRONMENT};
pub use model::npc::{JsonNpc, JsonNpcFactory, NpcFactory, RawNpc, UnitHandle};
pub use model::sitrep::Sitrep;
