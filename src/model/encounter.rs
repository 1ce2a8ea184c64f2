use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::engine::map_resolver::{resolve_map, ImageResolver, PlatformInfo};
use crate::engine::persistence::PersistenceSink;
use crate::engine::serializer;
use crate::error::{EncounterError, PersistError};
use crate::model::encounter_data::{EncounterData, DEFAULT_ENVIRONMENT};
use crate::model::npc::{NpcFactory, UnitHandle};
use crate::model::sitrep::Sitrep;

/// Session-local identity of an encounter. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncounterId(String);

impl EncounterId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collaborators shared by every encounter loaded in a session.
pub struct EncounterContext<F: NpcFactory> {
    pub factory: Arc<F>,
    pub sink: Arc<dyn PersistenceSink>,
}

impl<F: NpcFactory> EncounterContext<F> {
    pub fn new(factory: F, sink: Arc<dyn PersistenceSink>) -> Self {
        Self {
            factory: Arc::new(factory),
            sink,
        }
    }
}

impl<F: NpcFactory> Clone for EncounterContext<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            sink: Arc::clone(&self.sink),
        }
    }
}

/// A scenario: active units, reserve units, scene text and map references.
///
/// Setters persist through the context's sink after assigning, even when
/// the value did not change. If the save fails the assignment stays; the
/// error is handed back for the caller to deal with.
///
/// `add_npc` and `remove_npc` do not persist. Reinforcement changes do.
pub struct Encounter<F: NpcFactory> {
    pub(crate) id: EncounterId,
    pub(crate) name: String,
    pub(crate) location: String,
    pub(crate) labels: Vec<String>,
    pub(crate) npcs: Vec<F::Npc>,
    pub(crate) reinforcements: Vec<F::Npc>,
    pub(crate) gm_notes: String,
    pub(crate) campaign: String,
    pub(crate) narrative_notes: String,
    pub(crate) objectives: String,
    pub(crate) conditions: String,
    pub(crate) environment: String,
    pub(crate) environment_details: String,
    pub(crate) sitrep: Sitrep,
    pub(crate) cloud_map: String,
    pub(crate) local_map: String,
    pub(crate) context: EncounterContext<F>,
}

impl<F: NpcFactory> Encounter<F> {
    /// A blank encounter authored in place.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        sitrep: Sitrep,
        context: EncounterContext<F>,
    ) -> Self {
        Self {
            id: EncounterId::generate(),
            name: name.into(),
            location: location.into(),
            labels: Vec::new(),
            npcs: Vec::new(),
            reinforcements: Vec::new(),
            gm_notes: String::new(),
            campaign: String::new(),
            narrative_notes: String::new(),
            objectives: String::new(),
            conditions: String::new(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            environment_details: String::new(),
            sitrep,
            cloud_map: String::new(),
            local_map: String::new(),
            context,
        }
    }

    pub fn from_raw(data: &EncounterData, context: EncounterContext<F>) -> Result<Self, EncounterError> {
        serializer::from_raw(data, context)
    }

    pub fn to_raw(&self) -> EncounterData {
        serializer::to_raw(self)
    }

    fn save(&self) -> Result<(), PersistError> {
        let data = self.to_raw();
        match self.context.sink.save(&self.id, &data) {
            Ok(()) => {
                debug!(encounter_id = %self.id, name = %self.name, "encounter_saved");
                Ok(())
            }
            Err(err) => {
                warn!(encounter_id = %self.id, error = %err, "encounter_save_failed");
                Err(err)
            }
        }
    }

    pub fn id(&self) -> &EncounterId {
        &self.id
    }

    pub fn renew_id(&mut self) {
        let previous = std::mem::replace(&mut self.id, EncounterId::generate());
        debug!(previous = %previous, encounter_id = %self.id, "encounter_id_renewed");
    }

    pub fn context(&self) -> &EncounterContext<F> {
        &self.context
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), PersistError> {
        self.name = name.into();
        self.save()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) -> Result<(), PersistError> {
        self.location = location.into();
        self.save()
    }

    pub fn sitrep(&self) -> &Sitrep {
        &self.sitrep
    }

    pub fn set_sitrep(&mut self, sitrep: Sitrep) -> Result<(), PersistError> {
        self.sitrep = sitrep;
        self.save()
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn set_environment(&mut self, environment: impl Into<String>) -> Result<(), PersistError> {
        self.environment = environment.into();
        self.save()
    }

    pub fn environment_details(&self) -> &str {
        &self.environment_details
    }

    pub fn set_environment_details(&mut self, details: impl Into<String>) -> Result<(), PersistError> {
        self.environment_details = details.into();
        self.save()
    }

    pub fn gm_notes(&self) -> &str {
        &self.gm_notes
    }

    pub fn set_gm_notes(&mut self, notes: impl Into<String>) -> Result<(), PersistError> {
        self.gm_notes = notes.into();
        self.save()
    }

    /// Display order; duplicates allowed.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn set_labels(&mut self, labels: Vec<String>) -> Result<(), PersistError> {
        self.labels = labels;
        self.save()
    }

    pub fn campaign(&self) -> &str {
        &self.campaign
    }

    pub fn set_campaign(&mut self, campaign: impl Into<String>) -> Result<(), PersistError> {
        self.campaign = campaign.into();
        self.save()
    }

    pub fn narrative_notes(&self) -> &str {
        &self.narrative_notes
    }

    pub fn set_narrative_notes(&mut self, notes: impl Into<String>) -> Result<(), PersistError> {
        self.narrative_notes = notes.into();
        self.save()
    }

    pub fn objectives(&self) -> &str {
        &self.objectives
    }

    pub fn set_objectives(&mut self, objectives: impl Into<String>) -> Result<(), PersistError> {
        self.objectives = objectives.into();
        self.save()
    }

    pub fn conditions(&self) -> &str {
        &self.conditions
    }

    pub fn set_conditions(&mut self, conditions: impl Into<String>) -> Result<(), PersistError> {
        self.conditions = conditions.into();
        self.save()
    }

    pub fn npcs(&self) -> &[F::Npc] {
        &self.npcs
    }

    pub fn add_npc(&mut self, npc: F::Npc) {
        self.npcs.push(npc);
    }

    /// Removes the first unit with a matching id. Missing ids are ignored.
    pub fn remove_npc(&mut self, npc: &impl UnitHandle) -> Option<F::Npc> {
        let removed = remove_by_id(&mut self.npcs, npc.id());
        if removed.is_some() {
            debug!(encounter_id = %self.id, npc_id = npc.id(), "npc_removed");
        }
        removed
    }

    /// Sum of active unit power. Reinforcements are not counted.
    pub fn power(&self) -> f64 {
        self.npcs
            .iter()
            .map(|npc| npc.power())
            .filter(|power| power.is_finite() && *power > 0.0)
            .sum()
    }

    pub fn reinforcements(&self) -> &[F::Npc] {
        &self.reinforcements
    }

    pub fn set_reinforcements(&mut self, npcs: Vec<F::Npc>) -> Result<(), PersistError> {
        self.reinforcements = npcs;
        self.save()
    }

    pub fn add_reinforcement(&mut self, npc: F::Npc) -> Result<(), PersistError> {
        self.reinforcements.push(npc);
        self.save()
    }

    /// Saves whether or not a unit was removed. The removed unit is handed
    /// back even when the save fails.
    pub fn remove_reinforcement(
        &mut self,
        npc: &impl UnitHandle,
    ) -> (Option<F::Npc>, Result<(), PersistError>) {
        let removed = remove_by_id(&mut self.reinforcements, npc.id());
        if removed.is_some() {
            debug!(encounter_id = %self.id, npc_id = npc.id(), "reinforcement_removed");
        }
        (removed, self.save())
    }

    pub fn cloud_map(&self) -> &str {
        &self.cloud_map
    }

    pub fn set_cloud_map(&mut self, src: impl Into<String>) -> Result<(), PersistError> {
        self.cloud_map = src.into();
        self.save()
    }

    pub fn local_map(&self) -> &str {
        &self.local_map
    }

    pub fn set_local_map(&mut self, src: impl Into<String>) -> Result<(), PersistError> {
        self.local_map = src.into();
        self.save()
    }

    /// The map to display right now. Recomputed on each call.
    pub fn map(&self, platform: &dyn PlatformInfo, images: &dyn ImageResolver) -> String {
        resolve_map(&self.cloud_map, &self.local_map, platform, images)
    }
}

impl<F> Encounter<F>
where
    F: NpcFactory,
    F::Npc: Clone,
{
    /// Deep copy under a fresh id. Nothing is saved.
    pub fn duplicate(&self) -> Self {
        let mut copy = Self {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            labels: self.labels.clone(),
            npcs: self.npcs.clone(),
            reinforcements: self.reinforcements.clone(),
            gm_notes: self.gm_notes.clone(),
            campaign: self.campaign.clone(),
            narrative_notes: self.narrative_notes.clone(),
            objectives: self.objectives.clone(),
            conditions: self.conditions.clone(),
            environment: self.environment.clone(),
            environment_details: self.environment_details.clone(),
            sitrep: self.sitrep.clone(),
            cloud_map: self.cloud_map.clone(),
            local_map: self.local_map.clone(),
            context: self.context.clone(),
        };
        copy.renew_id();
        copy
    }
}

impl<F: NpcFactory> fmt::Debug for Encounter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("location", &self.location)
            .field("labels", &self.labels)
            .field("npcs", &self.npcs.len())
            .field("reinforcements", &self.reinforcements.len())
            .field("environment", &self.environment)
            .field("sitrep", &self.sitrep.name)
            .finish_non_exhaustive()
    }
}

fn remove_by_id<N: UnitHandle>(roster: &mut Vec<N>, id: &str) -> Option<N> {
    let idx = roster.iter().position(|npc| npc.id() == id)?;
    Some(roster.remove(idx))
}
