use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::settings::ToolSettings;
use crate::engine::map_resolver::FixedPlatform;
use crate::engine::persistence::{JsonFileSink, NoopSink, PersistenceSink};
use crate::engine::serializer;
use crate::model::encounter::{Encounter, EncounterContext};
use crate::model::npc::JsonNpcFactory;

pub fn load(
    path: &Path,
    sink: Arc<dyn PersistenceSink>,
) -> anyhow::Result<Encounter<JsonNpcFactory>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let context = EncounterContext::new(JsonNpcFactory, sink);
    serializer::from_json(&json, context)
        .with_context(|| format!("failed to load {}", path.display()))
}

pub fn show(path: &Path, settings: &ToolSettings, out: &mut impl Write) -> anyhow::Result<()> {
    let encounter = load(path, Arc::new(NoopSink))?;
    let map = encounter.map(&FixedPlatform(settings.platform()), &settings.image_resolver());

    writeln!(out, "{} @ {}", encounter.name(), encounter.location())?;
    writeln!(out, "  environment:    {}", encounter.environment())?;
    writeln!(out, "  labels:         {}", encounter.labels().join(", "))?;
    writeln!(out, "  sitrep:         {}", encounter.sitrep().name)?;
    writeln!(out, "  power:          {}", encounter.power())?;
    writeln!(out, "  npcs:           {}", encounter.npcs().len())?;
    writeln!(out, "  reinforcements: {}", encounter.reinforcements().len())?;
    writeln!(out, "  map:            {}", map)?;
    Ok(())
}

/// Rewrites the file in place through the setter's save.
pub fn set_environment(path: &Path, value: &str) -> anyhow::Result<()> {
    let mut encounter = load(path, Arc::new(JsonFileSink::new(path)))?;
    encounter.set_environment(value)?;
    info!(path = %path.display(), environment = encounter.environment(), "environment_updated");
    Ok(())
}

pub fn duplicate(path: &Path, out: &Path) -> anyhow::Result<()> {
    let encounter = load(path, Arc::new(NoopSink))?;
    let copy = encounter.duplicate();
    JsonFileSink::new(out).save(copy.id(), &copy.to_raw())?;
    info!(from = %path.display(), to = %out.display(), "encounter_duplicated");
    Ok(())
}

pub fn check(path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    load(path, Arc::new(NoopSink))?;
    writeln!(out, "{}: ok", path.display())?;
    Ok(())
}
