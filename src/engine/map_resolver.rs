use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Bundled image shown when an encounter has no usable map.
pub const PLACEHOLDER_MAP: &str = "nodata.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Web,
    Desktop,
    Ios,
    Android,
}

pub trait PlatformInfo {
    fn current(&self) -> PlatformKind;
}

/// The platform this binary was compiled for.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl PlatformInfo for HostPlatform {
    fn current(&self) -> PlatformKind {
        if cfg!(target_arch = "wasm32") {
            PlatformKind::Web
        } else if cfg!(target_os = "ios") {
            PlatformKind::Ios
        } else if cfg!(target_os = "android") {
            PlatformKind::Android
        } else {
            PlatformKind::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedPlatform(pub PlatformKind);

impl PlatformInfo for FixedPlatform {
    fn current(&self) -> PlatformKind {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTag {
    Map,
    Frame,
    Npc,
    Pilot,
    Mech,
}

impl ImageTag {
    pub fn dir_name(&self) -> &'static str {
        match self {
            ImageTag::Map => "maps",
            ImageTag::Frame => "frames",
            ImageTag::Npc => "npcs",
            ImageTag::Pilot => "pilots",
            ImageTag::Mech => "mechs",
        }
    }
}

/// Turns a logical `(tag, file name)` pair into something displayable.
/// With `fallback` set the result must point at an asset that always exists.
pub trait ImageResolver {
    fn resolve(&self, tag: ImageTag, name: &str, fallback: bool) -> String;
}

/// Fallback images come from the bundled asset directory, everything else
/// from the user's data directory.
#[derive(Debug, Clone)]
pub struct AssetDirResolver {
    asset_dir: PathBuf,
    data_dir: PathBuf,
}

impl AssetDirResolver {
    pub fn new(asset_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            data_dir: data_dir.into(),
        }
    }
}

impl ImageResolver for AssetDirResolver {
    fn resolve(&self, tag: ImageTag, name: &str, fallback: bool) -> String {
        let root = if fallback { &self.asset_dir } else { &self.data_dir };
        root.join("img")
            .join(tag.dir_name())
            .join(name)
            .display()
            .to_string()
    }
}

/// Picks the map to display: the cloud reference, then the local image on
/// non-web platforms, then the bundled placeholder. Never fails.
pub fn resolve_map(
    cloud_map: &str,
    local_map: &str,
    platform: &dyn PlatformInfo,
    images: &dyn ImageResolver,
) -> String {
    if !cloud_map.is_empty() {
        trace!(source = "cloud", "map_resolved");
        return cloud_map.to_string();
    }

    let platform = platform.current();
    if platform != PlatformKind::Web && !local_map.is_empty() {
        trace!(source = "local", platform = ?platform, "map_resolved");
        return images.resolve(ImageTag::Map, local_map, false);
    }

    trace!(source = "placeholder", platform = ?platform, "map_resolved");
    images.resolve(ImageTag::Frame, PLACEHOLDER_MAP, true)
}
