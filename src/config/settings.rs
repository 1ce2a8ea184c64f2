use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::map_resolver::{AssetDirResolver, HostPlatform, PlatformInfo, PlatformKind};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ToolSettings {
    /// Bundled images, including the placeholder map.
    pub asset_dir: PathBuf,

    /// User images referenced by `local_map`.
    pub data_dir: PathBuf,

    // Overrides the detected platform (e.g. preview web behaviour on desktop)
    pub platform: Option<PlatformKind>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        let mut data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.push("encounter_forge");

        Self {
            asset_dir: PathBuf::from("static"),
            data_dir,
            platform: None,
        }
    }
}

impl ToolSettings {
    pub fn platform(&self) -> PlatformKind {
        self.platform.unwrap_or_else(|| HostPlatform.current())
    }

    pub fn image_resolver(&self) -> AssetDirResolver {
        AssetDirResolver::new(self.asset_dir.clone(), self.data_dir.clone())
    }
}
