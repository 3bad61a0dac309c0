// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Graphics configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::adapter::GraphicsBackendType;
use crate::renderer::api::util::enums::{BufferUsage, TextureFormat};

/// Startup configuration for the graphics layer.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    /// The backend to create at startup.
    pub backend: GraphicsBackendType,
    /// If `true`, a headless device is created when the requested backend is unavailable.
    pub fallback_to_headless: bool,
    /// Usage hint applied to buffers created without an explicit one.
    pub default_buffer_usage: BufferUsage,
    /// Color attachment format for framebuffers derived from these settings.
    pub color_format: TextureFormat,
    /// Depth attachment format for framebuffers derived from these settings.
    pub depth_format: TextureFormat,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            backend: GraphicsBackendType::OpenGl,
            fallback_to_headless: true,
            default_buffer_usage: BufferUsage::Dynamic,
            color_format: TextureFormat::Rgba8,
            depth_format: TextureFormat::Depth24,
        }
    }
}

impl GraphicsSettings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the settings as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&contents)?;
        log::debug!("Loaded graphics settings from {}", path.as_ref().display());
        Ok(settings)
    }
}
