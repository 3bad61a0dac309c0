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

//! Device information.

use serde::{Deserialize, Serialize};

/// A backend-agnostic representation of the graphics API behind a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GraphicsBackendType {
    /// OpenGL (through `glow`).
    #[default]
    OpenGl,
    /// In-memory device without a GPU, for tests and tools.
    Headless,
}

/// Provides standardized, backend-agnostic information about a graphics device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// A human-readable device name (e.g., the GL renderer string).
    pub name: String,
    /// The graphics API backend this device is associated with.
    pub backend_type: GraphicsBackendType,
    /// The API version string reported by the driver.
    pub version: String,
}
