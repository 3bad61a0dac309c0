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

//! Host-resident memory regions backing staging resources.

/// A block of host memory handed out by [`GraphicsDevice::allocate_host_memory`].
///
/// Staging buffers and textures keep their CPU-side mirror in a region and return
/// it to the device with [`GraphicsDevice::free_host_memory`] when they grow or are
/// released, so devices can account for host memory alongside native objects.
///
/// [`GraphicsDevice::allocate_host_memory`]: crate::renderer::GraphicsDevice::allocate_host_memory
/// [`GraphicsDevice::free_host_memory`]: crate::renderer::GraphicsDevice::free_host_memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostRegion {
    bytes: Vec<u8>,
}

impl HostRegion {
    /// Creates a zero-filled region of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// The size of the region in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The region's contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The region's contents, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
