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

//! Resource accounting for a graphics device.

use crate::renderer::api::resource::ResourceKind;

/// A snapshot of the resources a device currently owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Live buffer objects.
    pub live_buffers: usize,
    /// Live texture objects.
    pub live_textures: usize,
    /// Live renderbuffer objects.
    pub live_renderbuffers: usize,
    /// Live framebuffer objects.
    pub live_framebuffers: usize,
    /// Host memory currently handed out, in bytes.
    pub host_bytes_allocated: usize,
    /// Host regions handed out since the device was created.
    pub host_allocations: u64,
    /// Buffer and texture uploads performed since the device was created.
    pub uploads: u64,
}

impl DeviceStats {
    /// Records a newly created object of the given kind.
    pub fn record_created(&mut self, kind: ResourceKind) {
        *self.live_count_mut(kind) += 1;
    }

    /// Records the destruction of an object of the given kind.
    pub fn record_destroyed(&mut self, kind: ResourceKind) {
        let count = self.live_count_mut(kind);
        *count = count.saturating_sub(1);
    }

    /// Records a host allocation of `bytes`.
    pub fn record_host_alloc(&mut self, bytes: usize) {
        self.host_bytes_allocated += bytes;
        self.host_allocations += 1;
    }

    /// Records that a host region of `bytes` was returned.
    pub fn record_host_free(&mut self, bytes: usize) {
        self.host_bytes_allocated = self.host_bytes_allocated.saturating_sub(bytes);
    }

    /// The number of live objects of the given kind.
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Buffer => self.live_buffers,
            ResourceKind::Texture => self.live_textures,
            ResourceKind::Renderbuffer => self.live_renderbuffers,
            ResourceKind::Framebuffer => self.live_framebuffers,
        }
    }

    fn live_count_mut(&mut self, kind: ResourceKind) -> &mut usize {
        match kind {
            ResourceKind::Buffer => &mut self.live_buffers,
            ResourceKind::Texture => &mut self.live_textures,
            ResourceKind::Renderbuffer => &mut self.live_renderbuffers,
            ResourceKind::Framebuffer => &mut self.live_framebuffers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_create_and_destroy() {
        let mut stats = DeviceStats::default();
        stats.record_created(ResourceKind::Buffer);
        stats.record_created(ResourceKind::Buffer);
        stats.record_created(ResourceKind::Framebuffer);
        stats.record_destroyed(ResourceKind::Buffer);

        assert_eq!(stats.live_count(ResourceKind::Buffer), 1);
        assert_eq!(stats.live_count(ResourceKind::Framebuffer), 1);
        assert_eq!(stats.live_count(ResourceKind::Texture), 0);
    }

    #[test]
    fn host_bytes_never_underflow() {
        let mut stats = DeviceStats::default();
        stats.record_host_alloc(16);
        stats.record_host_free(64);
        assert_eq!(stats.host_bytes_allocated, 0);
        assert_eq!(stats.host_allocations, 1);
    }
}
