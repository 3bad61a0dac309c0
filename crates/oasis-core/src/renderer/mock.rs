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

//! A call-recording graphics device for unit tests.

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// A mock graphics device that hands out unique ids and records every call.
#[derive(Debug)]
pub(crate) struct MockGraphicsDevice {
    next_id: u32,
    pub stats: DeviceStats,
    pub created: usize,
    pub host_allocations: usize,
    pub host_frees: usize,
    pub last_allocation_bytes: usize,
    pub buffer_uploads: usize,
    pub last_upload: Vec<u8>,
    pub last_usage: Option<BufferUsage>,
    pub texture_uploads: usize,
    pub param_updates: usize,
    pub attachments: Vec<(ResourceHandle, ResourceHandle)>,
    pub destroyed: Vec<ResourceHandle>,
    pub framebuffer_status: FramebufferStatus,
    pub fail_uploads: bool,
    pub fail_renderbuffers: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            stats: DeviceStats::default(),
            created: 0,
            host_allocations: 0,
            host_frees: 0,
            last_allocation_bytes: 0,
            buffer_uploads: 0,
            last_upload: Vec::new(),
            last_usage: None,
            texture_uploads: 0,
            param_updates: 0,
            attachments: Vec::new(),
            destroyed: Vec::new(),
            framebuffer_status: FramebufferStatus::Complete,
            fail_uploads: false,
            fail_renderbuffers: false,
        }
    }

    fn next(&mut self, kind: ResourceKind) -> ResourceHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.stats.record_created(kind);
        ResourceHandle::new(id, kind).unwrap()
    }

    fn destroy(&mut self, handle: ResourceHandle, kind: ResourceKind) -> Result<(), ResourceError> {
        let handle = handle.expect_kind(kind)?;
        self.stats.record_destroyed(kind);
        self.destroyed.push(handle);
        Ok(())
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            name: "Mock Device".to_string(),
            backend_type: GraphicsBackendType::Headless,
            version: "0".to_string(),
        }
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn allocate_host_memory(&mut self, bytes: usize) -> HostRegion {
        self.host_allocations += 1;
        self.last_allocation_bytes = bytes;
        self.stats.record_host_alloc(bytes);
        HostRegion::zeroed(bytes)
    }

    fn free_host_memory(&mut self, region: HostRegion) {
        self.host_frees += 1;
        self.stats.record_host_free(region.len());
    }

    fn create_buffer(&mut self, _target: BufferTarget) -> Result<ResourceHandle, ResourceError> {
        Ok(self.next(ResourceKind::Buffer))
    }

    fn upload_buffer(
        &mut self,
        handle: ResourceHandle,
        _target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        handle.expect_kind(ResourceKind::Buffer)?;
        if self.fail_uploads {
            return Err(ResourceError::BackendError("upload rejected".to_string()));
        }
        self.buffer_uploads += 1;
        self.stats.uploads += 1;
        self.last_upload = data.to_vec();
        self.last_usage = Some(usage);
        Ok(())
    }

    fn destroy_buffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.destroy(handle, ResourceKind::Buffer)
    }

    fn create_texture(&mut self) -> Result<ResourceHandle, ResourceError> {
        Ok(self.next(ResourceKind::Texture))
    }

    fn upload_texture(
        &mut self,
        handle: ResourceHandle,
        _format: TextureFormat,
        _width: u32,
        _height: u32,
        _pixels: &[u8],
    ) -> Result<(), ResourceError> {
        handle.expect_kind(ResourceKind::Texture)?;
        self.texture_uploads += 1;
        self.stats.uploads += 1;
        Ok(())
    }

    fn set_texture_params(
        &mut self,
        handle: ResourceHandle,
        _params: &TextureParams,
    ) -> Result<(), ResourceError> {
        handle.expect_kind(ResourceKind::Texture)?;
        self.param_updates += 1;
        Ok(())
    }

    fn destroy_texture(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.destroy(handle, ResourceKind::Texture)
    }

    fn create_renderbuffer(
        &mut self,
        _format: TextureFormat,
        _width: u32,
        _height: u32,
    ) -> Result<ResourceHandle, ResourceError> {
        if self.fail_renderbuffers {
            return Err(ResourceError::BackendError("out of renderbuffers".to_string()));
        }
        Ok(self.next(ResourceKind::Renderbuffer))
    }

    fn destroy_renderbuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.destroy(handle, ResourceKind::Renderbuffer)
    }

    fn create_framebuffer(&mut self) -> Result<ResourceHandle, ResourceError> {
        Ok(self.next(ResourceKind::Framebuffer))
    }

    fn attach_color_texture(
        &mut self,
        framebuffer: ResourceHandle,
        texture: ResourceHandle,
    ) -> Result<(), ResourceError> {
        self.attachments.push((framebuffer, texture));
        Ok(())
    }

    fn attach_depth_renderbuffer(
        &mut self,
        framebuffer: ResourceHandle,
        renderbuffer: ResourceHandle,
    ) -> Result<(), ResourceError> {
        self.attachments.push((framebuffer, renderbuffer));
        Ok(())
    }

    fn check_framebuffer_status(
        &mut self,
        framebuffer: ResourceHandle,
    ) -> Result<FramebufferStatus, ResourceError> {
        framebuffer.expect_kind(ResourceKind::Framebuffer)?;
        Ok(self.framebuffer_status)
    }

    fn destroy_framebuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.destroy(handle, ResourceKind::Framebuffer)
    }
}
