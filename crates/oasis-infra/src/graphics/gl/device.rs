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

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU32;

use glow::HasContext;

use oasis_core::renderer::{
    BufferTarget, BufferUsage, DeviceInfo, DeviceStats, FramebufferStatus, GraphicsBackendType,
    GraphicsDevice, HostRegion, ResourceError, ResourceHandle, ResourceKind, TextureFormat,
    TextureParams,
};

use super::conversions::{
    default_input_format, default_input_type, framebuffer_status_from_native, IntoGl,
};

/// An OpenGL implementation of [`GraphicsDevice`] on top of a `glow` context.
///
/// The device must be used from the thread on which the context is current.
/// Every configuration call binds the object, configures it and then restores the
/// binding that was active before, so callers never observe a changed binding.
pub struct GlDevice {
    gl: glow::Context,
    info: DeviceInfo,
    live: HashSet<ResourceHandle>,
    stats: DeviceStats,
}

impl GlDevice {
    /// Wraps a context that is current on the calling thread.
    pub fn new(gl: glow::Context) -> Self {
        // SAFETY: querying strings has no preconditions beyond a current context.
        let (name, version) = unsafe {
            (
                gl.get_parameter_string(glow::RENDERER),
                gl.get_parameter_string(glow::VERSION),
            )
        };
        log::info!("GlDevice: Using '{name}' (OpenGL {version}).");

        Self {
            gl,
            info: DeviceInfo {
                name,
                backend_type: GraphicsBackendType::OpenGl,
                version,
            },
            live: HashSet::new(),
            stats: DeviceStats::default(),
        }
    }

    /// Gives access to the underlying `glow` context, e.g. for drawing.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    // --- Handle bookkeeping ---

    fn register(&mut self, native: NonZeroU32, kind: ResourceKind) -> ResourceHandle {
        let handle = ResourceHandle::from_native(native, kind);
        self.live.insert(handle);
        self.stats.record_created(kind);
        log::debug!("GlDevice: Created {handle}.");
        handle
    }

    fn lookup(&self, handle: ResourceHandle, kind: ResourceKind) -> Result<NonZeroU32, ResourceError> {
        let handle = handle.expect_kind(kind)?;
        if self.live.contains(&handle) {
            Ok(handle.native())
        } else {
            Err(ResourceError::InvalidHandle)
        }
    }

    fn unregister(&mut self, handle: ResourceHandle, kind: ResourceKind) -> Result<NonZeroU32, ResourceError> {
        let native = self.lookup(handle, kind)?;
        self.live.remove(&handle);
        self.stats.record_destroyed(kind);
        log::debug!("GlDevice: Destroyed {handle}.");
        Ok(native)
    }

    // --- Bind, configure, restore ---

    fn previous_binding(&self, query: u32) -> Option<NonZeroU32> {
        // SAFETY: binding queries are always valid on a current context.
        let id = unsafe { self.gl.get_parameter_i32(query) };
        NonZeroU32::new(id as u32)
    }

    fn with_buffer<R>(&self, target: u32, native: NonZeroU32, f: impl FnOnce(&glow::Context) -> R) -> R {
        let query = if target == glow::ELEMENT_ARRAY_BUFFER {
            glow::ELEMENT_ARRAY_BUFFER_BINDING
        } else {
            glow::ARRAY_BUFFER_BINDING
        };
        let previous = self.previous_binding(query);
        // SAFETY: `native` names a live buffer owned by this device.
        unsafe {
            self.gl.bind_buffer(target, Some(glow::NativeBuffer(native)));
            let result = f(&self.gl);
            self.gl.bind_buffer(target, previous.map(glow::NativeBuffer));
            result
        }
    }

    fn with_texture<R>(&self, native: NonZeroU32, f: impl FnOnce(&glow::Context) -> R) -> R {
        let previous = self.previous_binding(glow::TEXTURE_BINDING_2D);
        // SAFETY: `native` names a live texture owned by this device.
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(native)));
            let result = f(&self.gl);
            self.gl.bind_texture(glow::TEXTURE_2D, previous.map(glow::NativeTexture));
            result
        }
    }

    fn with_renderbuffer<R>(&self, native: NonZeroU32, f: impl FnOnce(&glow::Context) -> R) -> R {
        let previous = self.previous_binding(glow::RENDERBUFFER_BINDING);
        // SAFETY: `native` names a live renderbuffer owned by this device.
        unsafe {
            self.gl
                .bind_renderbuffer(glow::RENDERBUFFER, Some(glow::NativeRenderbuffer(native)));
            let result = f(&self.gl);
            self.gl
                .bind_renderbuffer(glow::RENDERBUFFER, previous.map(glow::NativeRenderbuffer));
            result
        }
    }

    fn with_framebuffer<R>(&self, native: NonZeroU32, f: impl FnOnce(&glow::Context) -> R) -> R {
        let previous = self.previous_binding(glow::FRAMEBUFFER_BINDING);
        // SAFETY: `native` names a live framebuffer owned by this device.
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, Some(glow::NativeFramebuffer(native)));
            let result = f(&self.gl);
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, previous.map(glow::NativeFramebuffer));
            result
        }
    }

    fn check_error(&self, operation: &str) -> Result<(), ResourceError> {
        // SAFETY: glGetError has no preconditions.
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            log::error!("GlDevice: {operation} failed with GL error {code:#06x}.");
            Err(ResourceError::BackendError(format!(
                "{operation} failed with GL error {code:#06x}"
            )))
        }
    }
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDevice")
            .field("info", &self.info)
            .field("live_objects", &self.live.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl GraphicsDevice for GlDevice {
    fn info(&self) -> DeviceInfo {
        self.info.clone()
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn allocate_host_memory(&mut self, bytes: usize) -> HostRegion {
        self.stats.record_host_alloc(bytes);
        HostRegion::zeroed(bytes)
    }

    fn free_host_memory(&mut self, region: HostRegion) {
        self.stats.record_host_free(region.len());
    }

    // --- Buffer Operations ---

    fn create_buffer(&mut self, _target: BufferTarget) -> Result<ResourceHandle, ResourceError> {
        // SAFETY: creating a name has no preconditions beyond a current context.
        let buffer = unsafe { self.gl.create_buffer() }.map_err(ResourceError::BackendError)?;
        Ok(self.register(buffer.0, ResourceKind::Buffer))
    }

    fn upload_buffer(
        &mut self,
        handle: ResourceHandle,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        let native = self.lookup(handle, ResourceKind::Buffer)?;
        let target = target.into_gl();
        let usage = usage.into_gl();
        // SAFETY: the buffer is bound by `with_buffer` for the duration of the call.
        self.with_buffer(target, native, |gl| unsafe {
            gl.buffer_data_u8_slice(target, data, usage)
        });
        self.check_error("glBufferData")?;
        self.stats.uploads += 1;
        log::trace!("GlDevice: Uploaded {} bytes to {handle}.", data.len());
        Ok(())
    }

    fn destroy_buffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        let native = self.unregister(handle, ResourceKind::Buffer)?;
        // SAFETY: the name was created by this device and is no longer tracked.
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(native)) };
        Ok(())
    }

    // --- Texture Operations ---

    fn create_texture(&mut self) -> Result<ResourceHandle, ResourceError> {
        // SAFETY: creating a name has no preconditions beyond a current context.
        let texture = unsafe { self.gl.create_texture() }.map_err(ResourceError::BackendError)?;
        Ok(self.register(texture.0, ResourceKind::Texture))
    }

    fn upload_texture(
        &mut self,
        handle: ResourceHandle,
        format: TextureFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), ResourceError> {
        let native = self.lookup(handle, ResourceKind::Texture)?;
        let expected = format.input_image_bytes(width, height).ok_or_else(|| {
            ResourceError::InvalidDescriptor(format!("texture of {width}x{height} is too large"))
        })?;
        ResourceError::check_range(0, expected, pixels.len())?;

        // SAFETY: the texture is bound and `pixels` holds at least `expected` bytes.
        self.with_texture(native, |gl| unsafe {
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.into_gl() as i32,
                width as i32,
                height as i32,
                0,
                default_input_format(format),
                default_input_type(format),
                Some(&pixels[..expected]),
            )
        });
        self.check_error("glTexImage2D")?;
        self.stats.uploads += 1;
        log::trace!("GlDevice: Uploaded {width}x{height} {format:?} pixels to {handle}.");
        Ok(())
    }

    fn set_texture_params(
        &mut self,
        handle: ResourceHandle,
        params: &TextureParams,
    ) -> Result<(), ResourceError> {
        let native = self.lookup(handle, ResourceKind::Texture)?;
        let params = *params;

        // SAFETY: the texture is bound by `with_texture` for the duration of the call.
        self.with_texture(native, |gl| unsafe {
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                params.min_filter.into_gl() as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                params.mag_filter.into_gl() as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAX_LEVEL,
                params.mip_levels.saturating_sub(1) as i32,
            );
            if params.min_filter.uses_mipmaps() && params.mip_levels > 1 {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
        });
        self.check_error("glTexParameteri")
    }

    fn destroy_texture(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        let native = self.unregister(handle, ResourceKind::Texture)?;
        // SAFETY: the name was created by this device and is no longer tracked.
        unsafe { self.gl.delete_texture(glow::NativeTexture(native)) };
        Ok(())
    }

    // --- Renderbuffer Operations ---

    fn create_renderbuffer(
        &mut self,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<ResourceHandle, ResourceError> {
        // SAFETY: creating a name has no preconditions beyond a current context.
        let renderbuffer =
            unsafe { self.gl.create_renderbuffer() }.map_err(ResourceError::BackendError)?;
        let internal_format = format.into_gl();

        // SAFETY: the renderbuffer is bound by `with_renderbuffer` for the duration of the call.
        self.with_renderbuffer(renderbuffer.0, |gl| unsafe {
            gl.renderbuffer_storage(glow::RENDERBUFFER, internal_format, width as i32, height as i32)
        });
        if let Err(err) = self.check_error("glRenderbufferStorage") {
            // SAFETY: the name was just created and is not tracked yet.
            unsafe { self.gl.delete_renderbuffer(renderbuffer) };
            return Err(err);
        }
        Ok(self.register(renderbuffer.0, ResourceKind::Renderbuffer))
    }

    fn destroy_renderbuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        let native = self.unregister(handle, ResourceKind::Renderbuffer)?;
        // SAFETY: the name was created by this device and is no longer tracked.
        unsafe { self.gl.delete_renderbuffer(glow::NativeRenderbuffer(native)) };
        Ok(())
    }

    // --- Framebuffer Operations ---

    fn create_framebuffer(&mut self) -> Result<ResourceHandle, ResourceError> {
        // SAFETY: creating a name has no preconditions beyond a current context.
        let framebuffer =
            unsafe { self.gl.create_framebuffer() }.map_err(ResourceError::BackendError)?;
        Ok(self.register(framebuffer.0, ResourceKind::Framebuffer))
    }

    fn attach_color_texture(
        &mut self,
        framebuffer: ResourceHandle,
        texture: ResourceHandle,
    ) -> Result<(), ResourceError> {
        let framebuffer = self.lookup(framebuffer, ResourceKind::Framebuffer)?;
        let texture = self.lookup(texture, ResourceKind::Texture)?;

        // SAFETY: both names are live; the framebuffer is bound for the call.
        self.with_framebuffer(framebuffer, |gl| unsafe {
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(glow::NativeTexture(texture)),
                0,
            )
        });
        self.check_error("glFramebufferTexture2D")
    }

    fn attach_depth_renderbuffer(
        &mut self,
        framebuffer: ResourceHandle,
        renderbuffer: ResourceHandle,
    ) -> Result<(), ResourceError> {
        let framebuffer = self.lookup(framebuffer, ResourceKind::Framebuffer)?;
        let renderbuffer = self.lookup(renderbuffer, ResourceKind::Renderbuffer)?;

        // SAFETY: both names are live; the framebuffer is bound for the call.
        self.with_framebuffer(framebuffer, |gl| unsafe {
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(glow::NativeRenderbuffer(renderbuffer)),
            )
        });
        self.check_error("glFramebufferRenderbuffer")
    }

    fn check_framebuffer_status(
        &mut self,
        framebuffer: ResourceHandle,
    ) -> Result<FramebufferStatus, ResourceError> {
        let native = self.lookup(framebuffer, ResourceKind::Framebuffer)?;
        // SAFETY: the framebuffer is bound by `with_framebuffer` for the duration of the call.
        let code = self.with_framebuffer(native, |gl| unsafe {
            gl.check_framebuffer_status(glow::FRAMEBUFFER)
        });
        Ok(framebuffer_status_from_native(code))
    }

    fn destroy_framebuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        let native = self.unregister(handle, ResourceKind::Framebuffer)?;
        // SAFETY: the name was created by this device and is no longer tracked.
        unsafe { self.gl.delete_framebuffer(glow::NativeFramebuffer(native)) };
        Ok(())
    }
}
