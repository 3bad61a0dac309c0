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

//! Off-screen render targets.

use std::fmt;

use super::handle::ResourceHandle;
use super::texture::Texture2d;
use crate::renderer::api::device::GraphicsSettings;
use crate::renderer::api::util::enums::TextureFormat;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// The completeness of a framebuffer as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    /// The framebuffer can be rendered to.
    Complete,
    /// The framebuffer has no attachment at all.
    MissingAttachment,
    /// An attachment is unusable, e.g. its format cannot be rendered to.
    IncompleteAttachment,
    /// The combination of attachments is not supported by the device.
    Unsupported,
    /// A native status code with no portable meaning.
    Unknown(u32),
}

impl FramebufferStatus {
    /// Returns `true` for [`FramebufferStatus::Complete`].
    pub fn is_complete(self) -> bool {
        self == FramebufferStatus::Complete
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferStatus::Complete => write!(f, "complete"),
            FramebufferStatus::MissingAttachment => write!(f, "missing attachment"),
            FramebufferStatus::IncompleteAttachment => write!(f, "incomplete attachment"),
            FramebufferStatus::Unsupported => write!(f, "unsupported"),
            FramebufferStatus::Unknown(code) => write!(f, "unknown status {code:#06x}"),
        }
    }
}

/// Describes the attachments of a framebuffer to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferDescriptor {
    /// The width of every attachment in pixels.
    pub width: u32,
    /// The height of every attachment in pixels.
    pub height: u32,
    /// The format of the color texture, if any.
    pub color: Option<TextureFormat>,
    /// The format of the depth renderbuffer, if any.
    pub depth: Option<TextureFormat>,
}

impl FramebufferDescriptor {
    /// Describes an `Rgba8` color and/or `Depth24` depth target.
    pub fn new(width: u32, height: u32, want_color: bool, want_depth: bool) -> Self {
        Self::from_settings(&GraphicsSettings::default(), width, height, want_color, want_depth)
    }

    /// Describes a target using the attachment formats of `settings`.
    pub fn from_settings(
        settings: &GraphicsSettings,
        width: u32,
        height: u32,
        want_color: bool,
        want_depth: bool,
    ) -> Self {
        Self {
            width,
            height,
            color: want_color.then_some(settings.color_format),
            depth: want_depth.then_some(settings.depth_format),
        }
    }

    fn validate(&self) -> Result<(), ResourceError> {
        if self.width == 0 || self.height == 0 {
            return Err(ResourceError::InvalidDescriptor(format!(
                "framebuffer dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(format) = self.color.filter(|f| f.is_depth_format()) {
            return Err(ResourceError::InvalidDescriptor(format!(
                "{format:?} cannot be a color attachment"
            )));
        }
        if let Some(format) = self.depth.filter(|f| !f.is_depth_format()) {
            return Err(ResourceError::InvalidDescriptor(format!(
                "{format:?} cannot be a depth attachment"
            )));
        }
        Ok(())
    }
}

/// A framebuffer owning an optional color texture and an optional depth renderbuffer.
#[derive(Debug)]
pub struct Framebuffer {
    handle: Option<ResourceHandle>,
    width: u32,
    height: u32,
    color: Option<Texture2d>,
    depth: Option<ResourceHandle>,
    status: FramebufferStatus,
}

impl Framebuffer {
    /// Creates a framebuffer and its attachments, then checks completeness.
    ///
    /// An incomplete framebuffer is still returned; inspect [`Framebuffer::status`].
    /// If any native object fails to be created, the ones already created are
    /// destroyed before the error is returned.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        descriptor: &FramebufferDescriptor,
    ) -> Result<Self, ResourceError> {
        descriptor.validate()?;
        let handle = device.create_framebuffer()?;

        let mut color = None;
        let mut depth = None;
        let status = match Self::attach(device, handle, descriptor, &mut color, &mut depth) {
            Ok(status) => status,
            Err(err) => {
                if let Err(cleanup) = Self::destroy_parts(device, handle, color, depth) {
                    log::error!("Failed to clean up framebuffer {handle}: {cleanup}");
                }
                return Err(err);
            }
        };

        if status.is_complete() {
            log::debug!(
                "Framebuffer {handle} complete ({}x{})",
                descriptor.width,
                descriptor.height
            );
        } else {
            log::warn!("Framebuffer {handle} is not complete: {status}");
        }

        Ok(Self {
            handle: Some(handle),
            width: descriptor.width,
            height: descriptor.height,
            color,
            depth,
            status,
        })
    }

    /// Creates a framebuffer with the default `Rgba8` color and `Depth24` depth formats.
    pub fn create(
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        want_color: bool,
        want_depth: bool,
    ) -> Result<Self, ResourceError> {
        Self::new(
            device,
            &FramebufferDescriptor::new(width, height, want_color, want_depth),
        )
    }

    fn attach(
        device: &mut dyn GraphicsDevice,
        handle: ResourceHandle,
        descriptor: &FramebufferDescriptor,
        color: &mut Option<Texture2d>,
        depth: &mut Option<ResourceHandle>,
    ) -> Result<FramebufferStatus, ResourceError> {
        if let Some(format) = descriptor.color {
            let texture = color.insert(Texture2d::new(
                device,
                format,
                descriptor.width,
                descriptor.height,
            )?);
            texture.upload(device)?;
            let texture_handle = texture.handle().ok_or(ResourceError::Released)?;
            device.attach_color_texture(handle, texture_handle)?;
        }
        if let Some(format) = descriptor.depth {
            let renderbuffer =
                device.create_renderbuffer(format, descriptor.width, descriptor.height)?;
            *depth = Some(renderbuffer);
            device.attach_depth_renderbuffer(handle, renderbuffer)?;
        }
        device.check_framebuffer_status(handle)
    }

    // Destroys everything, reporting the first failure.
    fn destroy_parts(
        device: &mut dyn GraphicsDevice,
        handle: ResourceHandle,
        color: Option<Texture2d>,
        depth: Option<ResourceHandle>,
    ) -> Result<(), ResourceError> {
        let mut first_error = None;

        if let Some(mut texture) = color {
            if let Err(err) = texture.release(device) {
                first_error.get_or_insert(err);
            }
        }
        if let Some(renderbuffer) = depth {
            if let Err(err) = device.destroy_renderbuffer(renderbuffer) {
                first_error.get_or_insert(err);
            }
        }
        if let Err(err) = device.destroy_framebuffer(handle) {
            first_error.get_or_insert(err);
        }

        first_error.map_or(Ok(()), Err)
    }

    /// The framebuffer's handle, or `None` once disposed.
    pub fn handle(&self) -> Option<ResourceHandle> {
        self.handle
    }

    /// The framebuffer's native id, or [`ResourceHandle::NULL_ID`] once disposed.
    pub fn native_id(&self) -> u32 {
        self.handle.map_or(ResourceHandle::NULL_ID, |h| h.native_id())
    }

    /// The color texture's native id, or [`ResourceHandle::NULL_ID`] if absent.
    pub fn color_texture_id(&self) -> u32 {
        self.color
            .as_ref()
            .and_then(Texture2d::handle)
            .map_or(ResourceHandle::NULL_ID, |h| h.native_id())
    }

    /// The depth renderbuffer's native id, or [`ResourceHandle::NULL_ID`] if absent.
    pub fn depth_renderbuffer_id(&self) -> u32 {
        self.depth
            .map_or(ResourceHandle::NULL_ID, |h| h.native_id())
    }

    /// The color texture, if the framebuffer has one.
    pub fn texture(&self) -> Option<&Texture2d> {
        self.color.as_ref()
    }

    /// Returns `true` if a color texture is attached.
    pub fn has_texture(&self) -> bool {
        self.color.is_some()
    }

    /// Returns `true` if a depth renderbuffer is attached.
    pub fn has_depth_attachment(&self) -> bool {
        self.depth.is_some()
    }

    /// Always `false`: stencil attachments are not supported.
    pub fn has_stencil_attachment(&self) -> bool {
        false
    }

    /// The width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The completeness status observed at creation.
    pub fn status(&self) -> FramebufferStatus {
        self.status
    }

    /// Returns `true` if the completeness check passed.
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Returns `true` once the framebuffer has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    /// Destroys the framebuffer and every attachment it owns.
    ///
    /// After disposal every id reads as [`ResourceHandle::NULL_ID`]. Disposing twice
    /// fails with [`ResourceError::Released`].
    pub fn dispose(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        let handle = self.handle.take().ok_or(ResourceError::Released)?;
        let result = Self::destroy_parts(device, handle, self.color.take(), self.depth.take());
        log::debug!("Disposed framebuffer {handle}");
        result
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            log::warn!("Framebuffer {handle} dropped without dispose; the native objects leak");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::resource::handle::ResourceKind;
    use crate::renderer::mock::MockGraphicsDevice;

    #[test]
    fn complete_framebuffer_exposes_ids() {
        let mut device = MockGraphicsDevice::new();
        let descriptor = FramebufferDescriptor::new(64, 32, true, true);

        let mut framebuffer = Framebuffer::new(&mut device, &descriptor).unwrap();

        assert_eq!(framebuffer.status(), FramebufferStatus::Complete);
        assert_ne!(framebuffer.native_id(), 0);
        assert_ne!(framebuffer.color_texture_id(), 0);
        assert_ne!(framebuffer.depth_renderbuffer_id(), 0);
        assert_eq!(device.attachments.len(), 2);
        assert_eq!(
            framebuffer.texture().map(Texture2d::format),
            Some(TextureFormat::Rgba8)
        );

        framebuffer.dispose(&mut device).unwrap();
    }

    #[test]
    fn dispose_zeroes_ids_and_destroys_everything() {
        let mut device = MockGraphicsDevice::new();
        let descriptor = FramebufferDescriptor::new(256, 256, true, true);
        let mut framebuffer = Framebuffer::new(&mut device, &descriptor).unwrap();

        assert!(framebuffer.has_texture());
        assert!(framebuffer.has_depth_attachment());
        assert!(!framebuffer.has_stencil_attachment());
        assert!(framebuffer.is_complete());

        framebuffer.dispose(&mut device).unwrap();
        assert!(!framebuffer.has_texture());
        assert!(!framebuffer.has_depth_attachment());

        assert!(framebuffer.is_disposed());
        assert_eq!(framebuffer.native_id(), 0);
        assert_eq!(framebuffer.color_texture_id(), 0);
        assert_eq!(framebuffer.depth_renderbuffer_id(), 0);
        let kinds: Vec<ResourceKind> = device.destroyed.iter().map(|h| h.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::Texture,
                ResourceKind::Renderbuffer,
                ResourceKind::Framebuffer
            ]
        );
    }

    #[test]
    fn second_dispose_is_rejected() {
        let mut device = MockGraphicsDevice::new();
        let descriptor = FramebufferDescriptor::new(8, 8, true, false);
        let mut framebuffer = Framebuffer::new(&mut device, &descriptor).unwrap();

        framebuffer.dispose(&mut device).unwrap();
        let destroyed = device.destroyed.len();

        assert_eq!(framebuffer.dispose(&mut device), Err(ResourceError::Released));
        assert_eq!(device.destroyed.len(), destroyed);
    }

    #[test]
    fn color_only_has_no_depth() {
        let mut device = MockGraphicsDevice::new();
        let mut framebuffer = Framebuffer::create(&mut device, 8, 8, true, false).unwrap();

        assert_eq!(framebuffer.depth_renderbuffer_id(), 0);
        assert_ne!(framebuffer.color_texture_id(), 0);
        framebuffer.dispose(&mut device).unwrap();
    }

    #[test]
    fn incomplete_framebuffer_is_still_returned() {
        let mut device = MockGraphicsDevice::new();
        device.framebuffer_status = FramebufferStatus::MissingAttachment;
        let descriptor = FramebufferDescriptor::new(8, 8, false, false);

        let mut framebuffer = Framebuffer::new(&mut device, &descriptor).unwrap();

        assert_eq!(framebuffer.status(), FramebufferStatus::MissingAttachment);
        assert!(!framebuffer.status().is_complete());
        framebuffer.dispose(&mut device).unwrap();
    }

    #[test]
    fn failed_attachment_cleans_up() {
        let mut device = MockGraphicsDevice::new();
        device.fail_renderbuffers = true;
        let descriptor = FramebufferDescriptor::new(8, 8, true, true);

        let result = Framebuffer::new(&mut device, &descriptor);

        assert!(matches!(result, Err(ResourceError::BackendError(_))));
        assert_eq!(device.stats.live_textures, 0);
        assert_eq!(device.stats.live_framebuffers, 0);
        assert_eq!(device.host_frees, device.host_allocations);
    }

    #[test]
    fn invalid_descriptors_are_rejected_before_device_work() {
        let mut device = MockGraphicsDevice::new();

        let zero = FramebufferDescriptor::new(0, 8, true, true);
        let depth_as_color = FramebufferDescriptor {
            color: Some(TextureFormat::Depth24),
            ..FramebufferDescriptor::new(8, 8, false, false)
        };
        let color_as_depth = FramebufferDescriptor {
            depth: Some(TextureFormat::Rgba),
            ..FramebufferDescriptor::new(8, 8, false, false)
        };

        for descriptor in [zero, depth_as_color, color_as_depth] {
            assert!(matches!(
                Framebuffer::new(&mut device, &descriptor),
                Err(ResourceError::InvalidDescriptor(_))
            ));
        }
        assert_eq!(device.created, 0);
    }

    #[test]
    fn settings_choose_attachment_formats() {
        let settings = GraphicsSettings {
            color_format: TextureFormat::Rgba16F,
            depth_format: TextureFormat::Depth32,
            ..Default::default()
        };
        let descriptor = FramebufferDescriptor::from_settings(&settings, 4, 4, true, false);
        assert_eq!(descriptor.color, Some(TextureFormat::Rgba16F));
        assert_eq!(descriptor.depth, None);
    }

    #[test]
    fn status_display_names_unknown_codes() {
        assert_eq!(FramebufferStatus::Unknown(0x8cdd).to_string(), "unknown status 0x8cdd");
        assert_eq!(FramebufferStatus::Complete.to_string(), "complete");
    }
}
