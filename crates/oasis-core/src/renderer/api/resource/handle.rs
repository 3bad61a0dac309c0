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

//! Opaque native resource handles.

use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroU32;

use crate::renderer::error::ResourceError;

/// The kind of native object a [`ResourceHandle`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A vertex or index buffer.
    Buffer,
    /// A sampled texture.
    Texture,
    /// A framebuffer object (render target).
    Framebuffer,
    /// A renderbuffer, used as a non-sampled depth attachment.
    Renderbuffer,
}

/// An opaque handle to a native GPU resource allocated by a [`GraphicsDevice`].
///
/// The native id is never zero while the handle exists: wrappers model a released
/// resource as the absence of a handle and report [`ResourceHandle::NULL_ID`] instead.
///
/// Handles are bound to the thread that owns the device context and are therefore
/// neither `Send` nor `Sync`.
///
/// [`GraphicsDevice`]: crate::renderer::GraphicsDevice
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    native_id: NonZeroU32,
    kind: ResourceKind,
    _thread_bound: PhantomData<*const ()>,
}

impl ResourceHandle {
    /// The sentinel id reported for a resource that no longer has a native object.
    pub const NULL_ID: u32 = 0;

    /// Wraps a native id, returning `None` for the null sentinel.
    pub fn new(native_id: u32, kind: ResourceKind) -> Option<Self> {
        NonZeroU32::new(native_id).map(|id| Self::from_native(id, kind))
    }

    /// Wraps a native id that is already known to be valid.
    pub fn from_native(native_id: NonZeroU32, kind: ResourceKind) -> Self {
        Self {
            native_id,
            kind,
            _thread_bound: PhantomData,
        }
    }

    /// Returns the raw native id.
    pub fn native_id(&self) -> u32 {
        self.native_id.get()
    }

    /// Returns the native id in its non-zero form, as backends store it.
    pub fn native(&self) -> NonZeroU32 {
        self.native_id
    }

    /// Returns the kind of object this handle refers to.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the handle unchanged if it refers to an object of the given kind.
    ///
    /// Devices use this to reject a handle of the wrong kind with
    /// [`ResourceError::InvalidHandle`].
    pub fn expect_kind(self, kind: ResourceKind) -> Result<Self, ResourceError> {
        if self.kind == kind {
            Ok(self)
        } else {
            Err(ResourceError::InvalidHandle)
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("native_id", &self.native_id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.native_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_id_is_rejected() {
        assert!(ResourceHandle::new(ResourceHandle::NULL_ID, ResourceKind::Buffer).is_none());
        let handle = ResourceHandle::new(7, ResourceKind::Texture).unwrap();
        assert_eq!(handle.native_id(), 7);
        assert_eq!(handle.kind(), ResourceKind::Texture);
    }

    #[test]
    fn expect_kind_rejects_mismatch() {
        let handle = ResourceHandle::new(3, ResourceKind::Framebuffer).unwrap();
        assert!(handle.expect_kind(ResourceKind::Framebuffer).is_ok());
        assert!(matches!(
            handle.expect_kind(ResourceKind::Renderbuffer),
            Err(ResourceError::InvalidHandle)
        ));
    }

    #[test]
    fn display_names_kind_and_id() {
        let handle = ResourceHandle::new(42, ResourceKind::Renderbuffer).unwrap();
        assert_eq!(format!("{handle}"), "Renderbuffer#42");
    }
}
