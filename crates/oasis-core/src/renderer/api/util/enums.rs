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

//! Engine-level rendering enums.
//!
//! Each enum exposes an `ALL` table in declaration order and an `ordinal`, which
//! backends use to build dense lookup tables of native constants.

use serde::{Deserialize, Serialize};

/// The primitive topology used to assemble vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Each vertex is a point.
    PointList,
    /// Every two vertices form an independent line.
    LineList,
    /// Consecutive vertices form a connected line.
    LineStrip,
    /// Every three vertices form an independent triangle.
    TriangleList,
    /// Each vertex after the second forms a triangle with the previous two.
    TriangleStrip,
}

impl Primitive {
    /// Every primitive, in ordinal order.
    pub const ALL: [Primitive; 5] = [
        Primitive::PointList,
        Primitive::LineList,
        Primitive::LineStrip,
        Primitive::TriangleList,
        Primitive::TriangleStrip,
    ];

    /// The index of this value in [`Primitive::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

/// A hint describing how often a buffer's contents change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Rewritten occasionally, drawn many times.
    #[default]
    Dynamic,
    /// Rewritten before almost every draw.
    Stream,
}

impl BufferUsage {
    /// Every usage hint, in ordinal order.
    pub const ALL: [BufferUsage; 3] = [BufferUsage::Static, BufferUsage::Dynamic, BufferUsage::Stream];

    /// The index of this value in [`BufferUsage::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

/// Which binding point a buffer's data is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Vertex,
    /// Element indices.
    Index,
}

/// Defines the storage format of a texture or renderbuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// Four 8-bit normalized components; alias of [`TextureFormat::Rgba8`].
    Rgba,
    /// Four 8-bit normalized components.
    Rgba8,
    /// Four 16-bit float components.
    Rgba16F,
    /// Four 32-bit float components.
    Rgba32F,
    /// Default depth format; alias of [`TextureFormat::Depth24`].
    Depth,
    /// 24-bit depth.
    Depth24,
    /// 32-bit depth.
    Depth32,
}

impl TextureFormat {
    /// Every texture format, in ordinal order.
    pub const ALL: [TextureFormat; 7] = [
        TextureFormat::Rgba,
        TextureFormat::Rgba8,
        TextureFormat::Rgba16F,
        TextureFormat::Rgba32F,
        TextureFormat::Depth,
        TextureFormat::Depth24,
        TextureFormat::Depth32,
    ];

    /// The index of this value in [`TextureFormat::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns `true` for the depth formats.
    pub const fn is_depth_format(self) -> bool {
        matches!(
            self,
            TextureFormat::Depth | TextureFormat::Depth24 | TextureFormat::Depth32
        )
    }

    /// The size in bytes of one pixel as supplied by the host.
    ///
    /// Host pixels are always uploaded as four bytes: RGBA with one unsigned byte per
    /// channel for color formats, one unsigned 32-bit integer for depth formats.
    /// The device converts them to the internal storage format.
    pub const fn input_bytes_per_pixel(self) -> usize {
        4
    }

    /// Size in bytes of a `width` x `height` image of host pixels, or `None` on overflow.
    pub fn input_image_bytes(self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(self.input_bytes_per_pixel()))
    }
}

/// Texture minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MinFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear filtering.
    #[default]
    Linear,
    /// Nearest texel of the nearest mip level.
    NearestMipmapNearest,
    /// Bilinear filtering within the nearest mip level.
    LinearMipmapNearest,
    /// Nearest texel, blended between two mip levels.
    NearestMipmapLinear,
    /// Trilinear filtering.
    LinearMipmapLinear,
}

impl MinFilter {
    /// Every minification filter, in ordinal order.
    pub const ALL: [MinFilter; 6] = [
        MinFilter::Nearest,
        MinFilter::Linear,
        MinFilter::NearestMipmapNearest,
        MinFilter::LinearMipmapNearest,
        MinFilter::NearestMipmapLinear,
        MinFilter::LinearMipmapLinear,
    ];

    /// The index of this value in [`MinFilter::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns `true` if the filter samples from mip levels.
    pub const fn uses_mipmaps(self) -> bool {
        !matches!(self, MinFilter::Nearest | MinFilter::Linear)
    }
}

/// Texture magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MagFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear filtering.
    #[default]
    Linear,
}

impl MagFilter {
    /// Every magnification filter, in ordinal order.
    pub const ALL: [MagFilter; 2] = [MagFilter::Nearest, MagFilter::Linear];

    /// The index of this value in [`MagFilter::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_table_positions() {
        for (i, p) in Primitive::ALL.iter().enumerate() {
            assert_eq!(p.ordinal(), i);
        }
        for (i, u) in BufferUsage::ALL.iter().enumerate() {
            assert_eq!(u.ordinal(), i);
        }
        for (i, f) in TextureFormat::ALL.iter().enumerate() {
            assert_eq!(f.ordinal(), i);
        }
        for (i, f) in MinFilter::ALL.iter().enumerate() {
            assert_eq!(f.ordinal(), i);
        }
        for (i, f) in MagFilter::ALL.iter().enumerate() {
            assert_eq!(f.ordinal(), i);
        }
    }

    #[test]
    fn image_bytes_overflow_is_detected() {
        assert_eq!(TextureFormat::Rgba8.input_image_bytes(256, 256), Some(256 * 256 * 4));
        assert_eq!(TextureFormat::Depth24.input_image_bytes(0, 16), Some(0));
        if usize::BITS == 64 {
            assert_eq!(TextureFormat::Rgba8.input_image_bytes(u32::MAX, u32::MAX), None);
        }
    }

    #[test]
    fn depth_formats_are_flagged() {
        let depth: Vec<_> = TextureFormat::ALL
            .into_iter()
            .filter(|f| f.is_depth_format())
            .collect();
        assert_eq!(
            depth,
            vec![TextureFormat::Depth, TextureFormat::Depth24, TextureFormat::Depth32]
        );
    }

    #[test]
    fn mipmap_filters() {
        assert!(!MinFilter::Linear.uses_mipmaps());
        assert!(MinFilter::NearestMipmapNearest.uses_mipmaps());
        assert!(MinFilter::LinearMipmapLinear.uses_mipmaps());
    }
}
