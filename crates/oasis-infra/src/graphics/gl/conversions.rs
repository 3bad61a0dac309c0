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

//! Translation of engine enumerations into OpenGL constants.
//!
//! The table is built once, on first access, and shared process-wide. Every
//! enumeration is translated through a dense array indexed by its ordinal, so each
//! lookup is a bounds-checked array read.

use std::collections::HashMap;
use std::sync::OnceLock;

use oasis_core::renderer::api::resource::FramebufferStatus;
use oasis_core::renderer::api::util::{
    Attribute, BufferTarget, BufferUsage, MagFilter, MinFilter, Primitive, TextureFormat,
};

/// Immutable lookup tables from engine enumerations to GL constants.
#[derive(Debug)]
pub struct ConversionTable {
    primitives: [u32; Primitive::ALL.len()],
    usages: [u32; BufferUsage::ALL.len()],
    formats: [u32; TextureFormat::ALL.len()],
    min_filters: [u32; MinFilter::ALL.len()],
    mag_filters: [u32; MagFilter::ALL.len()],
    attributes: HashMap<&'static str, Attribute>,
}

static TABLE: OnceLock<ConversionTable> = OnceLock::new();

impl ConversionTable {
    /// The process-wide table, built on first use.
    pub fn global() -> &'static ConversionTable {
        TABLE.get_or_init(|| {
            log::trace!("Building GL conversion table.");
            Self::build()
        })
    }

    fn build() -> Self {
        let mut primitives = [0; Primitive::ALL.len()];
        for primitive in Primitive::ALL {
            primitives[primitive.ordinal()] = match primitive {
                Primitive::PointList => glow::POINTS,
                Primitive::LineList => glow::LINES,
                Primitive::LineStrip => glow::LINE_STRIP,
                Primitive::TriangleList => glow::TRIANGLES,
                Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
            };
        }

        let mut usages = [0; BufferUsage::ALL.len()];
        for usage in BufferUsage::ALL {
            usages[usage.ordinal()] = match usage {
                BufferUsage::Static => glow::STATIC_DRAW,
                BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
                BufferUsage::Stream => glow::STREAM_DRAW,
            };
        }

        let mut formats = [0; TextureFormat::ALL.len()];
        for format in TextureFormat::ALL {
            formats[format.ordinal()] = match format {
                TextureFormat::Rgba => glow::RGBA8,
                TextureFormat::Rgba8 => glow::RGBA8,
                TextureFormat::Rgba16F => glow::RGBA16F,
                TextureFormat::Rgba32F => glow::RGBA32F,
                TextureFormat::Depth => glow::DEPTH_COMPONENT24,
                TextureFormat::Depth24 => glow::DEPTH_COMPONENT24,
                TextureFormat::Depth32 => glow::DEPTH_COMPONENT32,
            };
        }

        let mut min_filters = [0; MinFilter::ALL.len()];
        for filter in MinFilter::ALL {
            min_filters[filter.ordinal()] = match filter {
                MinFilter::Nearest => glow::NEAREST,
                MinFilter::Linear => glow::LINEAR,
                MinFilter::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
                MinFilter::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
                MinFilter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
                MinFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
            };
        }

        let mut mag_filters = [0; MagFilter::ALL.len()];
        for filter in MagFilter::ALL {
            mag_filters[filter.ordinal()] = match filter {
                MagFilter::Nearest => glow::NEAREST,
                MagFilter::Linear => glow::LINEAR,
            };
        }

        let attributes = Attribute::ALL
            .into_iter()
            .map(|attribute| (attribute.glsl_name(), attribute))
            .collect();

        Self {
            primitives,
            usages,
            formats,
            min_filters,
            mag_filters,
            attributes,
        }
    }
}

/// Translates a primitive topology into the GL draw mode.
pub fn translate_primitive(primitive: Primitive) -> u32 {
    ConversionTable::global().primitives[primitive.ordinal()]
}

/// Translates a usage hint into the GL buffer usage.
pub fn translate_usage(usage: BufferUsage) -> u32 {
    ConversionTable::global().usages[usage.ordinal()]
}

/// Translates a texture format into the GL internal format.
pub fn translate_format(format: TextureFormat) -> u32 {
    ConversionTable::global().formats[format.ordinal()]
}

/// Translates a minification filter.
pub fn translate_min_filter(filter: MinFilter) -> u32 {
    ConversionTable::global().min_filters[filter.ordinal()]
}

/// Translates a magnification filter.
pub fn translate_mag_filter(filter: MagFilter) -> u32 {
    ConversionTable::global().mag_filters[filter.ordinal()]
}

/// Translates a buffer target into the GL binding point.
pub fn translate_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

/// The pixel format of host data uploaded into a texture of `format`.
pub fn default_input_format(format: TextureFormat) -> u32 {
    if format.is_depth_format() {
        glow::DEPTH_COMPONENT
    } else {
        glow::RGBA
    }
}

/// The component type of host data uploaded into a texture of `format`.
pub fn default_input_type(format: TextureFormat) -> u32 {
    if format.is_depth_format() {
        glow::UNSIGNED_INT
    } else {
        glow::UNSIGNED_BYTE
    }
}

/// Looks up an attribute by its shader variable name.
pub fn attribute_from_name(name: &str) -> Option<Attribute> {
    ConversionTable::global().attributes.get(name).copied()
}

/// Maps a `glCheckFramebufferStatus` result to a [`FramebufferStatus`].
pub fn framebuffer_status_from_native(code: u32) -> FramebufferStatus {
    match code {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        other => FramebufferStatus::Unknown(other),
    }
}

/// A local extension trait to convert engine types into GL constants.
/// This keeps an idiomatic `.into_gl()` syntax at the call sites.
pub trait IntoGl {
    /// Converts self into the matching GL constant.
    fn into_gl(self) -> u32;
}

impl IntoGl for Primitive {
    fn into_gl(self) -> u32 {
        translate_primitive(self)
    }
}

impl IntoGl for BufferUsage {
    fn into_gl(self) -> u32 {
        translate_usage(self)
    }
}

impl IntoGl for BufferTarget {
    fn into_gl(self) -> u32 {
        translate_target(self)
    }
}

impl IntoGl for TextureFormat {
    fn into_gl(self) -> u32 {
        translate_format(self)
    }
}

impl IntoGl for MinFilter {
    fn into_gl(self) -> u32 {
        translate_min_filter(self)
    }
}

impl IntoGl for MagFilter {
    fn into_gl(self) -> u32 {
        translate_mag_filter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_list_and_strip_are_distinct() {
        assert_ne!(
            translate_primitive(Primitive::TriangleList),
            translate_primitive(Primitive::TriangleStrip)
        );
    }

    #[test]
    fn only_points_translate_to_zero() {
        assert_eq!(translate_primitive(Primitive::PointList), 0);
        for primitive in Primitive::ALL.into_iter().skip(1) {
            assert_ne!(translate_primitive(primitive), 0, "{primitive:?}");
        }
        for usage in BufferUsage::ALL {
            assert_ne!(translate_usage(usage), 0);
        }
        for format in TextureFormat::ALL {
            assert_ne!(translate_format(format), 0);
        }
        for filter in MinFilter::ALL {
            assert_ne!(translate_min_filter(filter), 0);
        }
    }

    #[test]
    fn aliases_translate_to_sized_formats() {
        assert_eq!(translate_format(TextureFormat::Rgba), glow::RGBA8);
        assert_eq!(
            translate_format(TextureFormat::Rgba),
            translate_format(TextureFormat::Rgba8)
        );
        assert_eq!(translate_format(TextureFormat::Depth), glow::DEPTH_COMPONENT24);
        assert_eq!(
            translate_format(TextureFormat::Depth),
            translate_format(TextureFormat::Depth24)
        );
    }

    #[test]
    fn line_strip_is_not_lines() {
        assert_eq!(translate_primitive(Primitive::LineStrip), glow::LINE_STRIP);
        assert_ne!(
            translate_primitive(Primitive::LineStrip),
            translate_primitive(Primitive::LineList)
        );
    }

    #[test]
    fn depth_formats_use_depth_input() {
        assert_eq!(default_input_format(TextureFormat::Depth24), glow::DEPTH_COMPONENT);
        assert_eq!(default_input_type(TextureFormat::Depth32), glow::UNSIGNED_INT);
        assert_eq!(default_input_format(TextureFormat::Rgba16F), glow::RGBA);
        assert_eq!(default_input_type(TextureFormat::Rgba8), glow::UNSIGNED_BYTE);
    }

    #[test]
    fn attribute_names_resolve_both_ways() {
        for attribute in Attribute::ALL {
            assert_eq!(attribute_from_name(attribute.glsl_name()), Some(attribute));
        }
        assert_eq!(attribute_from_name("aBitangent"), None);
    }

    #[test]
    fn unknown_status_codes_are_kept() {
        assert_eq!(
            framebuffer_status_from_native(glow::FRAMEBUFFER_COMPLETE),
            FramebufferStatus::Complete
        );
        assert_eq!(
            framebuffer_status_from_native(0x1234),
            FramebufferStatus::Unknown(0x1234)
        );
    }

    #[test]
    fn table_is_built_once() {
        assert!(std::ptr::eq(ConversionTable::global(), ConversionTable::global()));
    }
}
