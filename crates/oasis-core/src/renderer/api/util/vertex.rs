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

//! Vertex attributes and interleaved vertex layouts.

/// A named per-vertex attribute with a fixed number of `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Object-space position (xyz).
    Position,
    /// Surface normal (xyz).
    Normal,
    /// Vertex color (rgba).
    Color,
    /// Texture coordinate (uv).
    TexCoord,
    /// Tangent vector (xyz).
    Tangent,
}

impl Attribute {
    /// Every attribute, in ordinal order.
    pub const ALL: [Attribute; 5] = [
        Attribute::Position,
        Attribute::Normal,
        Attribute::Color,
        Attribute::TexCoord,
        Attribute::Tangent,
    ];

    /// The index of this value in [`Attribute::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// The name of the attribute variable in shader source.
    pub const fn glsl_name(self) -> &'static str {
        match self {
            Attribute::Position => "aPosition",
            Attribute::Normal => "aNormal",
            Attribute::Color => "aColor",
            Attribute::TexCoord => "aTexCoord",
            Attribute::Tangent => "aTangent",
        }
    }

    /// The number of `f32` components.
    pub const fn component_count(self) -> usize {
        match self {
            Attribute::Position | Attribute::Normal | Attribute::Tangent => 3,
            Attribute::Color => 4,
            Attribute::TexCoord => 2,
        }
    }
}

/// An interleaved vertex layout: the attributes of one vertex, in memory order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexFormat {
    attributes: Vec<Attribute>,
}

impl VertexFormat {
    /// Creates a layout from attributes in memory order. Duplicates are ignored.
    pub fn new(attributes: &[Attribute]) -> Self {
        let mut unique = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if !unique.contains(attribute) {
                unique.push(*attribute);
            }
        }
        Self { attributes: unique }
    }

    /// The attributes, in memory order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns `true` if the layout contains `attribute`.
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// The number of `f32` components in one vertex.
    pub fn component_count(&self) -> usize {
        self.attributes.iter().map(|a| a.component_count()).sum()
    }

    /// The size of one vertex in bytes.
    pub fn stride(&self) -> usize {
        self.component_count() * std::mem::size_of::<f32>()
    }

    /// The byte offset of `attribute` within a vertex, if present.
    pub fn offset_of(&self, attribute: Attribute) -> Option<usize> {
        let mut components = 0;
        for a in &self.attributes {
            if *a == attribute {
                return Some(components * std::mem::size_of::<f32>());
            }
            components += a.component_count();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_and_offsets() {
        let format = VertexFormat::new(&[Attribute::Position, Attribute::Normal, Attribute::Color]);
        assert_eq!(format.component_count(), 10);
        assert_eq!(format.stride(), 40);
        assert_eq!(format.offset_of(Attribute::Position), Some(0));
        assert_eq!(format.offset_of(Attribute::Normal), Some(12));
        assert_eq!(format.offset_of(Attribute::Color), Some(24));
        assert_eq!(format.offset_of(Attribute::TexCoord), None);
    }

    #[test]
    fn duplicates_are_dropped() {
        let format = VertexFormat::new(&[Attribute::Position, Attribute::Position]);
        assert_eq!(format.attributes(), &[Attribute::Position]);
    }

    #[test]
    fn glsl_names_are_unique() {
        let mut names: Vec<_> = Attribute::ALL.iter().map(|a| a.glsl_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Attribute::ALL.len());
    }
}
