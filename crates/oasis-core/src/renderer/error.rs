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

//! Defines the error type shared by resource wrappers and devices.

use std::fmt;

/// An error related to the creation or use of a GPU resource (buffers, textures, etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A read or write range exceeds the addressable window of a resource.
    OutOfBounds {
        /// First element (or byte) of the requested range.
        start: usize,
        /// Number of elements (or bytes) requested.
        count: usize,
        /// Size of the addressable window.
        len: usize,
    },
    /// The resource was already released and can no longer be used.
    Released,
    /// The handle does not refer to a live object of the expected kind.
    InvalidHandle,
    /// A descriptor was rejected before any native call was made.
    InvalidDescriptor(String),
    /// The vertex type's size does not match the stride of its vertex format.
    VertexLayoutMismatch {
        /// Stride of the vertex format, in bytes.
        expected: usize,
        /// Size of the vertex type, in bytes.
        actual: usize,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl ResourceError {
    /// Checks that `start..start + count` fits in a window of `len`, guarding overflow.
    pub fn check_range(start: usize, count: usize, len: usize) -> Result<(), ResourceError> {
        match start.checked_add(count) {
            Some(end) if end <= len => Ok(()),
            _ => Err(ResourceError::OutOfBounds { start, count, len }),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::OutOfBounds { start, count, len } => write!(
                f,
                "Resource access out of bounds: {start}+{count} exceeds length {len}."
            ),
            ResourceError::Released => write!(f, "Resource was already released."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource descriptor: {msg}")
            }
            ResourceError::VertexLayoutMismatch { expected, actual } => write!(
                f,
                "Vertex type is {actual} bytes but the vertex format stride is {expected} bytes."
            ),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_display() {
        let err = ResourceError::OutOfBounds {
            start: 8,
            count: 5,
            len: 10,
        };
        assert_eq!(
            format!("{err}"),
            "Resource access out of bounds: 8+5 exceeds length 10."
        );
    }

    #[test]
    fn check_range_accepts_exact_fit() {
        assert!(ResourceError::check_range(0, 10, 10).is_ok());
        assert!(ResourceError::check_range(10, 0, 10).is_ok());
        assert!(ResourceError::check_range(8, 5, 10).is_err());
    }

    #[test]
    fn check_range_guards_overflow() {
        assert_eq!(
            ResourceError::check_range(usize::MAX, 2, 10),
            Err(ResourceError::OutOfBounds {
                start: usize::MAX,
                count: 2,
                len: 10
            })
        );
    }

    #[test]
    fn backend_error_display() {
        let err = ResourceError::BackendError("glGenBuffers failed".to_string());
        assert_eq!(
            format!("{err}"),
            "Backend-specific resource error: glGenBuffers failed"
        );
    }
}
