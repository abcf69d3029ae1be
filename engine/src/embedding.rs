use std::fmt;

use serde::{Deserialize, Serialize};
use xtts_audio::AudioError;
use xtts_audio::pcm::{decode_base64, encode_base64};

use crate::EngineError;

/// Ordered dimension sizes of an embedding array.
///
/// Serializes as a plain JSON array, e.g. `[1, 512]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingShape(Vec<usize>);

impl EmbeddingShape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    /// A 1-D shape of length `len`.
    pub fn vector(len: usize) -> Self {
        Self(vec![len])
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Number of elements an array of this shape holds.
    pub fn element_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Returns the shape the engine expects for conditioning.
    ///
    /// A 1-D shape `[n]` becomes the row matrix `[1, n]`. Every other shape
    /// is returned unchanged.
    pub fn to_row_matrix(&self) -> Self {
        match self.0.as_slice() {
            [n] => Self(vec![1, *n]),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for EmbeddingShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Speaker embedding: f32 values in row-major order plus their shape.
///
/// Embeddings are opaque to the service. The only guarantee is that the
/// values survive base64 transport bit for bit.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
    shape: EmbeddingShape,
}

impl Embedding {
    /// Creates an embedding, checking that `shape` covers exactly `values`.
    pub fn new(values: Vec<f32>, shape: EmbeddingShape) -> Result<Self, EngineError> {
        if shape.element_count() != values.len() {
            return Err(EngineError::ShapeMismatch {
                shape: shape.0,
                len: values.len(),
            });
        }
        Ok(Self { values, shape })
    }

    /// Creates a 1-D embedding.
    pub fn from_vector(values: Vec<f32>) -> Self {
        let shape = EmbeddingShape::vector(values.len());
        Self { values, shape }
    }

    /// Decodes base64 raw float32 bytes as a 1-D embedding.
    pub fn from_base64(encoded: &str) -> Result<Self, AudioError> {
        Ok(Self::from_vector(decode_base64(encoded)?))
    }

    /// Encodes the values as base64 raw float32 bytes. The shape is not
    /// part of the encoding.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.values)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn shape(&self) -> &EmbeddingShape {
        &self.shape
    }

    /// Reshapes a 1-D embedding into a row matrix. See
    /// [`EmbeddingShape::to_row_matrix`].
    pub fn into_row_matrix(self) -> Self {
        let shape = self.shape.to_row_matrix();
        Self {
            values: self.values,
            shape,
        }
    }
}
