//! Graph node record for the variable-length node batch format.

use serde::{Deserialize, Serialize};

use super::document::DEFAULT_PRIORITY;
use super::enums::{NodeType, RiskLevel};

/// Owned node record. Unlike documents, the embedding length is free and the
/// metadata blob is opaque bytes (JSON when produced from a [`super::NodeInput`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    pub node_type: NodeType,
    pub priority: u8,
    pub bank_id: u8,
    pub flags: u8,
    pub confidence: f32,
    pub risk_level: RiskLevel,
    pub position: [f32; 3],
    pub embedding: Vec<f32>,
    pub metadata: Vec<u8>,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            id: 0,
            node_type: NodeType::default(),
            priority: DEFAULT_PRIORITY,
            bank_id: 0,
            flags: 0,
            confidence: 0.5,
            risk_level: RiskLevel::default(),
            position: [0.0; 3],
            embedding: Vec::new(),
            metadata: Vec::new(),
        }
    }
}

impl NodeRecord {
    #[must_use]
    pub fn new(id: u32, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Vec<u8>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }
}
