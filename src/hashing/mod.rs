use blake3::Hasher;

use crate::model::{CandidateProduct, IngredientSpec};

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Probability
///
/// With 64 bits the birthday bound sits around 4.3 billion items. The cache holds at
/// most one entry per distinct (spec, candidate) pair seen within a TTL window, so
/// collisions are negligible in practice. A collision would surface as a stale
/// verdict for the colliding pair until its entry expires.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    truncate_to_u64(blake3::hash(data).as_bytes())
}

#[inline]
fn truncate_to_u64(bytes: &[u8; 32]) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(head)
}

/// Content-addressed cache key for a (spec, candidate) pair.
///
/// Both values are serialized with serde_json, whose struct output follows field
/// declaration order, so the byte stream is canonical. Each segment is
/// length-prefixed so field contents cannot bleed across the pair boundary.
pub fn validation_key(spec: &IngredientSpec, candidate: &CandidateProduct) -> u64 {
    let spec_bytes = serde_json::to_vec(spec).unwrap_or_default();
    let candidate_bytes = serde_json::to_vec(candidate).unwrap_or_default();

    let mut hasher = Hasher::new();
    hasher.update(&(spec_bytes.len() as u64).to_le_bytes());
    hasher.update(&spec_bytes);
    hasher.update(&(candidate_bytes.len() as u64).to_le_bytes());
    hasher.update(&candidate_bytes);

    truncate_to_u64(hasher.finalize().as_bytes())
}
