/* src/core/src/hash.rs */

const FNV_OFFSET: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

/// Standard FNV-1a 64-bit hash.
pub fn fnv1a_64(input: &str) -> u64 {
  let mut hash = FNV_OFFSET;
  for byte in input.bytes() {
    hash ^= u64::from(byte);
    hash = hash.wrapping_mul(FNV_PRIME);
  }
  hash
}

/// Serialized payload -> 16 hex chars. Used to key shared data blobs and
/// cache-bust local payload files.
pub fn content_hash(data: &str) -> String {
  format!("{:016x}", fnv1a_64(data))
}
