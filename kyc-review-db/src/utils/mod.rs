use heapless::String as HeaplessString;
use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// The hash is stable across runs: CBOR gives a deterministic encoding and
/// the hasher always starts from seed 0.
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Copies `value` into a fixed-capacity string, failing when it does not fit.
pub fn to_heapless<const N: usize>(field: &str, value: &str) -> Result<HeaplessString<N>, String> {
    HeaplessString::try_from(value).map_err(|_| format!("{field} exceeds {N} characters"))
}
