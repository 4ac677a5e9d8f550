//! Serde support for fixed-size byte types.
//!
//! `Hash`, `Address` and `Signature` serialize as `0x`-prefixed hex
//! strings in every format, so JSON dumps and CBOR frames carry the same
//! textual representation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{hex_decode, hex_encode, Address, Hash, Signature};

fn decode_fixed<const N: usize, E: serde::de::Error>(s: &str) -> Result<[u8; N], E> {
    let bytes = hex_decode(s).map_err(E::custom)?;
    <[u8; N]>::try_from(bytes.as_slice())
        .map_err(|_| E::custom(format!("expected {} bytes, got {}", N, bytes.len())))
}

macro_rules! hex_serde {
    ($ty:ident, $len:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&format!("0x{}", hex_encode(&self.0)))
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                decode_fixed::<$len, D::Error>(&s).map($ty)
            }
        }
    };
}

hex_serde!(Hash, 32);
hex_serde!(Address, 20);
hex_serde!(Signature, 64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_with_domain;

    #[test]
    fn test_hash_json_roundtrip() {
        let hash = hash_with_domain(0x10, b"channel");
        let json = serde_json::to_string(&hash).unwrap();
        assert!(json.starts_with("\"0x"));
        let decoded: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, hash);
    }

    #[test]
    fn test_address_json() {
        let address = Address([0xab; 20]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let result: Result<Address, _> = serde_json::from_str("\"0xabcd\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_signature_json_roundtrip() {
        let sig = Signature([0x5a; 64]);
        let json = serde_json::to_string(&sig).unwrap();
        let decoded: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, sig);
    }
}
