//! Converts alloy-core `DynSolValue` → Logcast `FieldValue`.

use alloy_core::dyn_abi::DynSolValue;
use logcast_core::FieldValue;

/// Convert a decoded `DynSolValue` into a `FieldValue`.
pub fn normalize(val: DynSolValue) -> FieldValue {
    match val {
        DynSolValue::Bool(b) => FieldValue::Bool(b),

        DynSolValue::Int(i, bits) => {
            // For ints that fit in i128 return Int, else BigInt string
            if bits <= 128 {
                match i128::try_from(i) {
                    Ok(v) => FieldValue::Int(v),
                    Err(_) => FieldValue::BigInt(i.to_string()),
                }
            } else {
                FieldValue::BigInt(i.to_string())
            }
        }

        DynSolValue::Uint(u, bits) => {
            if bits <= 128 {
                match u128::try_from(u) {
                    Ok(v) => FieldValue::Uint(v),
                    Err(_) => FieldValue::BigUint(u.to_string()),
                }
            } else {
                FieldValue::BigUint(u.to_string())
            }
        }

        DynSolValue::FixedBytes(word, size) => {
            FieldValue::Bytes(word[..size.min(32)].to_vec())
        }

        DynSolValue::Bytes(b) => FieldValue::Bytes(b),

        DynSolValue::String(s) => FieldValue::Str(s),

        DynSolValue::Address(a) => FieldValue::Address(format!("{a:#x}")),

        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => {
            FieldValue::Array(vals.into_iter().map(normalize).collect())
        }

        DynSolValue::Tuple(fields) => {
            // Unnamed tuple fields get positional names "0", "1", ...
            let named: Vec<(String, FieldValue)> = fields
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), normalize(v)))
                .collect();
            FieldValue::Tuple(named)
        }

        // Function selector values — fall back to bytes
        DynSolValue::Function(f) => FieldValue::Bytes(f.to_vec()),
    }
}
