//! Scalar value coercion.
//!
//! Two entry points: [`parse`] turns raw request text into a typed scalar
//! (overflow and format failures carry the offending text, the target type
//! name, and for overflow the valid range); [`from_json`] converts an
//! already-typed JSON value, shared by the merge engine and the structured
//! codec.

use std::num::IntErrorKind;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::GraphError;
use crate::node::Scalar;
use crate::types::{ScalarType, Type};

/// Parse raw text into a typed scalar.
pub fn parse(ty: ScalarType, text: &str) -> Result<Scalar, GraphError> {
    match ty {
        ScalarType::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Scalar::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Scalar::Bool(false))
            } else {
                Err(format_err(text, ty))
            }
        }
        ScalarType::I8 => int::<i8>(text, ty, i8::MIN as i128, i8::MAX as i128).map(Scalar::I8),
        ScalarType::I16 => {
            int::<i16>(text, ty, i16::MIN as i128, i16::MAX as i128).map(Scalar::I16)
        }
        ScalarType::I32 => {
            int::<i32>(text, ty, i32::MIN as i128, i32::MAX as i128).map(Scalar::I32)
        }
        ScalarType::I64 => {
            int::<i64>(text, ty, i64::MIN as i128, i64::MAX as i128).map(Scalar::I64)
        }
        ScalarType::U8 => int::<u8>(text, ty, 0, u8::MAX as i128).map(Scalar::U8),
        ScalarType::U16 => int::<u16>(text, ty, 0, u16::MAX as i128).map(Scalar::U16),
        ScalarType::U32 => int::<u32>(text, ty, 0, u32::MAX as i128).map(Scalar::U32),
        ScalarType::U64 => int::<u64>(text, ty, 0, u64::MAX as i128).map(Scalar::U64),
        ScalarType::F32 => text
            .parse::<f32>()
            .map(Scalar::F32)
            .map_err(|_| format_err(text, ty)),
        ScalarType::F64 => text
            .parse::<f64>()
            .map(Scalar::F64)
            .map_err(|_| format_err(text, ty)),
        ScalarType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Scalar::Char(c)),
                _ => Err(format_err(text, ty)),
            }
        }
        ScalarType::Decimal => decimal(text),
        ScalarType::String => Ok(Scalar::String(text.to_string())),
    }
}

/// Parse raw text against a declared type; non-scalar targets cannot be
/// coerced from text.
pub fn parse_as(ty: &Type, text: &str) -> Result<Scalar, GraphError> {
    match ty {
        Type::Scalar(s) => parse(*s, text),
        other => Err(GraphError::Unsupported(format!(
            "cannot parse {} from text",
            other.name()
        ))),
    }
}

/// Convert a typed JSON value into a scalar of the declared type.
pub fn from_json(ty: ScalarType, value: &Value) -> Result<Scalar, GraphError> {
    match ty {
        ScalarType::Bool => value
            .as_bool()
            .map(Scalar::Bool)
            .ok_or_else(|| json_format_err(value, ty)),
        ScalarType::I8 => {
            json_signed(value, ty, i8::MIN as i128, i8::MAX as i128).map(|v| Scalar::I8(v as i8))
        }
        ScalarType::I16 => json_signed(value, ty, i16::MIN as i128, i16::MAX as i128)
            .map(|v| Scalar::I16(v as i16)),
        ScalarType::I32 => json_signed(value, ty, i32::MIN as i128, i32::MAX as i128)
            .map(|v| Scalar::I32(v as i32)),
        ScalarType::I64 => {
            json_signed(value, ty, i64::MIN as i128, i64::MAX as i128).map(Scalar::I64)
        }
        ScalarType::U8 => json_unsigned(value, ty, u8::MAX as i128).map(|v| Scalar::U8(v as u8)),
        ScalarType::U16 => {
            json_unsigned(value, ty, u16::MAX as i128).map(|v| Scalar::U16(v as u16))
        }
        ScalarType::U32 => {
            json_unsigned(value, ty, u32::MAX as i128).map(|v| Scalar::U32(v as u32))
        }
        ScalarType::U64 => json_unsigned(value, ty, u64::MAX as i128).map(Scalar::U64),
        ScalarType::F32 => value
            .as_f64()
            .map(|v| Scalar::F32(v as f32))
            .ok_or_else(|| json_format_err(value, ty)),
        ScalarType::F64 => value
            .as_f64()
            .map(Scalar::F64)
            .ok_or_else(|| json_format_err(value, ty)),
        ScalarType::Char => match value.as_str() {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Scalar::Char(c)),
                    _ => Err(json_format_err(value, ty)),
                }
            }
            None => Err(json_format_err(value, ty)),
        },
        ScalarType::Decimal => match value {
            Value::Number(n) => Ok(Scalar::Decimal(n.clone())),
            _ => Err(json_format_err(value, ty)),
        },
        ScalarType::String => value
            .as_str()
            .map(|s| Scalar::String(s.to_string()))
            .ok_or_else(|| json_format_err(value, ty)),
    }
}

fn int<T>(text: &str, ty: ScalarType, min: i128, max: i128) -> Result<T, GraphError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    text.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow_err(text, ty, min, max),
        // a negative literal aimed at an unsigned type is out of range,
        // not malformed
        _ if min == 0 && is_negative_literal(text) => overflow_err(text, ty, min, max),
        _ => format_err(text, ty),
    })
}

fn is_negative_literal(text: &str) -> bool {
    let rest = match text.strip_prefix('-') {
        Some(rest) => rest,
        None => return false,
    };
    !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
}

fn decimal(text: &str) -> Result<Scalar, GraphError> {
    let ty = ScalarType::Decimal;
    // decimals are plain base-10: no exponent forms
    if text.contains(['e', 'E']) {
        return Err(format_err(text, ty));
    }
    serde_json::from_str::<Number>(text)
        .map(Scalar::Decimal)
        .map_err(|_| format_err(text, ty))
}

fn json_signed(value: &Value, ty: ScalarType, min: i128, max: i128) -> Result<i64, GraphError> {
    match value.as_i64() {
        Some(v) if (v as i128) >= min && (v as i128) <= max => Ok(v),
        Some(v) => Err(overflow_err(&v.to_string(), ty, min, max)),
        None if value.as_u64().is_some() => Err(overflow_err(&value.to_string(), ty, min, max)),
        None => Err(json_format_err(value, ty)),
    }
}

fn json_unsigned(value: &Value, ty: ScalarType, max: i128) -> Result<u64, GraphError> {
    match value.as_u64() {
        Some(v) if (v as i128) <= max => Ok(v),
        Some(v) => Err(overflow_err(&v.to_string(), ty, 0, max)),
        None if value.as_i64().is_some() => Err(overflow_err(&value.to_string(), ty, 0, max)),
        None => Err(json_format_err(value, ty)),
    }
}

fn format_err(text: &str, ty: ScalarType) -> GraphError {
    GraphError::Format {
        text: text.to_string(),
        ty: ty.name(),
    }
}

fn json_format_err(value: &Value, ty: ScalarType) -> GraphError {
    GraphError::Format {
        text: value.to_string(),
        ty: ty.name(),
    }
}

fn overflow_err(text: &str, ty: ScalarType, min: i128, max: i128) -> GraphError {
    GraphError::Overflow {
        text: text.to_string(),
        ty: ty.name(),
        min,
        max,
    }
}
