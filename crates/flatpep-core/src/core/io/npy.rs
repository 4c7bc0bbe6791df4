//! Codec for NPY array members as stored inside a structure container.
//!
//! Only the array flavors the container actually uses are supported: little
//! endian `f32` and `i32` numerics plus fixed-width byte strings (`|S{n}`).
//! Unicode string arrays (`<U{n}`) are accepted on read so that externally
//! produced sequence lists can be consumed, but are never written.

use nalgebra::Point3;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Leading magic bytes of every NPY stream.
pub(crate) const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Format version emitted on write.
const VERSION: [u8; 2] = [1, 0];

/// Headers are padded so the payload starts on this alignment.
const HEADER_ALIGN: usize = 64;

#[derive(Debug, Error)]
pub enum NpyError {
    #[error("not an NPY stream: bad magic bytes")]
    BadMagic,
    #[error("unsupported NPY format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
    #[error("malformed NPY header: {0}")]
    Header(String),
    #[error("unsupported dtype '{descr}'")]
    UnsupportedDtype { descr: String },
    #[error("Fortran-ordered arrays are not supported")]
    FortranOrder,
    #[error("expected {expected} data, found {found} data")]
    DtypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected a {expected} array, found shape {found:?}")]
    Shape {
        expected: &'static str,
        found: Vec<usize>,
    },
    #[error("expected {expected} payload bytes for shape {shape:?}, found {actual}")]
    PayloadSize {
        expected: usize,
        actual: usize,
        shape: Vec<usize>,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Element type of an NPY array, restricted to the dtypes this crate handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DType {
    /// `<f4`, little endian single-precision float.
    F32,
    /// `<i4`, little endian 32-bit signed integer.
    I32,
    /// `|S{n}`, fixed-width byte string of `n` bytes, NUL padded.
    Bytes(usize),
    /// `<U{n}`, fixed-width UCS-4 string of `n` code points. Read only.
    Ucs4(usize),
}

impl DType {
    fn parse(descr: &str) -> Option<Self> {
        match descr {
            "<f4" => Some(DType::F32),
            "<i4" => Some(DType::I32),
            _ => {
                if let Some(width) = descr.strip_prefix("|S").and_then(|w| w.parse().ok()) {
                    (width > 0).then_some(DType::Bytes(width))
                } else if let Some(width) = descr.strip_prefix("<U").and_then(|w| w.parse().ok()) {
                    (width > 0).then_some(DType::Ucs4(width))
                } else {
                    None
                }
            }
        }
    }

    fn item_size(&self) -> usize {
        match self {
            DType::F32 | DType::I32 => 4,
            DType::Bytes(width) => *width,
            DType::Ucs4(width) => 4 * width,
        }
    }
}

/// Parsed NPY header: dtype plus C-ordered shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyHeader {
    pub dtype: DType,
    pub shape: Vec<usize>,
}

/// A fully decoded NPY array.
///
/// String arrays are flattened to one dimension and hold owned values with
/// trailing NUL padding stripped, regardless of whether the source was a byte
/// (`|S`) or Unicode (`<U`) array.
#[derive(Debug, Clone, PartialEq)]
pub enum NpyArray {
    F32 { shape: Vec<usize>, values: Vec<f32> },
    I32 { shape: Vec<usize>, values: Vec<i32> },
    Str { width: usize, values: Vec<String> },
}

impl NpyArray {
    pub fn dtype_name(&self) -> &'static str {
        match self {
            NpyArray::F32 { .. } => "f32",
            NpyArray::I32 { .. } => "i32",
            NpyArray::Str { .. } => "string",
        }
    }

    /// Interprets the array as an `(N, 3)` coordinate block.
    pub fn into_points(self) -> Result<Vec<Point3<f32>>, NpyError> {
        match self {
            NpyArray::F32 { shape, values } => {
                if shape.len() == 2 && shape[1] == 3 {
                    Ok(values
                        .chunks_exact(3)
                        .map(|row| Point3::new(row[0], row[1], row[2]))
                        .collect())
                } else {
                    Err(NpyError::Shape {
                        expected: "(N, 3)",
                        found: shape,
                    })
                }
            }
            other => Err(NpyError::DtypeMismatch {
                expected: "f32",
                found: other.dtype_name(),
            }),
        }
    }

    /// Interprets the array as a flat block of 32-bit integers.
    pub fn into_i32s(self) -> Result<Vec<i32>, NpyError> {
        match self {
            NpyArray::I32 { shape, values } => {
                if shape.len() == 1 {
                    Ok(values)
                } else {
                    Err(NpyError::Shape {
                        expected: "(N,)",
                        found: shape,
                    })
                }
            }
            other => Err(NpyError::DtypeMismatch {
                expected: "i32",
                found: other.dtype_name(),
            }),
        }
    }

    /// Interprets the array as a flat block of strings.
    pub fn into_strings(self) -> Result<Vec<String>, NpyError> {
        match self {
            NpyArray::Str { values, .. } => Ok(values),
            other => Err(NpyError::DtypeMismatch {
                expected: "string",
                found: other.dtype_name(),
            }),
        }
    }
}

/// Writes an `(N, 3)` `<f4` array from a list of points.
pub fn write_points<W: Write>(writer: &mut W, points: &[Point3<f32>]) -> Result<(), NpyError> {
    write_header(writer, "<f4", &[points.len(), 3])?;
    for point in points {
        for component in [point.x, point.y, point.z] {
            writer.write_all(&component.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Writes a flat `<i4` array.
pub fn write_i32s<W: Write>(writer: &mut W, values: &[i32]) -> Result<(), NpyError> {
    write_header(writer, "<i4", &[values.len()])?;
    for value in values {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Writes a flat `|S{width}` array.
///
/// Values longer than `width` bytes are truncated, shorter ones NUL padded.
/// A width of zero is clamped to one byte so the dtype stays representable.
pub fn write_strings<W, S>(writer: &mut W, values: &[S], width: usize) -> Result<(), NpyError>
where
    W: Write,
    S: AsRef<str>,
{
    let width = width.max(1);
    write_header(writer, &format!("|S{width}"), &[values.len()])?;
    let mut cell = vec![0u8; width];
    for value in values {
        let bytes = value.as_ref().as_bytes();
        let n = bytes.len().min(width);
        cell[..n].copy_from_slice(&bytes[..n]);
        cell[n..].fill(0);
        writer.write_all(&cell)?;
    }
    Ok(())
}

/// Reads and validates the magic, version and header dictionary of a stream.
pub fn read_header<R: Read>(reader: &mut R) -> Result<NpyHeader, NpyError> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(NpyError::BadMagic);
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version {
        [1, 0] => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len)?;
            u16::from_le_bytes(len) as usize
        }
        [2, 0] | [3, 0] => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len)?;
            u32::from_le_bytes(len) as usize
        }
        [major, minor] => return Err(NpyError::UnsupportedVersion { major, minor }),
    };

    let mut text = vec![0u8; header_len];
    reader.read_exact(&mut text)?;
    let text = std::str::from_utf8(&text)
        .map_err(|_| NpyError::Header("header is not valid UTF-8".to_string()))?;

    let descr = string_value(text, "descr")?;
    let dtype = DType::parse(&descr).ok_or(NpyError::UnsupportedDtype { descr })?;
    if bool_value(text, "fortran_order")? {
        return Err(NpyError::FortranOrder);
    }
    let shape = shape_value(text)?;

    Ok(NpyHeader { dtype, shape })
}

/// Reads a complete NPY stream into a decoded array.
///
/// The reader is consumed to its end; the payload must hold exactly the
/// number of bytes the header promises.
pub fn read_array<R: Read>(reader: &mut R) -> Result<NpyArray, NpyError> {
    let header = read_header(reader)?;

    let count = header
        .shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| NpyError::Header("shape is too large".to_string()))?;
    let expected = count
        .checked_mul(header.dtype.item_size())
        .ok_or_else(|| NpyError::Header("shape is too large".to_string()))?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;
    if payload.len() != expected {
        return Err(NpyError::PayloadSize {
            expected,
            actual: payload.len(),
            shape: header.shape,
        });
    }

    match header.dtype {
        DType::F32 => {
            let mut values = Vec::with_capacity(count);
            for chunk in payload.chunks_exact(4) {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(chunk);
                values.push(f32::from_le_bytes(raw));
            }
            Ok(NpyArray::F32 {
                shape: header.shape,
                values,
            })
        }
        DType::I32 => {
            let mut values = Vec::with_capacity(count);
            for chunk in payload.chunks_exact(4) {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(chunk);
                values.push(i32::from_le_bytes(raw));
            }
            Ok(NpyArray::I32 {
                shape: header.shape,
                values,
            })
        }
        DType::Bytes(width) => {
            if header.shape.len() != 1 {
                return Err(NpyError::Shape {
                    expected: "(N,)",
                    found: header.shape,
                });
            }
            let mut values = Vec::with_capacity(count);
            for chunk in payload.chunks_exact(width) {
                let end = chunk.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                values.push(String::from_utf8_lossy(&chunk[..end]).into_owned());
            }
            Ok(NpyArray::Str { width, values })
        }
        DType::Ucs4(width) => {
            if header.shape.len() != 1 {
                return Err(NpyError::Shape {
                    expected: "(N,)",
                    found: header.shape,
                });
            }
            let mut values = Vec::with_capacity(count);
            for chunk in payload.chunks_exact(4 * width) {
                let mut value = String::with_capacity(width);
                for code in chunk.chunks_exact(4) {
                    let mut raw = [0u8; 4];
                    raw.copy_from_slice(code);
                    let code_point = u32::from_le_bytes(raw);
                    value.push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                values.push(value.trim_end_matches('\0').to_string());
            }
            Ok(NpyArray::Str { width, values })
        }
    }
}

fn write_header<W: Write>(writer: &mut W, descr: &str, shape: &[usize]) -> Result<(), NpyError> {
    // One-element tuples need the trailing comma to parse back as a tuple.
    let shape_text = match shape {
        [n] => format!("({n},)"),
        _ => {
            let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
            format!("({})", dims.join(", "))
        }
    };
    let mut dict =
        format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape_text}, }}")
            .into_bytes();

    let unpadded = MAGIC.len() + VERSION.len() + 2 + dict.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    dict.resize(dict.len() + padding, b' ');
    dict.push(b'\n');

    let len = u16::try_from(dict.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "NPY header too long"))?;
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION)?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&dict)?;
    Ok(())
}

fn dict_value<'a>(text: &'a str, key: &str) -> Result<&'a str, NpyError> {
    for quote in ['\'', '"'] {
        let needle = format!("{quote}{key}{quote}");
        if let Some(start) = text.find(&needle) {
            let rest = text[start + needle.len()..].trim_start();
            let rest = rest
                .strip_prefix(':')
                .ok_or_else(|| NpyError::Header(format!("expected ':' after '{key}'")))?;
            return Ok(rest.trim_start());
        }
    }
    Err(NpyError::Header(format!("missing '{key}' entry")))
}

fn string_value(text: &str, key: &str) -> Result<String, NpyError> {
    let rest = dict_value(text, key)?;
    let quote = rest
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| NpyError::Header(format!("'{key}' is not a quoted string")))?;
    let body = &rest[1..];
    let end = body
        .find(quote)
        .ok_or_else(|| NpyError::Header(format!("unterminated string for '{key}'")))?;
    Ok(body[..end].to_string())
}

fn bool_value(text: &str, key: &str) -> Result<bool, NpyError> {
    let rest = dict_value(text, key)?;
    if rest.starts_with("True") {
        Ok(true)
    } else if rest.starts_with("False") {
        Ok(false)
    } else {
        Err(NpyError::Header(format!("'{key}' is not a boolean")))
    }
}

fn shape_value(text: &str) -> Result<Vec<usize>, NpyError> {
    let rest = dict_value(text, "shape")?;
    let rest = rest
        .strip_prefix('(')
        .ok_or_else(|| NpyError::Header("'shape' is not a tuple".to_string()))?;
    let end = rest
        .find(')')
        .ok_or_else(|| NpyError::Header("unterminated 'shape' tuple".to_string()))?;

    let mut shape = Vec::new();
    for part in rest[..end].split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let dim = part
            .parse()
            .map_err(|_| NpyError::Header(format!("invalid dimension '{part}' in 'shape'")))?;
        shape.push(dim);
    }
    Ok(shape)
}
