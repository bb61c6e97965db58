//! Stream filter chain decoding
//!
//! Decodes `/Filter` chains strictly: corrupt data or an unknown filter is an
//! error, never a partial result. `/DecodeParms` predictors are not applied;
//! only `EarlyChange` is read, since it changes how LZW data is parsed.

use std::io::Read;

use flate2::read::DeflateDecoder;
use lopdf::{Dictionary, Object, Stream};
use thiserror::Error;
use weezl::{decode::Decoder as LzwDecoder, BitOrder, LzwStatus};

use crate::graph::{kind, resolve_direct, ObjectGraph};

/// Reference hops followed when resolving filter entries
const MAX_RESOLVE_HOPS: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unsupported filter /{0}")]
    Unsupported(String),

    #[error("malformed filter declaration: {0}")]
    Malformed(String),

    #[error("/{filter} data is corrupt: {reason}")]
    Corrupt { filter: &'static str, reason: String },

    #[error("/{filter} output exceeds {limit} bytes")]
    OutputLimit { filter: &'static str, limit: usize },
}

/// Why a single decoder stopped
#[derive(Debug)]
enum Failure {
    Corrupt(String),
    TooLarge,
}

type Decoded = Result<Vec<u8>, Failure>;

/// A decoding step from a stream's filter chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Flate,
    Lzw { early_change: bool },
    Ascii85,
    AsciiHex,
    RunLength,
}

impl Filter {
    /// Look up a filter by its full or abbreviated name
    pub fn from_name(name: &[u8], params: Option<&Dictionary>) -> Result<Self, FilterError> {
        match name {
            b"FlateDecode" | b"Fl" => Ok(Filter::Flate),
            b"LZWDecode" | b"LZW" => {
                let early_change = params
                    .and_then(|p| p.get(b"EarlyChange").ok())
                    .and_then(|v| v.as_i64().ok())
                    .map_or(true, |v| v != 0);
                Ok(Filter::Lzw { early_change })
            }
            b"ASCII85Decode" | b"A85" => Ok(Filter::Ascii85),
            b"ASCIIHexDecode" | b"AHx" => Ok(Filter::AsciiHex),
            b"RunLengthDecode" | b"RL" => Ok(Filter::RunLength),
            other => Err(FilterError::Unsupported(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Flate => "FlateDecode",
            Filter::Lzw { .. } => "LZWDecode",
            Filter::Ascii85 => "ASCII85Decode",
            Filter::AsciiHex => "ASCIIHexDecode",
            Filter::RunLength => "RunLengthDecode",
        }
    }

    /// Decode `data`, producing at most `limit` bytes
    pub fn decode(&self, data: &[u8], limit: Option<usize>) -> Result<Vec<u8>, FilterError> {
        let max = limit.unwrap_or(usize::MAX);
        let result = match self {
            Filter::Flate => flate_decode(data, max),
            Filter::Lzw { early_change } => lzw_decode(data, *early_change, max),
            Filter::Ascii85 => ascii85_decode(data),
            Filter::AsciiHex => ascii_hex_decode(data),
            Filter::RunLength => run_length_decode(data, max),
        };

        match result {
            Ok(out) if out.len() > max => Err(self.too_large(max)),
            Ok(out) => Ok(out),
            Err(Failure::TooLarge) => Err(self.too_large(max)),
            Err(Failure::Corrupt(reason)) => Err(FilterError::Corrupt {
                filter: self.name(),
                reason,
            }),
        }
    }

    fn too_large(&self, limit: usize) -> FilterError {
        FilterError::OutputLimit {
            filter: self.name(),
            limit,
        }
    }
}

/// Read the declared filter chain from a stream dictionary
pub fn filter_chain<G: ObjectGraph + ?Sized>(
    graph: &G,
    dict: &Dictionary,
) -> Result<Vec<Filter>, FilterError> {
    let names = match dict.get(b"Filter").ok().map(|f| resolve(graph, f)).transpose()? {
        None | Some(Object::Null) => return Ok(Vec::new()),
        Some(Object::Name(name)) => vec![name.as_slice()],
        Some(Object::Array(items)) => items
            .iter()
            .map(|item| match resolve(graph, item)? {
                Object::Name(name) => Ok(name.as_slice()),
                other => Err(FilterError::Malformed(format!(
                    "filter array entry is {}",
                    kind(other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(FilterError::Malformed(format!(
                "/Filter is {}",
                kind(other)
            )))
        }
    };

    let params = decode_params(graph, dict, names.len())?;
    names
        .into_iter()
        .zip(params)
        .map(|(name, params)| Filter::from_name(name, params))
        .collect()
}

/// Decode a stream's payload through its whole filter chain.
///
/// `limit` bounds the output of every filter in the chain, so an oversized
/// stream fails before it is fully inflated.
pub fn decode_stream<G: ObjectGraph + ?Sized>(
    graph: &G,
    stream: &Stream,
    limit: Option<usize>,
) -> Result<Vec<u8>, FilterError> {
    let chain = filter_chain(graph, &stream.dict)?;
    let mut data = stream.content.clone();
    for filter in chain {
        data = filter.decode(&data, limit)?;
    }
    Ok(data)
}

fn resolve<'a, G: ObjectGraph + ?Sized>(
    graph: &'a G,
    object: &'a Object,
) -> Result<&'a Object, FilterError> {
    resolve_direct(graph, object, MAX_RESOLVE_HOPS)
        .ok_or_else(|| FilterError::Malformed("unresolvable filter reference".into()))
}

/// One parameter slot per filter; missing or null entries are `None`
fn decode_params<'a, G: ObjectGraph + ?Sized>(
    graph: &'a G,
    dict: &'a Dictionary,
    count: usize,
) -> Result<Vec<Option<&'a Dictionary>>, FilterError> {
    let as_params = |object: &'a Object| -> Result<Option<&'a Dictionary>, FilterError> {
        match resolve(graph, object)? {
            Object::Dictionary(params) => Ok(Some(params)),
            Object::Null => Ok(None),
            other => Err(FilterError::Malformed(format!(
                "/DecodeParms entry is {}",
                kind(other)
            ))),
        }
    };

    let mut params = match dict.get(b"DecodeParms").ok() {
        None => Vec::new(),
        Some(declared) => match resolve(graph, declared)? {
            Object::Array(items) => items
                .iter()
                .map(as_params)
                .collect::<Result<Vec<_>, _>>()?,
            single => vec![as_params(single)?],
        },
    };
    params.resize(count, None);
    Ok(params)
}

/// Zlib-wrapped deflate. The two header bytes are checked; the Adler-32
/// trailer is not, so streams with a missing or wrong checksum still decode.
fn flate_decode(data: &[u8], max: usize) -> Decoded {
    let (cmf, flg) = match data {
        [cmf, flg, ..] => (*cmf, *flg),
        _ => return Err(Failure::Corrupt("missing zlib header".into())),
    };
    if cmf & 0x0f != 8 {
        return Err(Failure::Corrupt(format!(
            "unknown compression method {}",
            cmf & 0x0f
        )));
    }
    if ((u16::from(cmf) << 8) | u16::from(flg)) % 31 != 0 {
        return Err(Failure::Corrupt("bad zlib header check bits".into()));
    }
    if flg & 0x20 != 0 {
        return Err(Failure::Corrupt("preset dictionary not supported".into()));
    }

    let mut decoder = DeflateDecoder::new(&data[2..]);
    let mut out = Vec::new();
    // One byte past the cap is enough to tell that it was exceeded
    let cap = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
    (&mut decoder)
        .take(cap)
        .read_to_end(&mut out)
        .map_err(|e| Failure::Corrupt(e.to_string()))?;
    if out.len() > max {
        return Err(Failure::TooLarge);
    }
    Ok(out)
}

fn lzw_decode(data: &[u8], early_change: bool, max: usize) -> Decoded {
    // PDF's EarlyChange=1 widens codes one entry early, as TIFF does
    let mut decoder = if early_change {
        LzwDecoder::with_tiff_size_switch(BitOrder::Msb, 8)
    } else {
        LzwDecoder::new(BitOrder::Msb, 8)
    };

    let mut out = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut input = data;
    loop {
        let result = decoder.decode_bytes(input, &mut chunk);
        input = &input[result.consumed_in..];
        out.extend_from_slice(&chunk[..result.consumed_out]);
        if out.len() > max {
            return Err(Failure::TooLarge);
        }

        match result.status {
            Ok(LzwStatus::Done) | Ok(LzwStatus::NoProgress) => break,
            Ok(_) if result.consumed_in == 0 && result.consumed_out == 0 => break,
            Ok(_) => {}
            Err(e) => return Err(Failure::Corrupt(e.to_string())),
        }
    }
    Ok(out)
}

fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\x00')
}

fn ascii85_decode(data: &[u8]) -> Decoded {
    let data = data.strip_prefix(b"<~").unwrap_or(data);
    let mut out = Vec::with_capacity(data.len() * 4 / 5);
    let mut group = [0u8; 5];
    let mut filled = 0;

    for &byte in data {
        match byte {
            b'~' => break,
            b if is_pdf_whitespace(b) => continue,
            b'z' if filled == 0 => out.extend_from_slice(&[0; 4]),
            b'!'..=b'u' => {
                group[filled] = byte - b'!';
                filled += 1;
                if filled == 5 {
                    let word = ascii85_group(&group).ok_or_else(|| {
                        Failure::Corrupt("group value overflows 32 bits".into())
                    })?;
                    out.extend_from_slice(&word);
                    filled = 0;
                }
            }
            other => {
                return Err(Failure::Corrupt(format!(
                    "unexpected byte 0x{:02x}",
                    other
                )))
            }
        }
    }

    match filled {
        0 => {}
        1 => {
            return Err(Failure::Corrupt(
                "trailing group of a single character".into(),
            ))
        }
        n => {
            // Pad a partial group with 'u' and keep n-1 bytes
            group[n..].fill(b'u' - b'!');
            let word = ascii85_group(&group)
                .ok_or_else(|| Failure::Corrupt("final group value overflows 32 bits".into()))?;
            out.extend_from_slice(&word[..n - 1]);
        }
    }
    Ok(out)
}

fn ascii85_group(digits: &[u8; 5]) -> Option<[u8; 4]> {
    let value = digits
        .iter()
        .fold(0u64, |acc, &digit| acc * 85 + u64::from(digit));
    u32::try_from(value).ok().map(u32::to_be_bytes)
}

fn ascii_hex_decode(data: &[u8]) -> Decoded {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut pending: Option<u8> = None;

    for &byte in data {
        let nibble = match byte {
            b'>' => break,
            b if is_pdf_whitespace(b) => continue,
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            other => {
                return Err(Failure::Corrupt(format!(
                    "unexpected byte 0x{:02x}",
                    other
                )))
            }
        };
        match pending.take() {
            Some(high) => out.push((high << 4) | nibble),
            None => pending = Some(nibble),
        }
    }

    // An odd final digit behaves as if followed by 0
    if let Some(high) = pending {
        out.push(high << 4);
    }
    Ok(out)
}

fn run_length_decode(data: &[u8], max: usize) -> Decoded {
    let truncated = || Failure::Corrupt("run truncated".into());

    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let length = data[i];
        i += 1;
        let produced = match length {
            128 => break,
            0..=127 => length as usize + 1,
            129..=255 => 257 - length as usize,
        };
        if out.len() + produced > max {
            return Err(Failure::TooLarge);
        }
        if length < 128 {
            let run = data.get(i..i + produced).ok_or_else(truncated)?;
            out.extend_from_slice(run);
            i += produced;
        } else {
            let byte = *data.get(i).ok_or_else(truncated)?;
            out.extend(std::iter::repeat(byte).take(produced));
            i += 1;
        }
    }
    Ok(out)
}
