use std::io::BufRead;

use crate::error::PlyError;

/// Scalar property type; both the classic and the sized names are accepted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ScalarType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "char" | "int8" => Self::Int8,
            "uchar" | "uint8" => Self::UInt8,
            "short" | "int16" => Self::Int16,
            "ushort" | "uint16" => Self::UInt16,
            "int" | "int32" => Self::Int32,
            "uint" | "uint32" => Self::UInt32,
            "float" | "float32" => Self::Float32,
            "double" | "float64" => Self::Float64,
            _ => return None,
        })
    }

    /// Width in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Scalar(ScalarType),
    /// `property list <count type> <item type> <name>`
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub count: usize,
    pub properties: Vec<Property>,
}

impl Element {
    /// Bytes per row, `None` if any property is a list.
    pub fn row_size(&self) -> Option<usize> {
        self.properties
            .iter()
            .map(|p| match p.kind {
                PropertyKind::Scalar(ty) => Some(ty.size()),
                PropertyKind::List { .. } => None,
            })
            .sum()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Format {
    #[default]
    BinaryLittleEndian,
    BinaryBigEndian,
    Ascii,
}

/// Everything before `end_header`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    /// Binary little-endian when the header has no `format` line.
    pub format: Format,
    pub elements: Vec<Element>,
}

impl Header {
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn vertex_count(&self) -> usize {
        self.element("vertex").map_or(0, |e| e.count)
    }

    pub fn face_count(&self) -> usize {
        self.element("face").map_or(0, |e| e.count)
    }

    /// Reads header lines up to and including `end_header`, leaving `reader`
    /// at the first body byte.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self, PlyError> {
        let mut header = Header::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Err(PlyError::header(line_no, "missing end_header"));
            }
            line_no += 1;

            let line = std::str::from_utf8(&buf)
                .map_err(|_| PlyError::header(line_no, "header is not ASCII"))?
                .trim_end_matches(['\n', '\r']);

            if line_no == 1 {
                if line.trim() != "ply" {
                    return Err(PlyError::header(line_no, "missing `ply` magic"));
                }
                continue;
            }

            let mut words = line.split_whitespace();
            match words.next() {
                None | Some("comment") | Some("obj_info") => {}
                Some("end_header") => return Ok(header),
                Some("format") => header.format = parse_format(words.next(), line_no)?,
                Some("element") => {
                    let name = words
                        .next()
                        .ok_or_else(|| PlyError::header(line_no, "element without a name"))?;
                    let count = words
                        .next()
                        .and_then(|c| c.parse().ok())
                        .ok_or_else(|| PlyError::header(line_no, "element count is not a number"))?;
                    header.elements.push(Element {
                        name: name.to_owned(),
                        count,
                        properties: Vec::new(),
                    });
                }
                Some("property") => {
                    let property = parse_property(words, line_no)?;
                    header
                        .elements
                        .last_mut()
                        .ok_or_else(|| PlyError::header(line_no, "property before any element"))?
                        .properties
                        .push(property);
                }
                Some(other) => {
                    return Err(PlyError::header(line_no, format!("unknown keyword `{other}`")));
                }
            }
        }
    }
}

fn parse_format(word: Option<&str>, line: usize) -> Result<Format, PlyError> {
    match word {
        Some("binary_little_endian") => Ok(Format::BinaryLittleEndian),
        Some("binary_big_endian") => Ok(Format::BinaryBigEndian),
        Some("ascii") => Ok(Format::Ascii),
        Some(other) => Err(PlyError::header(line, format!("unknown format `{other}`"))),
        None => Err(PlyError::header(line, "format line without a format")),
    }
}

fn parse_property<'a>(
    mut words: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Property, PlyError> {
    let scalar = |word: Option<&str>| {
        let word = word.ok_or_else(|| PlyError::header(line, "property without a type"))?;
        ScalarType::from_name(word)
            .ok_or_else(|| PlyError::header(line, format!("unknown property type `{word}`")))
    };

    let kind = match words.next() {
        Some("list") => PropertyKind::List {
            count: scalar(words.next())?,
            item: scalar(words.next())?,
        },
        word => PropertyKind::Scalar(scalar(word)?),
    };
    let name = words
        .next()
        .ok_or_else(|| PlyError::header(line, "property without a name"))?;

    Ok(Property { name: name.to_owned(), kind })
}
