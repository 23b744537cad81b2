/// STL decoding into flat triangle geometry
///
/// Binary layout:
///
/// ```text
/// UINT8[80]    header (ignored)
/// UINT32       triangle count
/// foreach triangle
///     REAL32[3] normal
///     REAL32[3] vertex 1
///     REAL32[3] vertex 2
///     REAL32[3] vertex 3
///     UINT16    attribute byte count
/// ```
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::geometry::{Geometry, Vertex};

const HEADER_SIZE: usize = 80;
const COUNT_SIZE: usize = 4;
const FACET_SIZE: usize = 50;

fn binary_len(triangle_count: usize) -> usize {
    HEADER_SIZE + COUNT_SIZE + triangle_count * FACET_SIZE
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Geometry> {
    let (body, triangle_count) = binary_header(data).map_err(|_| CoreError::StlTooShort)?;
    let triangle_count = triangle_count as usize;

    let expected = binary_len(triangle_count);
    if data.len() < expected {
        return Err(CoreError::StlTruncated {
            expected,
            actual: data.len(),
        });
    }

    let mut geometry = Geometry::with_capacity(triangle_count);
    let mut input = body;
    for _ in 0..triangle_count {
        let (rest, (normal, vertices)) =
            binary_facet(input).map_err(|e| CoreError::StlSyntax(format!("{:?}", e)))?;
        geometry.push_triangle(vertices, normal);
        input = rest;
    }

    debug!(triangles = triangle_count, "decoded binary STL");
    Ok(geometry)
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, _) = take(HEADER_SIZE)(input)?;
    le_u32(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], (Vertex, [Vertex; 3])> {
    let (input, normal) = le_vector3(input)?;
    let (input, v1) = le_vector3(input)?;
    let (input, v2) = le_vector3(input)?;
    let (input, v3) = le_vector3(input)?;
    let (input, _attribute) = le_u16(input)?;
    Ok((input, (normal, [v1, v2, v3])))
}

fn le_vector3(input: &[u8]) -> IResult<&[u8], Vertex> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Geometry> {
    match parse_ascii_stl_impl(input) {
        Ok((_, geometry)) => {
            debug!(triangles = geometry.triangle_count(), "decoded ASCII STL");
            Ok(geometry)
        }
        Err(e) => Err(CoreError::StlSyntax(format!("{:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Geometry> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;

    let mut geometry = Geometry::with_capacity(facets.len());
    for (normal, vertices) in facets {
        geometry.push_triangle(vertices, normal);
    }

    Ok((input, geometry))
}

fn parse_facet(input: &str) -> IResult<&str, (Vertex, [Vertex; 3])> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, (normal, [v1, v2, v3])))
}

fn parse_vertex(input: &str) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Vertex> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse STL file (binary or ASCII)
///
/// Binary exporters often start the header with `solid` too, so a buffer whose
/// length matches its declared triangle count is always read as binary.
pub fn parse_stl(data: &[u8]) -> Result<Geometry> {
    if let Ok((_, count)) = binary_header(data) {
        if data.len() == binary_len(count as usize) {
            return parse_binary_stl(data);
        }
    }

    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(geometry) = parse_ascii_stl(text) {
                return Ok(geometry);
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(geometry: &Geometry) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data.extend_from_slice(&(geometry.triangle_count() as u32).to_le_bytes());
        for (i, triangle) in geometry.triangles().enumerate() {
            let normal = &geometry.normals[i * 9..i * 9 + 3];
            for value in normal {
                data.extend_from_slice(&value.to_le_bytes());
            }
            for vertex in triangle.vertices {
                for value in vertex {
                    data.extend_from_slice(&value.to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let geometry = parse_binary_stl(&data).unwrap();
        assert_eq!(geometry.triangle_count(), 0);
    }

    #[test]
    fn test_binary_cube_roundtrip() {
        let cube = Geometry::cube(4.0);
        let parsed = parse_stl(&binary_stl(&cube)).unwrap();
        assert_eq!(parsed, cube);
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let cube = Geometry::cube(1.0);
        let mut data = binary_stl(&cube);
        data[..5].copy_from_slice(b"solid");

        assert_eq!(parse_stl(&data).unwrap(), cube);
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(parse_binary_stl(&[0u8; 40]), Err(CoreError::StlTooShort)));
    }

    #[test]
    fn test_truncated() {
        let mut data = binary_stl(&Geometry::cube(1.0));
        data.truncate(200);

        match parse_binary_stl(&data) {
            Err(CoreError::StlTruncated { expected, actual }) => {
                assert_eq!(expected, 84 + 12 * 50);
                assert_eq!(actual, 200);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ascii() {
        let text = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1.5 0 0
      vertex 0 -2e1 0
    endloop
  endfacet
endsolid tri
";
        let geometry = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.positions, vec![0.0, 0.0, 0.0, 1.5, 0.0, 0.0, 0.0, -20.0, 0.0]);
        assert_eq!(&geometry.normals[6..9], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ascii_syntax_error() {
        let result = parse_ascii_stl("solid broken\n facet normal 0 0\nendsolid");
        assert!(matches!(result, Err(CoreError::StlSyntax(_))));
    }
}
