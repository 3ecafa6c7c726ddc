//! STL (Stereolithography) file support.
//!
//! Both ASCII and binary STL are read. A file is treated as binary when its
//! length matches the face count in its header exactly, or when its header
//! does not start with `solid`; otherwise it is parsed as ASCII.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    - Header (ignored)
//! UINT32       - Number of triangles
//! foreach triangle
//!     REAL32[3] - Normal vector (ignored, recomputed from winding)
//!     REAL32[3] - Vertex 1
//!     REAL32[3] - Vertex 2
//!     REAL32[3] - Vertex 3
//!     UINT16    - Attribute byte count
//! end
//! ```
//!
//! STL carries no connectivity, so every facet contributes three fresh
//! vertices.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use grasp_types::{IndexedMesh, Point3, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Binary STL header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an ASCII or binary STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
///
/// # Example
///
/// ```no_run
/// use grasp_io::load_stl;
///
/// let mesh = load_stl("mug.stl").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::open(path, e))?;
    let mesh = read_stl(&bytes)?;
    debug!(
        path = %path.display(),
        faces = mesh.faces.len(),
        "Loaded STL"
    );
    Ok(mesh)
}

/// Parse STL from an in-memory buffer.
///
/// # Errors
///
/// Returns an error if the bytes are not valid ASCII or binary STL.
pub fn read_stl(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let header = &bytes[..bytes.len().min(HEADER_SIZE)];
    let looks_ascii = String::from_utf8_lossy(header)
        .trim_start()
        .starts_with("solid")
        && !header.contains(&0);

    if looks_ascii && !binary_size_matches(bytes) {
        read_stl_ascii(bytes)
    } else {
        read_stl_binary(bytes)
    }
}

/// Whether the buffer length agrees with a binary header's face count.
fn binary_size_matches(bytes: &[u8]) -> bool {
    face_count(bytes).is_some_and(|n| {
        (n as usize)
            .checked_mul(TRIANGLE_SIZE)
            .and_then(|b| b.checked_add(HEADER_SIZE + 4))
            == Some(bytes.len())
    })
}

fn face_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_stl_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let count = face_count(bytes).ok_or(IoError::InvalidHeader {
        expected: HEADER_SIZE + 4,
        got: bytes.len(),
    })?;

    // The header count is untrusted; check it against the body before allocating
    let body = &bytes[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if (count as usize) > available {
        return Err(IoError::InvalidFaceCount {
            expected: count,
            got: u32::try_from(available).unwrap_or(u32::MAX),
        });
    }

    let mut mesh = IndexedMesh::new();
    mesh.vertices.reserve(count as usize * 3);
    mesh.faces.reserve(count as usize);

    for record in body.chunks_exact(TRIANGLE_SIZE).take(count as usize) {
        // Skip the stored normal (12 bytes)
        push_facet(
            &mut mesh,
            [
                read_vertex(&record[12..24]),
                read_vertex(&record[24..36]),
                read_vertex(&record[36..48]),
            ],
        );
    }

    Ok(mesh)
}

/// Read a vertex from 12 bytes (3 little-endian f32s).
fn read_vertex(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn read_stl_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut in_loop = false;
    let mut facet: Vec<Point3<f64>> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                facet.clear();
            }
            "vertex" if in_loop => {
                let coords = parts
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()?;
                if coords.len() != 3 {
                    return Err(IoError::invalid_content(format!(
                        "vertex line has {} coordinates: {line}",
                        coords.len()
                    )));
                }
                facet.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "endloop" => {
                in_loop = false;
                if let &[a, b, c] = facet.as_slice() {
                    push_facet(&mut mesh, [a, b, c]);
                } else {
                    return Err(IoError::invalid_content(format!(
                        "facet {} has {} vertices",
                        mesh.faces.len(),
                        facet.len()
                    )));
                }
            }
            "endsolid" => break,
            _ => {}
        }
    }

    if mesh.faces.is_empty() {
        return Err(IoError::invalid_content("ASCII STL contains no facets"));
    }
    Ok(mesh)
}

fn push_facet(mesh: &mut IndexedMesh, corners: [Point3<f64>; 3]) {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    let base = mesh.vertices.len() as u32;
    mesh.vertices.extend(corners);
    mesh.faces.push([base, base + 1, base + 2]);
}

/// Save a mesh as STL.
///
/// Writes binary when `binary` is true, ASCII otherwise. Facet normals are
/// recomputed from the winding order.
///
/// # Errors
///
/// Returns an error if the file cannot be written or a face references a
/// missing vertex.
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    if let Some((face, vertex)) = mesh.invalid_face() {
        return Err(IoError::invalid_content(format!(
            "face {face} references missing vertex {vertex}"
        )));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    if binary {
        write_stl_binary(mesh, &mut writer)?;
    } else {
        write_stl_ascii(mesh, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_stl_binary<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by grasp-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: face count fits in u32 since indices are u32
    let count = mesh.faces.len() as u32;
    writer.write_all(&count.to_le_bytes())?;

    for tri in mesh.triangles() {
        let n = tri.normal().unwrap_or_else(Vector3::zeros);
        write_vec3(writer, &n)?;
        for v in [tri.v0, tri.v1, tri.v2] {
            write_vec3(writer, &v.coords)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Write 3 little-endian f32s.
fn write_vec3<W: Write>(writer: &mut W, v: &Vector3<f64>) -> IoResult<()> {
    for c in v.iter() {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: STL stores f32
        writer.write_all(&(*c as f32).to_le_bytes())?;
    }
    Ok(())
}

fn write_stl_ascii<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;
    for tri in mesh.triangles() {
        let n = tri.normal().unwrap_or_else(Vector3::zeros);
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in [tri.v0, tri.v1, tri.v2] {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid mesh")?;
    Ok(())
}
