//! VTK XML PolyData (`.vtp`) snapshot reader
//!
//! Each mesh-motion snapshot written during a linearization run holds the
//! deformed geometry of one or more mesh components at one time step.
//!
//! ## Layout
//!
//! - one `<Piece>` per component, named by its `Name` attribute or by the
//!   file name (`<case>.<Mode>.<LinTime>.<Component>.<NNN>.vtp`)
//! - `<Points>`: ASCII `DataArray` with 3 components per point
//! - `<PointData>`: optional orientation, either `OrientationX`,
//!   `OrientationY` and `OrientationZ` arrays (3 components per point, one
//!   matrix row each) or a single `Orientation` array with 9 components
//! - `<Lines>`: optional `connectivity` array giving the point order of the
//!   local line; without it points are taken in array order
//!
//! Only `format="ascii"` data arrays are supported.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use roxmltree::Node;
use tracing::debug;

use crate::error::{ModeError, Result};
use crate::mode::{Component, Frame, ModeData, Point};

/// Parse snapshot files in order, one frame per path. The first failure
/// aborts the whole batch.
pub fn parse_mode_data<P: AsRef<Path>>(paths: &[P]) -> Result<ModeData> {
    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        frames.push(parse_frame(path.as_ref())?);
    }
    debug!(frames = frames.len(), "parsed mode data");
    Ok(ModeData::from_frames(frames))
}

pub fn parse_frame(path: &Path) -> Result<Frame> {
    let xml = fs::read_to_string(path).map_err(|source| ModeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_frame_str(&xml, path)
}

/// Parse snapshot XML; `path` names unnamed components and tags errors.
pub fn parse_frame_str(xml: &str, path: &Path) -> Result<Frame> {
    let malformed = |message: String| ModeError::MalformedSnapshot {
        path: path.to_path_buf(),
        message,
    };

    let doc = roxmltree::Document::parse(xml).map_err(|e| malformed(e.to_string()))?;
    let root = doc.root_element();
    if !root.has_tag_name("VTKFile") {
        return Err(malformed(format!(
            "expected <VTKFile> root, found <{}>",
            root.tag_name().name()
        )));
    }
    let poly = child(root, "PolyData").ok_or_else(|| malformed("missing <PolyData>".to_string()))?;
    let pieces: Vec<Node> = poly.children().filter(|n| n.has_tag_name("Piece")).collect();
    if pieces.is_empty() {
        return Err(malformed("no <Piece> elements".to_string()));
    }

    let base = component_name_from_path(path);
    let unnamed = pieces.iter().filter(|p| p.attribute("Name").is_none()).count();
    let mut components = BTreeMap::<String, Component>::new();
    let mut unnamed_seen = 0usize;

    for piece in &pieces {
        let name = match piece.attribute("Name") {
            Some(name) => name.to_string(),
            None if unnamed == 1 => base.clone(),
            None => {
                unnamed_seen += 1;
                format!("{base}_{unnamed_seen}")
            }
        };
        let component = parse_piece(*piece).map_err(|reason| ModeError::ComponentParse {
            path: path.to_path_buf(),
            component: name.clone(),
            reason,
        })?;
        if components.insert(name.clone(), component).is_some() {
            return Err(ModeError::ComponentParse {
                path: path.to_path_buf(),
                component: name,
                reason: "duplicate component name".to_string(),
            });
        }
    }

    debug!(path = %path.display(), components = components.len(), "parsed snapshot");
    Ok(Frame::from_components(components))
}

/// Component name encoded in a snapshot file name.
///
/// `03_NREL_5MW-ED.Mode1.LinTime1.ED_TowerLn2Mesh_motion.001.vtp` gives
/// `ED_TowerLn2Mesh_motion`; names with fewer dot-separated parts fall back
/// to the file stem.
pub fn component_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() >= 4 {
        return parts[parts.len() - 3].to_string();
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(file_name)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn parse_piece(piece: Node) -> std::result::Result<Component, String> {
    let points_node = child(piece, "Points").ok_or("missing <Points>")?;
    let array = child(points_node, "DataArray").ok_or("missing <Points> DataArray")?;
    expect_components(array, 3)?;
    let coords = parse_floats(array)?;
    if coords.len() % 3 != 0 {
        return Err(format!(
            "point array holds {} values, not a multiple of 3",
            coords.len()
        ));
    }
    let n = coords.len() / 3;
    if let Some(declared) = piece.attribute("NumberOfPoints") {
        let declared: usize = declared
            .trim()
            .parse()
            .map_err(|_| format!("invalid NumberOfPoints {declared:?}"))?;
        if declared != n {
            return Err(format!("NumberOfPoints is {declared} but {n} points were given"));
        }
    }

    let orientation = match child(piece, "PointData") {
        Some(point_data) => parse_orientation(point_data, n)?,
        None => None,
    };

    let order = match child(piece, "Lines").and_then(|l| named_array(l, "connectivity")) {
        Some(array) => line_order(array, n)?,
        None => (0..n).collect(),
    };

    let local_line = order
        .iter()
        .map(|&id| Point {
            id,
            xyz: [coords[3 * id], coords[3 * id + 1], coords[3 * id + 2]],
        })
        .collect();
    let orientation = orientation.map(|o| order.iter().map(|&id| o[id]).collect());

    Ok(Component::new(local_line, orientation))
}

const ORIENTATION_ROWS: [&str; 3] = ["OrientationX", "OrientationY", "OrientationZ"];

/// Per-point orientation as row-major 3x3 matrices, from either the
/// `OrientationX`/`OrientationY`/`OrientationZ` row arrays or a single
/// 9-component `Orientation` array.
fn parse_orientation(
    point_data: Node,
    n: usize,
) -> std::result::Result<Option<Vec<[f64; 9]>>, String> {
    let axes = ORIENTATION_ROWS.map(|name| named_array(point_data, name));
    if axes.iter().any(Option::is_some) {
        let mut rows = Vec::with_capacity(3);
        for (name, array) in ORIENTATION_ROWS.iter().zip(axes) {
            let array = array.ok_or_else(|| format!("{name} missing from orientation arrays"))?;
            expect_components(array, 3)?;
            let values = parse_floats(array)?;
            if values.len() != 3 * n {
                return Err(format!(
                    "{name} holds {} values, expected {}",
                    values.len(),
                    3 * n
                ));
            }
            rows.push(values);
        }
        let matrices = (0..n)
            .map(|i| {
                let mut m = [0.0; 9];
                for (r, row) in rows.iter().enumerate() {
                    m[3 * r..3 * r + 3].copy_from_slice(&row[3 * i..3 * i + 3]);
                }
                m
            })
            .collect();
        return Ok(Some(matrices));
    }

    let Some(array) = named_array(point_data, "Orientation") else {
        return Ok(None);
    };
    expect_components(array, 9)?;
    let values = parse_floats(array)?;
    if values.len() != 9 * n {
        return Err(format!(
            "Orientation holds {} values, expected {}",
            values.len(),
            9 * n
        ));
    }
    Ok(Some(
        values
            .chunks_exact(9)
            .map(|c| [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7], c[8]])
            .collect(),
    ))
}

fn named_array<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.has_tag_name("DataArray") && n.attribute("Name") == Some(name))
}

fn expect_components(array: Node, expected: usize) -> std::result::Result<(), String> {
    let found = match array.attribute("NumberOfComponents") {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid NumberOfComponents {raw:?}"))?,
        None => 1,
    };
    if found != expected {
        return Err(format!(
            "DataArray {:?} has {found} components, expected {expected}",
            array.attribute("Name").unwrap_or("")
        ));
    }
    Ok(())
}

fn array_text<'a>(array: Node<'a, '_>) -> std::result::Result<&'a str, String> {
    match array.attribute("format").unwrap_or("ascii") {
        "ascii" => Ok(array.text().unwrap_or("")),
        other => Err(format!("unsupported DataArray format {other:?}")),
    }
}

fn parse_floats(array: Node) -> std::result::Result<Vec<f64>, String> {
    array_text(array)?
        .split_whitespace()
        .map(|tok| tok.parse::<f64>().map_err(|_| format!("invalid number {tok:?}")))
        .collect()
}

/// Point order along the polyline(s): connectivity indices with the shared
/// end/start point of consecutive segments collapsed.
fn line_order(array: Node, n: usize) -> std::result::Result<Vec<usize>, String> {
    let mut order = Vec::new();
    for tok in array_text(array)?.split_whitespace() {
        let id: usize = tok
            .parse()
            .map_err(|_| format!("invalid connectivity index {tok:?}"))?;
        if id >= n {
            return Err(format!("connectivity index {id} out of range for {n} points"));
        }
        if order.last() != Some(&id) {
            order.push(id);
        }
    }
    if order.is_empty() {
        return Ok((0..n).collect());
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TOWER: &str = r#"<?xml version="1.0"?>
<VTKFile type="PolyData" version="0.1" byte_order="LittleEndian">
  <PolyData>
    <Piece NumberOfPoints="3" NumberOfVerts="0" NumberOfLines="2" NumberOfStrips="0" NumberOfPolys="0">
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="ascii">
          0.0 0.0 10.0
          0.1 0.0 50.0
          0.4 0.05 87.6
        </DataArray>
      </Points>
      <PointData>
        <DataArray type="Float32" Name="Orientation" NumberOfComponents="9" format="ascii">
          1 0 0 0 1 0 0 0 1
          1 0 0 0 1 0 0 0 1
          0 1 0 -1 0 0 0 0 1
        </DataArray>
      </PointData>
      <Lines>
        <DataArray type="Int32" Name="connectivity" format="ascii">0 1 1 2</DataArray>
        <DataArray type="Int32" Name="offsets" format="ascii">2 4</DataArray>
      </Lines>
    </Piece>
  </PolyData>
</VTKFile>
"#;

    fn tower_path() -> PathBuf {
        PathBuf::from("03_NREL_5MW-ED.Mode1.LinTime1.ED_TowerLn2Mesh_motion.001.vtp")
    }

    #[test]
    fn component_name_comes_from_file_name() {
        assert_eq!(component_name_from_path(&tower_path()), "ED_TowerLn2Mesh_motion");
        assert_eq!(
            component_name_from_path(Path::new("/tmp/out/BD_BldMotion1.vtp")),
            "BD_BldMotion1"
        );
    }

    #[test]
    fn parses_points_orientation_and_line_order() {
        let frame = parse_frame_str(TOWER, &tower_path()).expect("snapshot should parse");
        let tower = frame
            .component("ED_TowerLn2Mesh_motion")
            .expect("tower component present");

        let ids: Vec<usize> = tower.local_line().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(tower.tip().map(|p| p.xyz), Some([0.4, 0.05, 87.6]));

        let orientation = tower.orientation().expect("orientation present");
        assert_eq!(orientation.len(), 3);
        assert_eq!(orientation[2], [0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn connectivity_reorders_points() {
        let xml = TOWER.replace("0 1 1 2</DataArray>", "2 1 1 0</DataArray>");
        let frame = parse_frame_str(&xml, &tower_path()).expect("snapshot should parse");
        let tower = frame.component("ED_TowerLn2Mesh_motion").expect("tower");
        let ids: Vec<usize> = tower.local_line().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
        assert_eq!(tower.tip().map(|p| p.xyz), Some([0.0, 0.0, 10.0]));
        assert_eq!(tower.orientation().map(|o| o[0][1]), Some(1.0));
    }

    #[test]
    fn orientation_rows_are_combined_per_point() {
        let point_data = r#"<PointData>
        <DataArray type="Float32" Name="OrientationX" NumberOfComponents="3" format="ascii">
          1 0 0  1 0 0  0 1 0
        </DataArray>
        <DataArray type="Float32" Name="OrientationY" NumberOfComponents="3" format="ascii">
          0 1 0  0 1 0  -1 0 0
        </DataArray>
        <DataArray type="Float32" Name="OrientationZ" NumberOfComponents="3" format="ascii">
          0 0 1  0 0 1  0 0 1
        </DataArray>
      </PointData>"#;
        let start = TOWER.find("<PointData>").expect("fixture has point data");
        let end =
            TOWER.find("</PointData>").expect("fixture has point data") + "</PointData>".len();
        let xml = format!("{}{point_data}{}", &TOWER[..start], &TOWER[end..]);

        let frame = parse_frame_str(&xml, &tower_path()).expect("snapshot should parse");
        let tower = frame.component("ED_TowerLn2Mesh_motion").expect("tower");
        let orientation = tower.orientation().expect("orientation present");
        assert_eq!(orientation.len(), 3);
        assert_eq!(orientation[0], [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(orientation[2], [0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

        let partial = xml.replace("Name=\"OrientationZ\"", "Name=\"Displacement\"");
        let err = parse_frame_str(&partial, &tower_path()).expect_err("incomplete orientation");
        assert!(matches!(err, ModeError::ComponentParse { .. }), "{err}");
    }

    #[test]
    fn named_pieces_become_separate_components() {
        let xml = r#"<VTKFile type="PolyData"><PolyData>
  <Piece Name="Blade1" NumberOfPoints="2"><Points>
    <DataArray NumberOfComponents="3" format="ascii">0 0 0 1 2 3</DataArray></Points></Piece>
  <Piece Name="Blade2" NumberOfPoints="0"><Points>
    <DataArray NumberOfComponents="3" format="ascii"></DataArray></Points></Piece>
</PolyData></VTKFile>"#;
        let frame = parse_frame_str(xml, Path::new("rotor.vtp")).expect("snapshot should parse");
        let names: Vec<&String> = frame.components().keys().collect();
        assert_eq!(names, vec!["Blade1", "Blade2"]);
        assert!(frame.component("Blade2").expect("blade 2").local_line().is_empty());
        assert!(frame.component("Blade1").expect("blade 1").orientation().is_none());
    }

    #[test]
    fn several_unnamed_pieces_get_numbered() {
        let piece =
            r#"<Piece><Points><DataArray NumberOfComponents="3">1 1 1</DataArray></Points></Piece>"#;
        let xml = format!("<VTKFile><PolyData>{piece}{piece}</PolyData></VTKFile>");
        let frame = parse_frame_str(&xml, Path::new("case.Mode2.LinTime1.BD_BldMotion1.004.vtp"))
            .expect("snapshot should parse");
        let names: Vec<&String> = frame.components().keys().collect();
        assert_eq!(names, vec!["BD_BldMotion1_1", "BD_BldMotion1_2"]);
    }

    #[test]
    fn bad_component_geometry_is_component_parse_error() {
        let cases = [
            TOWER.replace("0.4 0.05 87.6", "0.4 0.05 abc"),
            TOWER.replace("NumberOfPoints=\"3\"", "NumberOfPoints=\"4\""),
            TOWER.replace("0 1 1 2</DataArray>", "0 1 1 7</DataArray>"),
            TOWER.replace("0 1 0 -1 0 0 0 0 1", "0 1 0"),
            TOWER.replace("format=\"ascii\">\n          0.0", "format=\"binary\">\n          0.0"),
        ];
        for xml in cases {
            let err = parse_frame_str(&xml, &tower_path()).expect_err("geometry must be rejected");
            match err {
                ModeError::ComponentParse { component, .. } => {
                    assert_eq!(component, "ED_TowerLn2Mesh_motion");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn non_polydata_documents_are_malformed() {
        for xml in [
            "<VTKFile><UnstructuredGrid/></VTKFile>",
            "<VTKFile><PolyData/></VTKFile>",
            "<Mesh/>",
            "<VTKFile><PolyData>",
        ] {
            let err = parse_frame_str(xml, Path::new("x.vtp")).expect_err("must fail");
            assert!(
                matches!(err, ModeError::MalformedSnapshot { .. }),
                "unexpected error for {xml}: {err}"
            );
        }
    }
}
