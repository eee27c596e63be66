use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use acdc_fio::{WriteOptions, catalog};
use acdc_viz::{Frame, ModeData, TipSeries, parse_frame};
use anyhow::{Context, bail};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

pub fn list_schemas(out: &mut impl Write) -> anyhow::Result<()> {
    for spec in catalog::all() {
        let stored = spec.fields.iter().filter(|f| f.kind.is_stored()).count();
        let counted: Vec<&str> = spec
            .fields
            .iter()
            .filter(|f| f.length_ref().is_some())
            .map(|f| f.name.as_str())
            .collect();
        writeln!(out, "{}: {} fields", spec.name, stored)?;
        if !counted.is_empty() {
            writeln!(out, "  counted: {}", counted.join(", "))?;
        }
    }
    Ok(())
}

pub fn read_deck(schema: &str, input: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let spec = catalog::lookup(schema)?;
    let doc = acdc_fio::read_file(input, &spec)
        .with_context(|| format!("parse {} as {}", input.display(), spec.name))?;
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

pub fn format_deck(schema: &str, input: &Path, config: Option<&Path>) -> anyhow::Result<String> {
    let spec = catalog::lookup(schema)?;
    let options = match config {
        Some(path) => WriteOptions::load(path)
            .with_context(|| format!("load writer options {}", path.display()))?,
        None => WriteOptions::default(),
    };
    let doc = acdc_fio::read_file(input, &spec)
        .with_context(|| format!("parse {} as {}", input.display(), spec.name))?;
    let text = acdc_fio::write_with(&doc, &spec, &options)
        .with_context(|| format!("serialize {}", input.display()))?;
    debug!(fields = doc.len(), "formatted deck");
    Ok(text)
}

pub fn write_output(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote deck");
    Ok(())
}

/// Parse every snapshot concurrently, keeping frames in input order.
pub fn load_mode_data(files: &[PathBuf]) -> anyhow::Result<ModeData> {
    let frames = files
        .par_iter()
        .map(|path| parse_frame(path))
        .collect::<Result<Vec<Frame>, _>>()?;
    info!(frames = frames.len(), "loaded mode snapshots");
    Ok(ModeData::from_frames(frames))
}

#[derive(Serialize)]
struct TipReport<'a> {
    frames: usize,
    tips: &'a BTreeMap<String, TipSeries>,
}

pub fn report_tips(
    data: &ModeData,
    component: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut tips = data.tip_deflections();
    if let Some(name) = component {
        if !tips.contains_key(name) {
            bail!("component {name} not found in any frame");
        }
        tips.retain(|k, _| k == name);
    }

    if json {
        serde_json::to_writer_pretty(
            &mut *out,
            &TipReport {
                frames: data.len(),
                tips: &tips,
            },
        )?;
        writeln!(out)?;
        return Ok(());
    }

    for (name, series) in &tips {
        writeln!(out, "{name}")?;
        writeln!(out, "{:>6} {:>14} {:>14}", "frame", "flap", "edge")?;
        for ((frame, flap), edge) in series.frames.iter().zip(&series.flap).zip(&series.edge) {
            writeln!(out, "{frame:>6} {flap:>14.6e} {edge:>14.6e}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = "---- header ----\n4\n1.5 1.5\n2.5 2.5\n3.5 3.5\n4.5 4.5\n";

    fn snapshot(tip_x: f64) -> String {
        format!(
            r#"<VTKFile type="PolyData"><PolyData><Piece NumberOfPoints="2"><Points>
<DataArray NumberOfComponents="3" format="ascii">0 0 0 {tip_x} 0.25 90</DataArray>
</Points></Piece></PolyData></VTKFile>"#
        )
    }

    fn write_snapshots(dir: &Path, tips: &[f64]) -> Vec<PathBuf> {
        tips.iter()
            .enumerate()
            .map(|(i, x)| {
                let name = format!("case.Mode1.LinTime1.ED_TowerLn2Mesh_motion.{:03}.vtp", i + 1);
                let path = dir.join(name);
                fs::write(&path, snapshot(*x)).expect("write snapshot");
                path
            })
            .collect()
    }

    #[test]
    fn lists_builtin_schemas() {
        let mut out = Vec::new();
        list_schemas(&mut out).expect("listing should succeed");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("AeroDyn14: "));
        assert!(text.contains("counted: FoilNm, BldNodeData"));
        assert!(text.contains("ElastoDynTower: "));
    }

    #[test]
    fn unknown_schema_is_an_error() {
        let err = format_deck("NotASchema", Path::new("x.dat"), None).expect_err("must fail");
        assert!(err.to_string().contains("unknown schema"), "{err}");
    }

    #[test]
    fn format_reports_parse_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("tower.dat");
        fs::write(&input, DECK).expect("write deck");

        let err = format_deck("ElastoDynTower", &input, None).expect_err("wrong schema");
        let message = format!("{err:#}");
        assert!(message.contains("as ElastoDynTower"), "{message}");
    }

    #[test]
    fn write_output_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/deck.dat");
        write_output(&path, "text\n").expect("write should succeed");
        assert_eq!(fs::read_to_string(&path).expect("read back"), "text\n");
    }

    #[test]
    fn parallel_load_keeps_frame_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tips: Vec<f64> = (0..16).map(|i| i as f64 * 0.5).collect();
        let files = write_snapshots(dir.path(), &tips);

        let data = load_mode_data(&files).expect("snapshots should load");
        let series = data.tip_deflection("ED_TowerLn2Mesh_motion");
        assert_eq!(series.flap, tips);
        assert_eq!(series.frames.last(), Some(&16));
    }

    #[test]
    fn tip_report_filters_component() {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = write_snapshots(dir.path(), &[0.0, 1.0]);
        let data = load_mode_data(&files).expect("snapshots should load");

        let mut out = Vec::new();
        report_tips(&data, Some("ED_TowerLn2Mesh_motion"), true, &mut out).expect("json report");
        let json: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(json["frames"], 2);
        assert_eq!(json["tips"]["ED_TowerLn2Mesh_motion"]["flap"][1], 1.0);
        assert_eq!(json["tips"]["ED_TowerLn2Mesh_motion"]["edge"][0], 0.25);

        let mut out = Vec::new();
        report_tips(&data, None, false, &mut out).expect("table report");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("ED_TowerLn2Mesh_motion\n"));

        let err = report_tips(&data, Some("BD_BldMotion1"), false, &mut Vec::new())
            .expect_err("unknown component");
        assert!(err.to_string().contains("BD_BldMotion1"));
    }
}
