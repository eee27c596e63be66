//! Per-frame component geometry for one mode shape.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// One mesh node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Index of the point in the snapshot's point array.
    pub id: usize,
    pub xyz: [f64; 3],
}

/// Geometry of one named mesh component at one time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    local_line: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orientation: Option<Vec<[f64; 9]>>,
}

impl Component {
    /// `orientation`, when given, holds one row-major 3x3 matrix per point
    /// of `local_line`, in the same order.
    pub fn new(local_line: Vec<Point>, orientation: Option<Vec<[f64; 9]>>) -> Self {
        Self {
            local_line,
            orientation,
        }
    }

    pub fn local_line(&self) -> &[Point] {
        &self.local_line
    }

    pub fn orientation(&self) -> Option<&[[f64; 9]]> {
        self.orientation.as_deref()
    }

    /// Last point of the local line, i.e. the tip for blade/tower meshes.
    pub fn tip(&self) -> Option<&Point> {
        self.local_line.last()
    }
}

/// All components captured at one time step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    components: BTreeMap<String, Component>,
}

impl Frame {
    pub fn from_components(components: impl IntoIterator<Item = (String, Component)>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    pub fn components(&self) -> &BTreeMap<String, Component> {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }
}

/// Ordered frames of one mode; `frames()[i]` is time step `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModeData {
    frames: Vec<Frame>,
}

/// Tip position history of one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipSeries {
    /// Frame numbers, starting at 1.
    pub frames: Vec<usize>,
    /// First coordinate of the tip per frame.
    pub flap: Vec<f64>,
    /// Second coordinate of the tip per frame.
    pub edge: Vec<f64>,
}

impl ModeData {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Union of component names over every frame.
    pub fn component_names(&self) -> BTreeSet<&str> {
        self.frames
            .iter()
            .flat_map(|f| f.components.keys().map(String::as_str))
            .collect()
    }

    /// Tip (last local-line point) of `component` in every frame. Frames
    /// where the component is absent or has no points contribute `(0, 0)`.
    pub fn tip_deflection(&self, component: &str) -> TipSeries {
        let n = self.frames.len();
        let mut series = TipSeries {
            frames: (1..=n).collect(),
            flap: vec![0.0; n],
            edge: vec![0.0; n],
        };
        for (i, frame) in self.frames.iter().enumerate() {
            if let Some(tip) = frame.component(component).and_then(Component::tip) {
                series.flap[i] = tip.xyz[0];
                series.edge[i] = tip.xyz[1];
            }
        }
        series
    }

    pub fn tip_deflections(&self) -> BTreeMap<String, TipSeries> {
        self.component_names()
            .into_iter()
            .map(|name| (name.to_string(), self.tip_deflection(name)))
            .collect()
    }
}
