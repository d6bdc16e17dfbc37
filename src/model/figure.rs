//! Plotly figure decoding
//!
//! Figures arrive as a JSON string (`fig.to_json()` on the server). Only the
//! parts a terminal chart can use are kept: trace kind, name, x/y data and
//! the figure/axis titles. Newer Plotly versions encode numeric arrays as
//! base64 typed arrays (`{"dtype": "f8", "bdata": "..."}`), which are decoded
//! here as little-endian values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("invalid figure JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("figure has no `data` array")]
    MissingData,
    #[error("bad typed array: {0}")]
    TypedArray(String),
}

/// One x coordinate: numeric or categorical
#[derive(Debug, Clone, PartialEq)]
pub enum AxisValue {
    Number(f64),
    Category(String),
}

impl AxisValue {
    pub fn label(&self) -> String {
        match self {
            AxisValue::Number(n) => format_number(*n),
            AxisValue::Category(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: Option<String>,
    pub kind: TraceKind,
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
}

impl Trace {
    pub fn has_categorical_x(&self) -> bool {
        self.x.iter().any(|v| matches!(v, AxisValue::Category(_)))
    }

    /// (x, y) pairs for plotting; categorical x maps to its index
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.y)
            .enumerate()
            .filter(|(_, (_, y))| y.is_finite())
            .map(|(i, (x, y))| match x {
                AxisValue::Number(n) => (*n, *y),
                AxisValue::Category(_) => (i as f64, *y),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub traces: Vec<Trace>,
}

impl Figure {
    pub fn parse(json: &str) -> Result<Figure, FigureError> {
        let root: Value = serde_json::from_str(json)?;
        let data = root
            .get("data")
            .and_then(Value::as_array)
            .ok_or(FigureError::MissingData)?;

        let traces = data
            .iter()
            .map(parse_trace)
            .collect::<Result<Vec<_>, _>>()?;

        let layout = root.get("layout");
        Ok(Figure {
            title: layout.and_then(|l| title_text(l.get("title"))),
            x_title: layout
                .and_then(|l| l.get("xaxis"))
                .and_then(|a| title_text(a.get("title"))),
            y_title: layout
                .and_then(|l| l.get("yaxis"))
                .and_then(|a| title_text(a.get("title"))),
            traces,
        })
    }

    /// True when every trace is a bar trace; these draw as a bar chart
    pub fn is_bar_chart(&self) -> bool {
        !self.traces.is_empty() && self.traces.iter().all(|t| t.kind == TraceKind::Bar)
    }

    /// Min/max over all finite points, padded so flat data still has a range
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let points: Vec<(f64, f64)> = self.traces.iter().flat_map(|t| t.points()).collect();
        if points.is_empty() {
            return None;
        }
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if x_min == x_max {
            x_min -= 1.0;
            x_max += 1.0;
        }
        if y_min == y_max {
            y_min -= 1.0;
            y_max += 1.0;
        }
        Some(([x_min, x_max], [y_min, y_max]))
    }
}

fn parse_trace(value: &Value) -> Result<Trace, FigureError> {
    let kind = match value.get("type").and_then(Value::as_str) {
        Some("bar") => TraceKind::Bar,
        _ => TraceKind::Scatter,
    };
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let y: Vec<f64> = match value.get("y") {
        Some(v) => decode_array(v)?
            .into_iter()
            .map(|item| match item {
                AxisValue::Number(n) => n,
                AxisValue::Category(s) => s.trim().parse().unwrap_or(f64::NAN),
            })
            .collect(),
        None => Vec::new(),
    };

    let x = match value.get("x") {
        Some(v) => decode_array(v)?,
        None => (0..y.len()).map(|i| AxisValue::Number(i as f64)).collect(),
    };

    Ok(Trace { name, kind, x, y })
}

/// Decode a plain JSON array or a Plotly typed array
fn decode_array(value: &Value) -> Result<Vec<AxisValue>, FigureError> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::Number(n) => AxisValue::Number(n.as_f64().unwrap_or(f64::NAN)),
                Value::String(s) => AxisValue::Category(s.clone()),
                Value::Null => AxisValue::Number(f64::NAN),
                other => AxisValue::Category(other.to_string()),
            })
            .collect()),
        Value::Object(obj) => {
            let dtype = obj
                .get("dtype")
                .and_then(Value::as_str)
                .ok_or_else(|| FigureError::TypedArray("missing dtype".to_string()))?;
            let bdata = obj
                .get("bdata")
                .and_then(Value::as_str)
                .ok_or_else(|| FigureError::TypedArray("missing bdata".to_string()))?;
            let bytes = STANDARD
                .decode(bdata)
                .map_err(|e| FigureError::TypedArray(e.to_string()))?;
            Ok(decode_typed(dtype, &bytes)?
                .into_iter()
                .map(AxisValue::Number)
                .collect())
        }
        _ => Ok(Vec::new()),
    }
}

fn decode_typed(dtype: &str, bytes: &[u8]) -> Result<Vec<f64>, FigureError> {
    let width = match dtype {
        "f8" => 8,
        "f4" | "i4" | "u4" => 4,
        "i2" | "u2" => 2,
        "i1" | "u1" => 1,
        other => {
            return Err(FigureError::TypedArray(format!("unsupported dtype '{}'", other)));
        }
    };
    if bytes.len() % width != 0 {
        return Err(FigureError::TypedArray(format!(
            "{} bytes is not a multiple of {}",
            bytes.len(),
            width
        )));
    }

    Ok(bytes
        .chunks_exact(width)
        .map(|c| match dtype {
            "f8" => f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]),
            "f4" => f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64,
            "i4" => i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64,
            "u4" => u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64,
            "i2" => i16::from_le_bytes([c[0], c[1]]) as f64,
            "u2" => u16::from_le_bytes([c[0], c[1]]) as f64,
            "i1" => c[0] as i8 as f64,
            _ => c[0] as f64,
        })
        .collect())
}

/// Plotly titles are either a bare string or `{ "text": ... }`
fn title_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj.get("text")?.as_str()?.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Compact number for axis labels
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}
