//! Terminal rendition of a Plotly figure
//!
//! Bar figures over categories draw as a horizontal `BarChart`; everything
//! else draws as a `Chart` with one dataset per trace.

use crate::model::figure::{format_number, Trace, TraceKind};
use crate::model::Figure;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

/// Bars are scaled so the longest one spans this many units
const BAR_SCALE: f64 = 1000.0;

#[derive(Debug, Default)]
pub struct FigurePanel {
    figure: Option<Result<Figure, String>>,
}

impl FigurePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the figure JSON; `None` clears the panel
    pub fn set_source(&mut self, json: Option<&str>) {
        self.figure = json.map(|j| Figure::parse(j).map_err(|e| e.to_string()));
        if let Some(Err(e)) = &self.figure {
            tracing::warn!(error = %e, "could not decode figure");
        }
    }

    #[cfg(test)]
    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref().and_then(|f| f.as_ref().ok())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, empty: &str) {
        match &self.figure {
            None => {
                let message = Paragraph::new(Span::styled(
                    empty.to_string(),
                    Style::default().fg(Color::DarkGray),
                ));
                frame.render_widget(message, area);
            }
            Some(Err(e)) => {
                let message = Paragraph::new(Span::styled(
                    format!("Cannot draw figure: {}", e),
                    Style::default().fg(Color::Red),
                ));
                frame.render_widget(message, area);
            }
            Some(Ok(figure)) => render_figure(frame, area, figure),
        }
    }
}

fn render_figure(frame: &mut Frame, area: Rect, figure: &Figure) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let title = figure.title.clone().unwrap_or_else(|| "Untitled figure".to_string());
    frame.render_widget(
        Paragraph::new(Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    if draws_as_bars(figure) {
        render_bars(frame, chunks[1], figure);
    } else {
        render_lines(frame, chunks[1], figure);
    }
}

/// `BarChart` only grows bars upward, so negative values go to a `Chart`
fn draws_as_bars(figure: &Figure) -> bool {
    let categorical = figure.traces.iter().any(Trace::has_categorical_x);
    let negative = figure
        .traces
        .iter()
        .flat_map(|t| t.y.iter())
        .any(|y| y.is_finite() && *y < 0.0);
    figure.is_bar_chart() && categorical && !negative
}

fn render_bars(frame: &mut Frame, area: Rect, figure: &Figure) {
    let max = figure
        .traces
        .iter()
        .flat_map(|t| t.y.iter().copied())
        .filter(|y| y.is_finite())
        .fold(0.0_f64, |acc, y| acc.max(y.abs()));
    let scale = if max > 0.0 { BAR_SCALE / max } else { 1.0 };

    let groups: Vec<(Option<String>, Vec<Bar>)> = figure
        .traces
        .iter()
        .enumerate()
        .map(|(i, trace)| {
            let color = PALETTE[i % PALETTE.len()];
            let bars = trace
                .x
                .iter()
                .zip(&trace.y)
                .filter(|(_, y)| y.is_finite())
                .map(|(x, y)| {
                    Bar::default()
                        .label(Line::from(x.label()))
                        .value((y * scale).round() as u64)
                        .text_value(format_number(*y))
                        .style(Style::default().fg(color))
                        .value_style(Style::default().fg(Color::Black).bg(color))
                })
                .collect();
            (trace.name.clone(), bars)
        })
        .collect();

    let mut chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1);
    for (name, bars) in &groups {
        let mut group = BarGroup::default().bars(bars);
        if let Some(name) = name {
            group = group.label(Line::from(Span::styled(
                name.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}

fn render_lines(frame: &mut Frame, area: Rect, figure: &Figure) {
    let Some(([x_min, x_max], [y_min, y_max])) = figure.bounds() else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Figure has no plottable points",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    };

    let series: Vec<Vec<(f64, f64)>> = figure.traces.iter().map(Trace::points).collect();
    let datasets: Vec<Dataset> = figure
        .traces
        .iter()
        .zip(&series)
        .enumerate()
        .map(|(i, (trace, points))| {
            let graph_type = match trace.kind {
                TraceKind::Bar => GraphType::Bar,
                TraceKind::Scatter => GraphType::Scatter,
            };
            let mut dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(points);
            if let Some(name) = &trace.name {
                dataset = dataset.name(name.clone());
            }
            dataset
        })
        .collect();

    let x_labels = match figure.traces.iter().find(|t| t.has_categorical_x()) {
        Some(trace) => vec![
            Span::raw(trace.x.first().map(|v| v.label()).unwrap_or_default()),
            Span::raw(trace.x.last().map(|v| v.label()).unwrap_or_default()),
        ],
        None => axis_labels(x_min, x_max),
    };

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(figure.x_title.clone().unwrap_or_default())
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(figure.y_title.clone().unwrap_or_default())
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(axis_labels(y_min, y_max)),
        );
    frame.render_widget(chart, area);
}

fn axis_labels(min: f64, max: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw(format_number(min)),
        Span::raw(format_number((min + max) / 2.0)),
        Span::raw(format_number(max)),
    ]
}
