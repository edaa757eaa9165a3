use super::ReportError;
use crate::engine::dihedral::DihedralRecord;
use std::io::Write;
use std::path::Path;
use svg::Document;
use svg::node::element::{Circle, Group, Line, Rectangle, Text};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 640.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const AXIS_LIMIT: f64 = 180.0;
const TICK_STEP: i32 = 60;
const POINT_RADIUS: f64 = 2.5;
const POINT_COLOR: &str = "#1f77b4";

/// A phi/psi scatter plot with both axes fixed to [-180, 180] degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RamachandranPlot {
    title: Option<String>,
    points: Vec<(f64, f64)>,
}

impl RamachandranPlot {
    /// Collects every residue of `record` with both angles defined.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoValidAngles`] if no such residue exists.
    pub fn from_record(record: &DihedralRecord) -> Result<Self, ReportError> {
        Self::from_points(record.complete_pairs())
    }

    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, ReportError> {
        let points: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(phi, psi)| phi.is_finite() && psi.is_finite())
            .collect();
        if points.is_empty() {
            return Err(ReportError::NoValidAngles);
        }
        Ok(Self {
            title: None,
            points,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn to_document(&self) -> Document {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let x = |phi: f64| MARGIN_LEFT + (phi + AXIS_LIMIT) / (2.0 * AXIS_LIMIT) * plot_width;
        let y = |psi: f64| MARGIN_TOP + (AXIS_LIMIT - psi) / (2.0 * AXIS_LIMIT) * plot_height;

        let mut grid = Group::new()
            .set("stroke", "#d0d0d0")
            .set("stroke-width", 0.5)
            .set("stroke-dasharray", "3,3");
        let mut ticks = Group::new()
            .set("font-family", "sans-serif")
            .set("font-size", 11)
            .set("fill", "#333333");
        for tick in (-180..=180).step_by(TICK_STEP as usize) {
            let value = f64::from(tick);
            grid = grid
                .add(line(x(value), y(AXIS_LIMIT), x(value), y(-AXIS_LIMIT)))
                .add(line(x(-AXIS_LIMIT), y(value), x(AXIS_LIMIT), y(value)));
            ticks = ticks
                .add(
                    Text::new(tick.to_string())
                        .set("x", x(value))
                        .set("y", y(-AXIS_LIMIT) + 18.0)
                        .set("text-anchor", "middle"),
                )
                .add(
                    Text::new(tick.to_string())
                        .set("x", x(-AXIS_LIMIT) - 8.0)
                        .set("y", y(value) + 4.0)
                        .set("text-anchor", "end"),
                );
        }

        let zero_lines = Group::new()
            .set("stroke", "#000000")
            .set("stroke-width", 0.8)
            .add(line(x(0.0), y(AXIS_LIMIT), x(0.0), y(-AXIS_LIMIT)))
            .add(line(x(-AXIS_LIMIT), y(0.0), x(AXIS_LIMIT), y(0.0)));

        let frame = Rectangle::new()
            .set("x", MARGIN_LEFT)
            .set("y", MARGIN_TOP)
            .set("width", plot_width)
            .set("height", plot_height)
            .set("fill", "none")
            .set("stroke", "#000000");

        let points = self.points.iter().fold(
            Group::new().set("fill", POINT_COLOR).set("fill-opacity", 0.8),
            |group, &(phi, psi)| {
                group.add(
                    Circle::new()
                        .set("cx", x(phi.clamp(-AXIS_LIMIT, AXIS_LIMIT)))
                        .set("cy", y(psi.clamp(-AXIS_LIMIT, AXIS_LIMIT)))
                        .set("r", POINT_RADIUS),
                )
            },
        );

        let labels = Group::new()
            .set("font-family", "sans-serif")
            .set("font-size", 14)
            .set("text-anchor", "middle")
            .add(
                Text::new("Phi (degrees)")
                    .set("x", MARGIN_LEFT + plot_width / 2.0)
                    .set("y", HEIGHT - 20.0),
            )
            .add(
                Text::new("Psi (degrees)")
                    .set("x", 25.0)
                    .set("y", MARGIN_TOP + plot_height / 2.0)
                    .set(
                        "transform",
                        format!("rotate(-90 25 {})", MARGIN_TOP + plot_height / 2.0),
                    ),
            );

        let mut document = Document::new()
            .set("width", WIDTH)
            .set("height", HEIGHT)
            .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT))
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", "white"),
            )
            .add(grid)
            .add(zero_lines)
            .add(frame)
            .add(ticks)
            .add(points)
            .add(labels);

        if let Some(title) = &self.title {
            document = document.add(
                Text::new(title.as_str())
                    .set("x", WIDTH / 2.0)
                    .set("y", MARGIN_TOP / 2.0)
                    .set("text-anchor", "middle")
                    .set("font-family", "sans-serif")
                    .set("font-size", 18),
            );
        }
        document
    }

    pub fn write_to(&self, writer: impl Write) -> Result<(), ReportError> {
        svg::write(writer, &self.to_document())?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        svg::save(path, &self.to_document())?;
        Ok(())
    }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
}
