//! State Map Plotter Module
//! Renders accident locations of one state and year over a base map.

use super::basemap::{visible_segments, Extent};
use crate::data::{AccidentRecord, DataLoader, DataProcessor, LoaderError, Year};
use crate::states::{self, StateCode};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Share of the data span added around the plotted points.
const EXTENT_PADDING: f64 = 0.05;
/// Minimum padding in degrees, keeps a single accident visible.
const MIN_PADDING_DEG: f64 = 0.5;

const LAND_OUTLINE: RGBColor = RGBColor(96, 125, 139);
const MARKER: RGBColor = RGBColor(231, 76, 60);

#[derive(Error, Debug)]
pub enum MapError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("invalid STATE number: {0}")]
    InvalidState(i64),
    #[error("Failed to create output directory '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to render map: {0}")]
    Render(String),
}

/// What a map request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    /// A PNG was written with one dot per located accident.
    Rendered { path: PathBuf, points: usize },
    /// The state had nothing to plot; no file was written.
    NoAccidents,
}

/// Image settings for rendered maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub width: u32,
    pub height: u32,
    /// Dot radius in pixels.
    pub marker_size: u32,
    /// Draw caption and axis labels. Needs a system font.
    pub labels: bool,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            marker_size: 2,
            labels: true,
        }
    }
}

/// Plots accident locations for a state.
pub struct StateMapPlotter {
    loader: DataLoader,
    style: MapStyle,
    output_dir: PathBuf,
}

impl StateMapPlotter {
    pub fn new(loader: DataLoader, style: MapStyle, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            style,
            output_dir: output_dir.into(),
        }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    /// Default file for a state/year map inside the output directory.
    pub fn output_path(&self, state: StateCode, year: Year) -> PathBuf {
        self.output_dir.join(format!("accident_map_{state}_{year}.png"))
    }

    /// Map one state's accidents for `year` into the default output file.
    pub fn map_state(
        &self,
        state: impl Into<StateCode>,
        year: impl Into<Year>,
    ) -> Result<MapOutcome, MapError> {
        let (state, year) = (state.into(), year.into());
        let output = self.output_path(state, year);
        self.map_state_to(state, year, &output)
    }

    /// Like [`map_state`](Self::map_state) but writes to `output`.
    pub fn map_state_to(
        &self,
        state: impl Into<StateCode>,
        year: impl Into<Year>,
        output: &Path,
    ) -> Result<MapOutcome, MapError> {
        let (state, year) = (state.into(), year.into());
        let table = self.loader.load_year(year)?;

        let code = state.value();
        if !table.state_codes()?.contains(&code) {
            return Err(MapError::InvalidState(code));
        }

        let records = table.filter_state(code)?.records()?;
        debug!(state = code, %year, rows = records.len(), "filtered state");

        let title = format!("Fatal accidents in {}, {}", states::label(code), year);
        self.plot_records(records, &title, output)
    }

    /// Clean coordinates and plot `records`.
    ///
    /// An empty input, or one where no record has a usable position on
    /// either axis, logs "no accidents to plot" and writes nothing.
    pub fn plot_records(
        &self,
        mut records: Vec<AccidentRecord>,
        title: &str,
        output: &Path,
    ) -> Result<MapOutcome, MapError> {
        if records.is_empty() {
            info!("no accidents to plot");
            return Ok(MapOutcome::NoAccidents);
        }

        DataProcessor::clean_coordinates(&mut records);

        let Some(extent) = Extent::from_coordinates(
            records.iter().map(|r| r.longitude),
            records.iter().map(|r| r.latitude),
        ) else {
            info!("no accidents to plot");
            return Ok(MapOutcome::NoAccidents);
        };

        let points: Vec<(f64, f64)> = records.iter().filter_map(AccidentRecord::position).collect();
        self.render(
            output,
            title,
            &extent.padded(EXTENT_PADDING, MIN_PADDING_DEG),
            &points,
        )?;
        info!(path = %output.display(), points = points.len(), "map rendered");

        Ok(MapOutcome::Rendered {
            path: output.to_path_buf(),
            points: points.len(),
        })
    }

    fn render(
        &self,
        output: &Path,
        title: &str,
        extent: &Extent,
        points: &[(f64, f64)],
    ) -> Result<(), MapError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| MapError::Output {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let root =
            BitMapBackend::new(output, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if self.style.labels {
            builder
                .caption(title, ("sans-serif", 22))
                .x_label_area_size(35)
                .y_label_area_size(45);
        }

        let mut chart = builder
            .build_cartesian_2d(
                extent.lon_min..extent.lon_max,
                extent.lat_min..extent.lat_max,
            )
            .map_err(render_err)?;

        if self.style.labels {
            chart
                .configure_mesh()
                .x_desc("Longitude")
                .y_desc("Latitude")
                .draw()
                .map_err(render_err)?;
        }

        chart
            .draw_series(
                visible_segments(extent)
                    .into_iter()
                    .map(|(a, b)| PathElement::new(vec![a, b], LAND_OUTLINE.stroke_width(1))),
            )
            .map_err(render_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, self.style.marker_size, MARKER.filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

fn render_err(err: impl Display) -> MapError {
    MapError::Render(err.to_string())
}
