//! Coarse US outlines used as the map background.
//!
//! Coordinates are `(longitude, latitude)` in degrees. The shapes are
//! deliberately low resolution: enough to orient a scatter of accident
//! locations, not to measure anything.

/// Longitude/latitude bounds of a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    /// Bounds of the known values; each axis is computed independently.
    /// `None` if either axis has no value at all.
    pub fn from_coordinates(
        longitudes: impl IntoIterator<Item = Option<f64>>,
        latitudes: impl IntoIterator<Item = Option<f64>>,
    ) -> Option<Self> {
        let (lon_min, lon_max) = range(longitudes)?;
        let (lat_min, lat_max) = range(latitudes)?;
        Some(Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    /// Grow each side by `fraction` of the span, and by at least `min_pad`
    /// degrees so a single point still spans an area.
    pub fn padded(self, fraction: f64, min_pad: f64) -> Self {
        let lon_pad = ((self.lon_max - self.lon_min) * fraction).max(min_pad);
        let lat_pad = ((self.lat_max - self.lat_min) * fraction).max(min_pad);
        Self {
            lon_min: self.lon_min - lon_pad,
            lon_max: self.lon_max + lon_pad,
            lat_min: self.lat_min - lat_pad,
            lat_max: self.lat_max + lat_pad,
        }
    }

    /// Clip a segment to the extent (Liang-Barsky).
    pub fn clip(&self, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        let edges = [
            (-dx, from.0 - self.lon_min),
            (dx, self.lon_max - from.0),
            (-dy, from.1 - self.lat_min),
            (dy, self.lat_max - from.1),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((
            (from.0 + t0 * dx, from.1 + t0 * dy),
            (from.0 + t1 * dx, from.1 + t1 * dy),
        ))
    }
}

fn range(values: impl IntoIterator<Item = Option<f64>>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Closed outlines, first point repeated at the end.
pub const OUTLINES: [&[(f64, f64)]; 7] = [
    CONTIGUOUS_US,
    ALASKA,
    HAWAII_BIG_ISLAND,
    MAUI,
    OAHU,
    KAUAI,
    PUERTO_RICO,
];

const CONTIGUOUS_US: &[(f64, f64)] = &[
    (-124.7, 48.4),
    (-123.0, 49.0),
    (-95.2, 49.0),
    (-94.6, 48.7),
    (-91.0, 48.2),
    (-89.5, 48.0),
    (-84.8, 46.5),
    (-82.4, 45.3),
    (-82.5, 43.0),
    (-83.1, 42.3),
    (-82.5, 41.7),
    (-79.0, 42.8),
    (-79.2, 43.4),
    (-76.5, 44.2),
    (-74.7, 45.0),
    (-71.5, 45.0),
    (-70.7, 45.4),
    (-70.0, 46.7),
    (-69.2, 47.4),
    (-67.8, 47.1),
    (-67.8, 45.7),
    (-67.0, 44.9),
    (-68.8, 44.3),
    (-70.2, 43.7),
    (-70.7, 42.9),
    (-70.0, 42.0),
    (-70.6, 41.5),
    (-71.9, 41.3),
    (-73.9, 40.6),
    (-74.0, 40.0),
    (-74.9, 38.9),
    (-75.1, 38.3),
    (-76.0, 36.9),
    (-75.5, 35.2),
    (-76.7, 34.7),
    (-78.0, 33.9),
    (-79.2, 33.2),
    (-80.9, 32.0),
    (-81.4, 30.7),
    (-81.3, 29.9),
    (-80.6, 28.4),
    (-80.0, 26.7),
    (-80.4, 25.2),
    (-81.1, 25.1),
    (-81.8, 26.1),
    (-82.7, 27.9),
    (-82.8, 29.1),
    (-83.7, 29.9),
    (-84.4, 29.9),
    (-85.4, 29.7),
    (-86.5, 30.4),
    (-88.0, 30.7),
    (-89.6, 30.2),
    (-89.4, 29.2),
    (-90.2, 29.1),
    (-91.3, 29.3),
    (-93.8, 29.7),
    (-94.7, 29.3),
    (-96.3, 28.4),
    (-97.4, 27.4),
    (-97.2, 25.9),
    (-99.1, 26.4),
    (-99.5, 27.5),
    (-100.3, 28.3),
    (-101.4, 29.8),
    (-102.4, 29.8),
    (-103.1, 29.0),
    (-104.5, 29.6),
    (-106.5, 31.8),
    (-108.2, 31.8),
    (-108.2, 31.3),
    (-111.1, 31.3),
    (-114.8, 32.5),
    (-117.1, 32.5),
    (-118.5, 34.0),
    (-120.6, 34.6),
    (-121.9, 36.6),
    (-122.5, 37.8),
    (-123.8, 39.8),
    (-124.4, 40.4),
    (-124.2, 42.0),
    (-124.1, 43.7),
    (-123.9, 46.2),
    (-124.1, 47.0),
    (-124.7, 48.4),
];

const ALASKA: &[(f64, f64)] = &[
    (-156.8, 71.3),
    (-152.0, 70.8),
    (-148.0, 70.3),
    (-141.0, 69.6),
    (-141.0, 60.3),
    (-139.0, 60.0),
    (-137.5, 59.0),
    (-135.5, 59.8),
    (-133.4, 58.4),
    (-131.0, 56.0),
    (-130.0, 55.9),
    (-130.0, 55.0),
    (-133.5, 56.5),
    (-136.5, 58.2),
    (-139.5, 59.6),
    (-143.5, 60.0),
    (-146.5, 60.7),
    (-149.5, 59.7),
    (-151.9, 59.2),
    (-153.5, 59.0),
    (-156.0, 57.5),
    (-158.5, 56.0),
    (-162.5, 55.0),
    (-164.8, 54.5),
    (-160.5, 56.2),
    (-157.5, 58.7),
    (-161.8, 58.6),
    (-164.5, 60.5),
    (-165.4, 61.5),
    (-164.8, 63.0),
    (-160.8, 64.7),
    (-166.5, 64.6),
    (-168.1, 65.6),
    (-164.5, 66.5),
    (-162.0, 66.1),
    (-163.9, 67.2),
    (-166.8, 68.3),
    (-163.0, 69.9),
    (-159.0, 70.8),
    (-156.8, 71.3),
];

const HAWAII_BIG_ISLAND: &[(f64, f64)] = &[
    (-155.85, 20.27),
    (-155.08, 19.86),
    (-154.81, 19.51),
    (-155.68, 18.91),
    (-155.94, 19.06),
    (-156.06, 19.73),
    (-155.85, 20.27),
];

const MAUI: &[(f64, f64)] = &[
    (-156.70, 20.95),
    (-156.00, 20.80),
    (-156.20, 20.58),
    (-156.70, 20.60),
    (-156.70, 20.95),
];

const OAHU: &[(f64, f64)] = &[
    (-158.28, 21.58),
    (-157.65, 21.32),
    (-157.85, 21.25),
    (-158.13, 21.31),
    (-158.28, 21.58),
];

const KAUAI: &[(f64, f64)] = &[
    (-159.79, 22.06),
    (-159.30, 22.21),
    (-159.30, 21.95),
    (-159.60, 21.88),
    (-159.79, 22.06),
];

const PUERTO_RICO: &[(f64, f64)] = &[
    (-67.27, 18.37),
    (-65.60, 18.38),
    (-65.60, 18.00),
    (-67.20, 17.95),
    (-67.27, 18.37),
];

/// Outline segments that fall inside `extent`, clipped to its border.
pub fn visible_segments(extent: &Extent) -> Vec<((f64, f64), (f64, f64))> {
    OUTLINES
        .iter()
        .flat_map(|outline| outline.windows(2))
        .filter_map(|pair| extent.clip(pair[0], pair[1]))
        .collect()
}
