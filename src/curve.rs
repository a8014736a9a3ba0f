//! Swept transfer characteristic and measurements on it.

/// One solved sweep sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Input voltage (V)
    pub vin: f64,
    /// Output voltage (V), NaN if the point was left unresolved
    pub vout: f64,
    /// NMOS drain current at (Vin, Vout) (A), NaN if unresolved
    pub id: f64,
}

impl OperatingPoint {
    pub fn new(vin: f64, vout: f64, id: f64) -> Self {
        Self { vin, vout, id }
    }

    /// Placeholder for a point whose root search failed.
    pub fn unresolved(vin: f64) -> Self {
        Self {
            vin,
            vout: f64::NAN,
            id: f64::NAN,
        }
    }

    /// Whether the output voltage was found.
    pub fn is_resolved(&self) -> bool {
        self.vout.is_finite()
    }
}

/// Largest-magnitude slope of the transfer curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slope {
    /// Midpoint of the two samples the slope was taken between (V)
    pub vin: f64,
    /// dVout/dVin (negative on the falling edge)
    pub gain: f64,
}

/// Transfer curve ordered by ascending input voltage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferCurve {
    points: Vec<OperatingPoint>,
}

impl TransferCurve {
    /// Build a curve, sorting points by input voltage.
    pub fn from_points(mut points: Vec<OperatingPoint>) -> Self {
        points.sort_by(|a, b| a.vin.total_cmp(&b.vin));
        Self { points }
    }

    pub fn points(&self) -> &[OperatingPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatingPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Input-voltage column.
    pub fn vin(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.vin).collect()
    }

    /// Output-voltage column.
    pub fn vout(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.vout).collect()
    }

    /// Drain-current column.
    pub fn id(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.id).collect()
    }

    /// Number of points left unresolved.
    pub fn unresolved_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_resolved()).count()
    }

    /// Point whose input voltage is closest to `vin`.
    pub fn nearest(&self, vin: f64) -> Option<&OperatingPoint> {
        self.points
            .iter()
            .min_by(|a, b| (a.vin - vin).abs().total_cmp(&(b.vin - vin).abs()))
    }

    /// Input voltage at which Vout = Vin, by linear interpolation.
    pub fn switching_threshold(&self) -> Option<f64> {
        self.resolved_pairs().find_map(|(a, b)| {
            let d0 = a.vout - a.vin;
            let d1 = b.vout - b.vin;
            if d0 == 0.0 {
                Some(a.vin)
            } else if d0 > 0.0 && d1 <= 0.0 {
                Some(a.vin + (b.vin - a.vin) * d0 / (d0 - d1))
            } else {
                None
            }
        })
    }

    /// Steepest segment of the curve.
    pub fn steepest_point(&self) -> Option<Slope> {
        self.resolved_pairs()
            .filter(|(a, b)| b.vin > a.vin)
            .map(|(a, b)| Slope {
                vin: 0.5 * (a.vin + b.vin),
                gain: (b.vout - a.vout) / (b.vin - a.vin),
            })
            .max_by(|x, y| x.gain.abs().total_cmp(&y.gain.abs()))
    }

    /// Point with the largest drain current.
    pub fn peak_current(&self) -> Option<&OperatingPoint> {
        self.points
            .iter()
            .filter(|p| p.is_resolved())
            .max_by(|a, b| a.id.total_cmp(&b.id))
    }

    fn resolved_pairs(&self) -> impl Iterator<Item = (&OperatingPoint, &OperatingPoint)> {
        self.points
            .windows(2)
            .map(|w| (&w[0], &w[1]))
            .filter(|(a, b)| a.is_resolved() && b.is_resolved())
    }
}

impl<'a> IntoIterator for &'a TransferCurve {
    type Item = &'a OperatingPoint;
    type IntoIter = std::slice::Iter<'a, OperatingPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
