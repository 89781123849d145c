use std::f64::consts::PI;

use crate::geo::Coord;

/// Two-dimensional Gaussian kernel density estimate with Scott's rule
/// bandwidth over the sample covariance.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<Coord>,
    /// Inverse of the kernel covariance, row-major 2x2.
    inv_cov: [f64; 4],
    norm: f64,
}

impl GaussianKde {
    /// `None` for fewer than three points or a singular covariance (all
    /// points on one line).
    pub fn fit(points: &[Coord]) -> Option<Self> {
        let n = points.len();
        if n < 3 {
            return None;
        }
        let nf = n as f64;
        let mean_lat = points.iter().map(|p| p.lat).sum::<f64>() / nf;
        let mean_long = points.iter().map(|p| p.long).sum::<f64>() / nf;
        let (mut s_ll, mut s_lg, mut s_gg) = (0.0, 0.0, 0.0);
        for p in points {
            let d_lat = p.lat - mean_lat;
            let d_long = p.long - mean_long;
            s_ll += d_lat * d_lat;
            s_lg += d_lat * d_long;
            s_gg += d_long * d_long;
        }
        let factor_2 = nf.powf(-1.0 / 6.0).powi(2);
        let scale = factor_2 / (nf - 1.0);
        let (a, b, d) = (s_ll * scale, s_lg * scale, s_gg * scale);

        let det = a * d - b * b;
        if !det.is_finite() || det <= f64::EPSILON * (a * d).abs() {
            return None;
        }
        Some(Self {
            points: points.to_vec(),
            inv_cov: [d / det, -b / det, -b / det, a / det],
            norm: nf * 2.0 * PI * det.sqrt(),
        })
    }

    pub fn evaluate(&self, at: &Coord) -> f64 {
        let [i00, i01, i10, i11] = self.inv_cov;
        let sum: f64 = self
            .points
            .iter()
            .map(|p| {
                let x = at.lat - p.lat;
                let y = at.long - p.long;
                let energy = x * (i00 * x + i01 * y) + y * (i10 * x + i11 * y);
                (-0.5 * energy).exp()
            })
            .sum();
        sum / self.norm
    }

    pub fn evaluate_all(&self, at: &[Coord]) -> Vec<f64> {
        at.iter().map(|c| self.evaluate(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 1.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
        ]
    }

    #[test]
    fn density_peaks_inside_the_cloud() {
        let kde = GaussianKde::fit(&square()).unwrap();
        let centre = kde.evaluate(&Coord::new(0.5, 0.5));
        let far = kde.evaluate(&Coord::new(5.0, 5.0));
        assert!(centre > far);
        assert!(far >= 0.0);
    }

    #[test]
    fn single_kernel_matches_closed_form() {
        // four points with covariance 1/3 * I, Scott factor 4^(-1/6)
        let kde = GaussianKde::fit(&square()).unwrap();
        let sigma_2 = (1.0 / 3.0) * 4f64.powf(-1.0 / 3.0);
        let at = Coord::new(0.0, 0.0);
        let expected: f64 = square()
            .iter()
            .map(|p| (-(at.distance_2(p)) / (2.0 * sigma_2)).exp())
            .sum::<f64>()
            / (4.0 * 2.0 * PI * sigma_2);
        assert!((kde.evaluate(&at) - expected).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(GaussianKde::fit(&square()[..2]).is_none());
        let collinear = vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(2.0, 2.0),
        ];
        assert!(GaussianKde::fit(&collinear).is_none());
    }
}
