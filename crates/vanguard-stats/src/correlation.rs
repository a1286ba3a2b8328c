//! Pearson correlation, least-squares regression, and scatter sampling for paired data.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, StudentsT};

/// Reason a regression line could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::Error)]
#[serde(rename_all = "snake_case")]
pub enum RegressionError {
    /// Fewer than two points were given.
    #[display("at least two points are required to fit a regression line")]
    InsufficientData,
    /// Every x value is identical, so the slope is undefined.
    #[display("regression is undefined because every x value is identical")]
    ConstantPredictor,
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Standard error of the slope; `None` for fewer than 3 points.
    pub std_error: Option<f64>,
}

impl LinearRegression {
    /// Fits the line minimizing the sum of squared residuals.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanguard_stats::correlation::{LinearRegression, RegressionError};
    /// let line = LinearRegression::fit(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap();
    /// assert!((line.slope - 2.0).abs() < 1e-12);
    /// assert!((line.intercept - 1.0).abs() < 1e-12);
    /// assert_eq!(line.std_error, Some(0.0));
    ///
    /// let constant = LinearRegression::fit(&[4.0, 4.0], &[1.0, 2.0]);
    /// assert_eq!(constant, Err(RegressionError::ConstantPredictor));
    /// ```
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, RegressionError> {
        let moments = Moments::new(xs, ys).ok_or(RegressionError::InsufficientData)?;
        if moments.x_constant {
            return Err(RegressionError::ConstantPredictor);
        }
        let slope = moments.sxy / moments.sxx;
        let intercept = moments.mean_y - slope * moments.mean_x;
        Ok(Self {
            slope,
            intercept,
            std_error: moments.slope_std_error(slope),
        })
    }

    /// Evaluates the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The two end points of the line over `[x_min, x_max]`, for drawing a trend line.
    #[must_use]
    pub fn trend_line(&self, x_min: f64, x_max: f64) -> [(f64, f64); 2] {
        [(x_min, self.predict(x_min)), (x_max, self.predict(x_max))]
    }
}

/// Qualitative strength of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    /// `|r| >= 0.7`
    Strong,
    /// `|r| >= 0.4`
    Moderate,
    /// `|r| >= 0.2`
    Weak,
    Negligible,
}

impl Strength {
    #[must_use]
    pub fn from_r(r: f64) -> Self {
        match r.abs() {
            a if a >= 0.7 => Self::Strong,
            a if a >= 0.4 => Self::Moderate,
            a if a >= 0.2 => Self::Weak,
            _ => Self::Negligible,
        }
    }
}

/// Sign of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
    None,
}

impl Direction {
    #[must_use]
    pub fn from_r(r: f64) -> Self {
        if r > 0.0 {
            Self::Positive
        } else if r < 0.0 {
            Self::Negative
        } else {
            Self::None
        }
    }
}

/// Paired x/y coordinates for a scatter plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScatterSample {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ScatterSample {
    /// Selects at most `cap` points by uniform stride, preserving input order.
    ///
    /// When there are more than `cap` points, the point at index `⌊i·n/cap⌋`
    /// is taken for every `i in 0..cap`. The selection depends only on the
    /// input length and `cap`, so it is identical across repeated calls.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanguard_stats::correlation::ScatterSample;
    /// let xs = (0..10).map(f64::from).collect::<Vec<_>>();
    /// let sample = ScatterSample::downsample(&xs, &xs, 4);
    /// assert_eq!(sample.x, [0.0, 2.0, 5.0, 7.0]);
    /// ```
    #[must_use]
    pub fn downsample(xs: &[f64], ys: &[f64], cap: usize) -> Self {
        assert_eq!(xs.len(), ys.len(), "x and y must have the same length");
        let n = xs.len();
        if n <= cap {
            return Self {
                x: xs.to_vec(),
                y: ys.to_vec(),
            };
        }
        let (x, y) = (0..cap)
            .map(|i| i * n / cap)
            .map(|idx| (xs[idx], ys[idx]))
            .unzip();
        Self { x, y }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Full correlation analysis of two paired variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    /// Number of paired observations.
    pub sample_size: usize,
    /// Pearson correlation coefficient; `None` when either variable is constant.
    pub r: Option<f64>,
    /// The least-squares line, or why it could not be fitted.
    pub regression: Result<LinearRegression, RegressionError>,
    /// Two-sided p-value for `H0: ρ = 0`; `None` when `r` is undefined or fewer than 3 points.
    pub p_value: Option<f64>,
    /// Smallest and largest x, the extent of the trend line.
    pub x_range: Option<(f64, f64)>,
    pub scatter: ScatterSample,
}

impl Correlation {
    /// Analyzes paired observations.
    ///
    /// # Panics
    ///
    /// Panics if `xs` and `ys` differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanguard_stats::correlation::Correlation;
    /// let xs = [1.0, 2.0, 3.0, 4.0];
    /// let ys = [2.0, 4.0, 6.0, 8.0];
    /// let correlation = Correlation::compute(&xs, &ys, 200);
    /// assert!((correlation.r.unwrap() - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn compute(xs: &[f64], ys: &[f64], scatter_cap: usize) -> Self {
        assert_eq!(xs.len(), ys.len(), "x and y must have the same length");

        let moments = Moments::new(xs, ys);
        let r = moments.as_ref().and_then(Moments::pearson);
        let p_value = r.and_then(|r| pearson_p_value(r, xs.len()));
        let x_range = moments.as_ref().map(|m| (m.min_x, m.max_x));

        Self {
            sample_size: xs.len(),
            r,
            regression: LinearRegression::fit(xs, ys),
            p_value,
            x_range,
            scatter: ScatterSample::downsample(xs, ys, scatter_cap),
        }
    }

    /// Coefficient of determination.
    #[must_use]
    pub fn r_squared(&self) -> Option<f64> {
        self.r.map(|r| r * r)
    }

    /// Trend line end points, when a regression line exists.
    #[must_use]
    pub fn trend_line(&self) -> Option<[(f64, f64); 2]> {
        let line = self.regression.ok()?;
        let (x_min, x_max) = self.x_range?;
        Some(line.trend_line(x_min, x_max))
    }
}

/// Centered sums of squares and cross-products.
struct Moments {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
    min_x: f64,
    max_x: f64,
    x_constant: bool,
    y_constant: bool,
}

impl Moments {
    /// Returns `None` for fewer than two points.
    #[expect(clippy::cast_precision_loss)]
    fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return None;
        }
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let (dx, dy) = (x - mean_x, y - mean_y);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Exact identity check; centered sums of identical values can be tiny but nonzero
        let x_constant = xs.iter().all(|x| x.total_cmp(&xs[0]).is_eq());
        let y_constant = ys.iter().all(|y| y.total_cmp(&ys[0]).is_eq());

        Some(Self {
            n: xs.len(),
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
            min_x,
            max_x,
            x_constant,
            y_constant,
        })
    }

    /// `sqrt(SSE / (n - 2) / Sxx)`, where `SSE = Syy - slope·Sxy`.
    #[expect(clippy::cast_precision_loss)]
    fn slope_std_error(&self, slope: f64) -> Option<f64> {
        if self.n < 3 {
            return None;
        }
        let residual = (self.syy - slope * self.sxy).max(0.0);
        Some((residual / (self.n - 2) as f64 / self.sxx).sqrt())
    }

    fn pearson(&self) -> Option<f64> {
        if self.x_constant || self.y_constant {
            return None;
        }
        let denominator = (self.sxx * self.syy).sqrt();
        if denominator == 0.0 {
            return None;
        }
        Some((self.sxy / denominator).clamp(-1.0, 1.0))
    }
}

#[expect(clippy::cast_precision_loss)]
fn pearson_p_value(r: f64, n: usize) -> Option<f64> {
    if n < 3 {
        return None;
    }
    let df = (n - 2) as f64;
    let one_minus_r2 = 1.0 - r * r;
    if one_minus_r2 <= 0.0 {
        return Some(0.0);
    }
    let t = r * (df / one_minus_r2).sqrt();
    let t_dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * t_dist.sf(t.abs())).min(1.0))
}
