use nalgebra::DMatrix;

/// Time-indexed simulation output: one row per step, one column per state
/// component in the layout of [`crate::transition`].
///
/// Filled incrementally by the integrator, then owned read-only by the
/// caller. Times are reconstructible as `t_start + n * dt` for row `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub(crate) data: DMatrix<f64>,
    t_start: f64,
    dt: f64,
}

impl Trajectory {
    pub(crate) fn zeros(steps: usize, state_dim: usize, t_start: f64, dt: f64) -> Self {
        Self {
            data: DMatrix::zeros(steps, state_dim),
            t_start,
            dt,
        }
    }

    /// Number of rows (time points), including the initial condition.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Number of state components per row.
    pub fn state_dim(&self) -> usize {
        self.data.ncols()
    }

    /// Time value of row `step`.
    pub fn time(&self, step: usize) -> f64 {
        self.t_start + step as f64 * self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Single component of a single row.
    pub fn value(&self, step: usize, component: usize) -> f64 {
        self.data[(step, component)]
    }

    /// One state component across all time points, copied out.
    pub fn column(&self, component: usize) -> Vec<f64> {
        self.data.column(component).iter().copied().collect()
    }

    /// The full matrix, rows = time points.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}
