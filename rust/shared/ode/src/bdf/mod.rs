//! Fixed step backward differentiation formulas, orders 1 through 6.
//!
//! Each step solves the implicit formula with an undamped Newton iteration,
//! using the model's Jacobian. Right after [`Bdf::set_init_conditions`] only one
//! past state is known, so the integrator starts at order one and climbs by one
//! order per step until it reaches `ORDER`.

use nalgebra::{Const, DimMin, RealField, SMatrix, SVector};


/// Floating point types the integrator can run on.
pub trait Scalar: RealField + Copy {
    /// Newton iteration stops when a correction is no larger than this.
    const INCREMENT_EPS: Self;
}

impl Scalar for f32 {
    const INCREMENT_EPS: f32 = 1e-10;
}

impl Scalar for f64 {
    const INCREMENT_EPS: f64 = 1e-12;
}

/// A system `dy/dt = f(y, x)`, where `x` is an input held constant over a step.
pub trait Model<T: Scalar, const D: usize> {
    fn dy_dt(&self, y: &SVector<T, D>, x: T) -> SVector<T, D>;

    /// The Jacobian of [`Model::dy_dt`] with respect to `y`.
    fn jacobian(&self, y: &SVector<T, D>, x: T) -> SMatrix<T, D, D>;
}

/// Limits on the Newton solve performed every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSettings<T> {
    /// The residual norm below which a candidate is accepted.
    pub tolerance: T,
    pub max_iterations: usize,
}

impl<T: Scalar> Default for NewtonSettings<T> {
    fn default() -> Self {
        Self {
            tolerance: nalgebra::convert(1e-7),
            max_iterations: 10,
        }
    }
}

const MAX_ORDER: usize = 6;

/// Slots in the history ring. Only `ORDER` of them are ever read.
const HISTORY: usize = 8;

/// Per order, the weights of past states (most recent first) and the weight of the
/// derivative at the new state.
const FORMULAS: [([f64; MAX_ORDER], f64); MAX_ORDER] = [
    ([-1.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1.0),
    ([-4.0 / 3.0, 1.0 / 3.0, 0.0, 0.0, 0.0, 0.0], 2.0 / 3.0),
    (
        [-18.0 / 11.0, 9.0 / 11.0, -2.0 / 11.0, 0.0, 0.0, 0.0],
        6.0 / 11.0,
    ),
    (
        [-48.0 / 25.0, 36.0 / 25.0, -16.0 / 25.0, 3.0 / 25.0, 0.0, 0.0],
        12.0 / 25.0,
    ),
    (
        [
            -300.0 / 137.0,
            300.0 / 137.0,
            -200.0 / 137.0,
            75.0 / 137.0,
            -12.0 / 137.0,
            0.0,
        ],
        60.0 / 137.0,
    ),
    (
        [
            -360.0 / 147.0,
            450.0 / 147.0,
            -400.0 / 147.0,
            225.0 / 147.0,
            -72.0 / 147.0,
            10.0 / 147.0,
        ],
        60.0 / 147.0,
    ),
];

/// A BDF integrator for a `D` dimensional state.
///
/// `ORDER` must be between 1 and 6; other values fail to compile.
#[derive(Debug, Clone)]
pub struct Bdf<T: Scalar, const D: usize, const ORDER: usize> {
    history: [SVector<T, D>; HISTORY],

    /// Index of the most recent state in `history`.
    head: usize,

    /// How many past states are valid, saturating at `ORDER`.
    steps_known: usize,

    step_size: T,
    newton: NewtonSettings<T>,
}

impl<T: Scalar, const D: usize, const ORDER: usize> Bdf<T, D, ORDER>
where
    Const<D>: DimMin<Const<D>, Output = Const<D>>,
{
    #[allow(clippy::manual_range_contains)]
    const VALID_ORDER: () = assert!(ORDER >= 1 && ORDER <= MAX_ORDER, "unsupported order");

    /// Create an integrator starting from `initial`.
    ///
    /// The step size starts at zero, so [`Bdf::set_sampling_rate`] must be called
    /// before stepping.
    #[must_use]
    pub fn new(initial: SVector<T, D>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_ORDER;
        Self {
            history: [initial; HISTORY],
            head: 0,
            steps_known: 1,
            step_size: T::zero(),
            newton: NewtonSettings::default(),
        }
    }

    /// Set the step size to the reciprocal of `rate`.
    ///
    /// History is kept; formulas above first order assume equally spaced past
    /// states, so callers normally follow this with [`Bdf::set_init_conditions`].
    pub fn set_sampling_rate(&mut self, rate: T) {
        debug_assert!(rate > T::zero());
        self.step_size = T::one() / rate;
    }

    #[must_use]
    pub fn step_size(&self) -> T {
        self.step_size
    }

    pub fn set_newton_settings(&mut self, newton: NewtonSettings<T>) {
        self.newton = newton;
    }

    /// Forget all history and restart from `initial` at first order.
    pub fn set_init_conditions(&mut self, initial: SVector<T, D>) {
        self.history = [initial; HISTORY];
        self.head = 0;
        self.steps_known = 1;
    }

    /// The most recently computed state.
    #[must_use]
    pub fn current_state(&self) -> &SVector<T, D> {
        &self.history[self.head]
    }

    /// Mutable access to the most recent state, used to clamp it between steps.
    pub fn current_state_mut(&mut self) -> &mut SVector<T, D> {
        &mut self.history[self.head]
    }

    /// The number of past states the next step will use.
    #[must_use]
    pub fn order_in_use(&self) -> usize {
        self.steps_known
    }

    fn past(&self, k: usize) -> &SVector<T, D> {
        &self.history[(self.head + k) % HISTORY]
    }

    /// Advance one step with the input `x` held constant.
    ///
    /// Every call advances exactly one step, even while the order is still
    /// climbing after [`Bdf::set_init_conditions`], rather than running the lower
    /// order steps back to back within the first call.
    pub fn step(&mut self, model: &impl Model<T, D>, x: T) {
        let order = self.steps_known;
        let (weights, derivative_weight) = &FORMULAS[order - 1];
        let mid = weights[..order]
            .iter()
            .enumerate()
            .fold(SVector::<T, D>::zeros(), |acc, (k, w)| {
                acc + self.past(k) * nalgebra::convert::<f64, T>(*w)
            });
        let scale = self.step_size * nalgebra::convert::<f64, T>(*derivative_weight);

        let next = self.solve(model, x, &mid, scale);

        self.head = (self.head + HISTORY - 1) % HISTORY;
        self.history[self.head] = next;
        self.steps_known = (self.steps_known + 1).min(ORDER);
    }

    /// Solve `y + mid - scale * f(y, x) = 0`, starting from an explicit Euler
    /// prediction.
    fn solve(
        &self,
        model: &impl Model<T, D>,
        x: T,
        mid: &SVector<T, D>,
        scale: T,
    ) -> SVector<T, D> {
        let last = self.current_state();
        let mut y = last + model.dy_dt(last, x) * self.step_size;
        let residual = |y: &SVector<T, D>| y + mid - model.dy_dt(y, x) * scale;
        let mut phi = residual(&y);

        let mut iterations = 0;
        while iterations < self.newton.max_iterations && phi.norm() > self.newton.tolerance {
            iterations += 1;
            let jacobian = SMatrix::<T, D, D>::identity() - model.jacobian(&y, x) * scale;
            let Some(increment) = jacobian.lu().solve(&(-phi)) else {
                break;
            };
            if increment.norm() <= T::INCREMENT_EPS {
                break;
            }
            y += increment;
            phi = residual(&y);
        }
        y
    }
}
