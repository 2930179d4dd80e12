use crate::ode::{self, Tolerance};
use anyhow::{Result, ensure};

/// Contact-rate transmission between susceptible and infectious individuals.
///
/// Solves `dS/dt = -beta S I / N`, `dI/dt = beta S I / N` over one day.
/// Nobody leaves the infectious compartment here: stage durations take
/// care of that.
#[derive(Debug, Clone)]
pub struct TransmissionModel {
    population: f64,
    beta: f64,
    tol: Tolerance,
}

impl TransmissionModel {
    pub fn new(population: f64, beta: f64) -> Self {
        Self {
            population,
            beta,
            tol: Tolerance::default(),
        }
    }

    /// Advance the susceptible and infectious totals by one day.
    ///
    /// Returns the new `(susceptible, infectious)` totals, whose sum equals
    /// the sum of the inputs.
    ///
    /// # Errors
    /// Returns an error if either input is not finite.
    pub fn step(&self, susceptible: f64, infectious: f64) -> Result<(f64, f64)> {
        ensure!(
            susceptible.is_finite() && infectious.is_finite(),
            "totals must be finite, but are ({susceptible}, {infectious})"
        );
        if susceptible <= 0.0 || infectious <= 0.0 || self.beta == 0.0 {
            return Ok((susceptible, infectious));
        }

        let rate = self.beta / self.population;
        let rhs = |_, y: &[f64; 2]| {
            let flow = rate * y[0] * y[1];
            [-flow, flow]
        };
        match ode::integrate(rhs, [susceptible, infectious], 0.0, 1.0, self.tol) {
            Ok([susceptible, infectious]) => Ok((susceptible, infectious)),
            Err(error) => {
                // Too stiff for the explicit solver: the flow saturates within the day.
                log::debug!("{error:#}, using the closed-form solution");
                Ok(self.closed_form(susceptible, infectious))
            }
        }
    }

    /// Exact one-day solution: the infectious total follows a logistic curve.
    fn closed_form(&self, susceptible: f64, infectious: f64) -> (f64, f64) {
        let total = susceptible + infectious;
        let decay = (-self.beta * total / self.population).exp();
        let susceptible = total * susceptible * decay / (susceptible * decay + infectious);
        (susceptible, total - susceptible)
    }
}
