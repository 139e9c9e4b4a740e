pub mod output;
pub mod scenario;

use std::io::{self, Read};

use scenario::Scenario;
use sird::{IncidenceWindow, Integrator, ModelParameters, series_incidence, transition};

fn main() {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .expect("failed to read stdin");
    if raw.trim().is_empty() {
        eprintln!("Error: no scenario on stdin");
        std::process::exit(1);
    }
    let scenario: Scenario =
        serde_json::from_str(&raw).expect("failed to parse scenario JSON from stdin");

    let grid = scenario.grid().unwrap_or_else(|err| fail(err));
    let (model, mut params, initial_state) = scenario.build().unwrap_or_else(|err| fail(err));
    let population = match &params {
        ModelParameters::Single(par) => par.population,
        ModelParameters::Coupled(par) => par.first.population + par.second.population,
    };
    let mut policy = scenario.policy(population);

    let mut integrator = match scenario.seed {
        Some(seed) => Integrator::seeded(seed),
        None => Integrator::deterministic(),
    };
    let trajectory = integrator
        .integrate(model, policy.as_mut(), grid, &initial_state, &mut params)
        .unwrap_or_else(|err| fail(err));

    // Per-100k rolling incidence when the cumulative column is tracked.
    let incidence = (trajectory.state_dim() == transition::CUMULATIVE + 1).then(|| {
        let window = IncidenceWindow::per_100k(population, grid.dt());
        series_incidence(&trajectory.column(transition::CUMULATIVE), &window)
    });

    output::write_trajectory(io::stdout(), &trajectory, incidence.as_deref())
        .expect("failed to write CSV to stdout");
}

fn fail(err: sird::SirdError) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}
