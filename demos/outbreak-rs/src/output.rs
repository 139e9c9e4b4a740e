use std::io;

use sird::Trajectory;

const SINGLE_HEADERS: [&str; 4] = ["susceptible", "infected", "recovered", "dead"];

/// Column headers matching the engine's state layouts.
pub fn state_headers(state_dim: usize) -> Vec<String> {
    match state_dim {
        4 => SINGLE_HEADERS.iter().map(|h| h.to_string()).collect(),
        5 => SINGLE_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(["cumulative_infections".to_string()])
            .collect(),
        8 => (1..=2)
            .flat_map(|block| SINGLE_HEADERS.iter().map(move |h| format!("{}_{}", h, block)))
            .collect(),
        _ => (0..state_dim).map(|c| format!("component_{}", c)).collect(),
    }
}

/// Write a trajectory as CSV, one row per time point, optionally with a
/// rolling-incidence column alongside.
pub fn write_trajectory<W: io::Write>(
    writer: W,
    trajectory: &Trajectory,
    incidence: Option<&[f64]>,
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut headers = vec!["step".to_string(), "time".to_string()];
    headers.extend(state_headers(trajectory.state_dim()));
    if incidence.is_some() {
        headers.push("incidence".to_string());
    }
    wtr.write_record(&headers)?;

    for step in 0..trajectory.len() {
        let mut row = vec![step.to_string(), trajectory.time(step).to_string()];
        for component in 0..trajectory.state_dim() {
            row.push(trajectory.value(step, component).to_string());
        }
        if let Some(incidence) = incidence {
            row.push(incidence[step].to_string());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::fs;

    use sird::{Integrator, ModelParameters, NoFeedback, ParameterSet, TimeGrid, TransitionModel};

    use super::*;

    #[test]
    fn test_write_trajectory_csv() {
        let par = ParameterSet {
            infection_rate: 0.14,
            recovery_rate: 0.07,
            immunity_loss_rate: 0.0,
            death_fraction: 0.0,
            population: 1000.0,
            initial_infected: 10.0,
        };
        let initial = par.initial_state();
        let mut params = ModelParameters::Single(par);
        let grid = TimeGrid::new(0.0, 5.0, 1.0).unwrap();
        let trajectory = Integrator::deterministic()
            .integrate(
                TransitionModel::Single {
                    track_cumulative: false,
                },
                &mut NoFeedback,
                grid,
                &initial,
                &mut params,
            )
            .unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        write_trajectory(file.reopen().unwrap(), &trajectory, None).unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 7); // header + 6 time points
        assert_eq!(lines[0], "step,time,susceptible,infected,recovered,dead");
        assert!(lines[1].starts_with("0,0,990,10,0,0"));
    }

    #[test]
    fn test_coupled_headers() {
        assert_eq!(
            state_headers(8),
            [
                "susceptible_1",
                "infected_1",
                "recovered_1",
                "dead_1",
                "susceptible_2",
                "infected_2",
                "recovered_2",
                "dead_2"
            ]
        );
    }
}
