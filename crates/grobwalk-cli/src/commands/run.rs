use crate::support::{load_problem_or_exit, print_outcome, solve_or_exit};
use tracing::debug;

pub fn run(path: String, json_output: bool) {
    let problem = load_problem_or_exit(&path);
    debug!(
        %path,
        variant = %problem.walk.variant,
        generators = problem.generators.len(),
        "loaded walk problem"
    );
    let (ring, outcome) = solve_or_exit(&problem, json_output);
    print_outcome(&format!("run {path}"), &problem, &ring, &outcome, json_output);
}
