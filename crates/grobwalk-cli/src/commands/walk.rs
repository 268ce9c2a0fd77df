use crate::support::{
    parse_ring_or_exit, parse_variant_or_exit, parse_weight_or_exit, print_outcome, solve_or_exit,
};
use grobwalk_kernel::{BuchbergerConfig, WalkParams, WalkProblem};

pub struct Args {
    pub vars: String,
    pub polys: Vec<String>,
    pub start: String,
    pub target: String,
    pub variant: String,
    pub start_degree: Option<usize>,
    pub target_degree: Option<usize>,
    pub perturbation_vars: Option<usize>,
    pub radius: u32,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub max_pairs: Option<usize>,
    pub json: bool,
}

pub fn run(args: Args) {
    let ring = parse_ring_or_exit(&args.vars);
    let problem = WalkProblem {
        variables: ring.variables().to_vec(),
        generators: args.polys,
        start: parse_weight_or_exit("start", &args.start),
        target: parse_weight_or_exit("target", &args.target),
        walk: WalkParams {
            variant: parse_variant_or_exit(&args.variant),
            start_degree: args.start_degree,
            target_degree: args.target_degree,
            perturbation_vars: args.perturbation_vars,
            weight_radius: args.radius,
            seed: args.seed,
            max_depth: args.max_depth,
        },
        oracle: BuchbergerConfig {
            max_pairs: args.max_pairs,
            ..BuchbergerConfig::default()
        },
    };

    let (ring, outcome) = solve_or_exit(&problem, args.json);
    print_outcome("walk", &problem, &ring, &outcome, args.json);
}
