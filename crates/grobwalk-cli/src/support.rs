use grobwalk_kernel::{
    ConfigError, OrderKind, Ring, SolveError, Variant, WalkOutcome, WalkProblem, WeightVector,
};
use serde_json::{Value, json};

pub fn parse_ring_or_exit(vars: &str) -> Ring {
    Ring::parse_list(vars).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn parse_weight_or_exit(label: &str, text: &str) -> WeightVector {
    text.parse().unwrap_or_else(|e| {
        eprintln!("error: invalid {label} weight `{text}`: {e}");
        std::process::exit(1);
    })
}

pub fn parse_variant_or_exit(text: &str) -> Variant {
    text.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_problem_or_exit(path: &str) -> WalkProblem {
    WalkProblem::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Solves `problem`, exiting with status 1 on failure. With `--json` the
/// failure is also reported on stdout.
pub fn solve_or_exit(problem: &WalkProblem, json_output: bool) -> (Ring, WalkOutcome) {
    problem.solve().unwrap_or_else(|e| {
        if json_output {
            let class = match &e {
                SolveError::Walk(err) => err.class().to_string(),
                SolveError::Config(ConfigError::Polynomial(_)) => "parse".to_string(),
                SolveError::Config(_) => "config".to_string(),
            };
            print_json(&json!({
                "ok": false,
                "failureClass": class,
                "error": e.to_string(),
            }));
        }
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn print_json(payload: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

pub fn print_block(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    println!("  {header} ({}):", items.len());
    for item in items {
        println!("    - {item}");
    }
}

pub fn print_outcome(
    title: &str,
    problem: &WalkProblem,
    ring: &Ring,
    outcome: &WalkOutcome,
    json_output: bool,
) {
    let basis = outcome.basis.render(ring);
    let report = &outcome.report;

    if json_output {
        let payload = json!({
            "ok": true,
            "variant": report.variant.to_string(),
            "variables": ring.variables(),
            "start": problem.start,
            "target": problem.target,
            "basis": basis,
            "report": report,
        });
        print_json(&payload);
        return;
    }

    println!("grobwalk {title} --variant {}", report.variant);
    println!("  Ring: {}", ring.variables().join(", "));
    println!(
        "  Start: {} [{}]",
        problem.start,
        OrderKind::classify(&problem.start)
    );
    println!(
        "  Target: {} [{}]",
        problem.target,
        OrderKind::classify(&problem.target)
    );
    println!(
        "  Steps: {} (outer {}, rounds {}, stalls {}, deepest level {})",
        report.steps.len(),
        report.outer_steps(),
        report.rounds,
        report.stalls,
        report.deepest_level
    );
    let path: Vec<String> = report
        .steps
        .iter()
        .filter(|s| s.depth == 0)
        .map(|s| s.weight.to_string())
        .collect();
    if !path.is_empty() {
        println!("  Path: {}", path.join(" -> "));
    }
    println!("  Oracle calls: {}", report.oracle_calls);
    if report.oracle_fallback {
        println!("  Oracle fallback: yes");
    }
    print_block("Basis", &basis);
    if let Some(digest) = &report.basis_digest {
        println!("  Digest: {digest}");
    }
}
