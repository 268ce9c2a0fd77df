use crate::support::{parse_variant_or_exit, print_json, print_outcome, solve_or_exit};
use grobwalk_kernel::samples::{sample, sample_names};
use serde_json::json;

pub fn run(name: Option<String>, variant: Option<String>, json_output: bool) {
    let Some(name) = name else {
        list(json_output);
        return;
    };

    let mut problem = sample(&name).unwrap_or_else(|| {
        eprintln!(
            "error: unknown sample `{name}` (expected one of: {})",
            sample_names().join(", ")
        );
        std::process::exit(1);
    });
    if let Some(variant) = variant {
        problem.walk.variant = parse_variant_or_exit(&variant);
    }

    let (ring, outcome) = solve_or_exit(&problem, json_output);
    print_outcome(
        &format!("samples {name}"),
        &problem,
        &ring,
        &outcome,
        json_output,
    );
}

fn list(json_output: bool) {
    let rows: Vec<_> = sample_names()
        .iter()
        .filter_map(|name| sample(name).map(|p| (*name, p)))
        .collect();

    if json_output {
        let samples: Vec<_> = rows
            .iter()
            .map(|(name, p)| {
                json!({
                    "name": name,
                    "variables": p.variables,
                    "generators": p.generators,
                    "start": p.start,
                    "target": p.target,
                })
            })
            .collect();
        print_json(&json!({ "samples": samples }));
    } else {
        println!("grobwalk samples");
        for (name, p) in rows {
            println!(
                "  {name}: {} in {} ({} -> {})",
                p.generators.join(", "),
                p.variables.join(","),
                p.start,
                p.target
            );
        }
    }
}
