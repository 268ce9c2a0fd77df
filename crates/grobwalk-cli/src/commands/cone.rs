use crate::support::{parse_ring_or_exit, parse_weight_or_exit, print_block, print_json};
use grobwalk_kernel::{Buchberger, GroebnerCone, Ideal, OrderKind, StandardBasis};
use serde_json::json;

pub fn run(vars: String, polys: Vec<String>, weight: String, json_output: bool) {
    let ring = parse_ring_or_exit(&vars);
    let weight = parse_weight_or_exit("cone", &weight);
    if weight.len() != ring.nvars() {
        eprintln!(
            "error: weight {weight} has {} entries for {} variables",
            weight.len(),
            ring.nvars()
        );
        std::process::exit(1);
    }
    let ideal = Ideal::parse(&ring, &polys).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let order = OrderKind::order_for(&weight);
    let basis = Buchberger::default()
        .standard_basis(&ideal, &order)
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });
    let cone = GroebnerCone::of(&basis, &order);
    let facets: Vec<String> = cone.facet_normals().iter().map(|f| f.to_string()).collect();
    let rendered = basis.render(&ring);

    if json_output {
        let payload = json!({
            "order": OrderKind::classify(&weight).to_string(),
            "weight": weight,
            "basis": rendered,
            "ambientDimension": cone.ambient_dimension(),
            "dimension": cone.dimension(),
            "codimension": cone.codimension(),
            "facetNormals": cone.facet_normals(),
            "containsWeight": cone.contains(&weight),
        });
        print_json(&payload);
    } else {
        println!("grobwalk cone --weight {weight}");
        println!("  Order: {}", OrderKind::classify(&weight));
        println!(
            "  Dimension: {} of {} (codimension {})",
            cone.dimension(),
            cone.ambient_dimension(),
            cone.codimension()
        );
        print_block("Basis", &rendered);
        print_block("Facet normals", &facets);
    }
}
