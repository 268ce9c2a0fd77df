use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "grobwalk",
    about = "Grobwalk: Gröbner basis conversion by walking the Gröbner fan",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a basis between two weight orders
    Walk {
        /// Ring variables, comma separated (x1 > x2 > ... for lex)
        #[arg(long)]
        vars: String,

        /// Generator polynomial (repeatable)
        #[arg(long = "poly", required = true)]
        polys: Vec<String>,

        /// Start weight, e.g. 1,1 for the degree order
        #[arg(long)]
        start: String,

        /// Target weight, e.g. 1,0 for lex
        #[arg(long)]
        target: String,

        /// Walk variant: plain, random, perturbation, fractal, fractal_random,
        /// tran, tran_random, alt1, alt2
        #[arg(long, default_value = "plain")]
        variant: String,

        /// Start perturbation degree (default: number of variables)
        #[arg(long)]
        start_degree: Option<usize>,

        /// Target perturbation degree (default: number of variables)
        #[arg(long)]
        target_degree: Option<usize>,

        /// Number of perturbation variables (default: number of variables)
        #[arg(long)]
        perturbation_vars: Option<usize>,

        /// Weight radius for random steps
        #[arg(long, default_value_t = 5)]
        radius: u32,

        /// Seed for random steps
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Fractal recursion bound (default: number of variables + 1)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Critical-pair budget for each oracle call
        #[arg(long)]
        max_pairs: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a walk problem from a TOML or JSON file
    Run {
        /// Problem file (.toml or .json)
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe the Gröbner cone of the reduced basis at a weight
    Cone {
        /// Ring variables, comma separated
        #[arg(long)]
        vars: String,

        /// Generator polynomial (repeatable)
        #[arg(long = "poly", required = true)]
        polys: Vec<String>,

        /// Weight selecting the order (1,..,1 degree order, 1,0,..,0 lex)
        #[arg(long)]
        weight: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the bundled sample problems, or run one
    Samples {
        /// Sample to run
        name: Option<String>,

        /// Override the sample's walk variant
        #[arg(long)]
        variant: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
