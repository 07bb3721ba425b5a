// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// ntdist - Pairwise evolutionary distance matrices for DNA alignments
pub struct Args {
    /// path to the aligned FASTA file
    #[argh(option, short = 'i')]
    pub alignment: Option<String>,

    /// output distance matrix file, "-" for stdout (default: stdout)
    #[argh(option, short = 'o')]
    pub output: Option<String>,

    /// substitution model: pdist, jc, k2p, f81, f84, tn93 (default: k2p)
    #[argh(option, short = 'm')]
    pub model: Option<String>,

    /// ignore every column containing a gap in any sequence
    #[argh(switch, short = 'r')]
    pub remove_gaps: bool,

    /// enable gamma rate heterogeneity with the given shape parameter
    #[argh(option)]
    pub gamma: Option<f64>,

    /// pdist gap counting: 0 ignore, 1 count gap vs base, 2 count internal gaps only (default: 0)
    #[argh(option)]
    pub count_gap_mutations: Option<i64>,

    /// per-site weights file (one non-negative number per column)
    #[argh(option)]
    pub weights: Option<String>,

    /// number of threads (default: auto-detect)
    #[argh(option, short = 't')]
    pub threads: Option<usize>,

    /// output format: dist, tsv, csv, phylip (default: dist)
    #[argh(option)]
    pub format: Option<String>,

    /// show a progress bar while computing
    #[argh(switch)]
    pub progress: bool,

    /// list available models and exit
    #[argh(switch)]
    pub list_models: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
