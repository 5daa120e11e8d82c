//! `kclique` — counts `k`-cliques in an edge-list graph file.
//!
//! Usage: `kclique <threads> <k> <path> [--use-truss-filter]`, mirroring the
//! reference binary's own positional-argument CLI shape
//! (`crates/app/src/triangle_count.rs`'s `pico_args`-based `mod cli`).

use std::process::ExitCode;

use clique_algos::config::PipelineConfig;
use clique_algos::driver::count_k_cliques;
use clique_algos::error::Error;
use log::info;

fn main() -> ExitCode {
    env_logger::init();

    let args = match cli::create() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    info!(
        "kclique: {} threads, k = {}, path = {:?}, truss filter = {}",
        args.threads, args.k, args.path, args.use_truss_filter
    );

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("invalid thread pool configuration: {err}");
            return ExitCode::from(2);
        }
    };

    let config = PipelineConfig::default();
    let result = pool.install(|| {
        count_k_cliques::<u32>(&args.path, args.k, args.use_truss_filter, &config)
    });

    match result {
        Ok(count) => {
            println!("Number of {}-cliques: {}", args.k, count);
            ExitCode::SUCCESS
        }
        Err(Error::ConfigError(message)) => {
            eprintln!("invalid argument: {message}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

mod cli {
    use pico_args::Arguments;
    use std::path::PathBuf;

    #[derive(Debug)]
    pub(crate) struct AppArgs {
        pub(crate) threads: usize,
        pub(crate) k: u8,
        pub(crate) path: PathBuf,
        pub(crate) use_truss_filter: bool,
    }

    pub(crate) fn create() -> Result<AppArgs, Box<dyn std::error::Error>> {
        let mut pargs = Arguments::from_env();

        let use_truss_filter = pargs.contains("--use-truss-filter");

        let threads: usize = pargs.free_from_str()?;
        let k: u8 = pargs.free_from_str()?;
        let path: PathBuf = pargs.free_from_str()?;

        Ok(AppArgs {
            threads,
            k,
            path,
            use_truss_filter,
        })
    }
}
