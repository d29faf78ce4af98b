use crate::build_info;
use crate::driver::BatchConfig;
use crate::initial_conditions::*;
use clap::Parser;
use std::path::PathBuf;

#[cfg(feature = "profile-with-puffin")]
static PUFFIN_SERVER: std::sync::Mutex<Option<puffin_http::Server>> =
    std::sync::Mutex::new(None);

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(feature = "profile-with-puffin")]
fn start_profiler() {
    let server_addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&server_addr) {
        Ok(server) => {
            log::info!(
                "Run this to view profiling data:  puffin_viewer {server_addr}"
            );
            profiling::puffin::set_scopes_on(true);
            if let Ok(mut slot) = PUFFIN_SERVER.lock() {
                *slot = Some(server);
            }
        }
        Err(e) => log::warn!("profiling server not started: {}", e),
    }
}

fn common_setup(name: &str, build_info: bool, threads: usize) {
    if build_info {
        build_info::print_report(name);
        std::process::exit(0);
    }

    init_logging();

    #[cfg(feature = "profile-with-puffin")]
    start_profiler();

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("rayon_thread_{}", i))
        .build_global()
    {
        log::warn!("rayon pool already configured: {}", e);
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Simulate every plate of a job file to thermal equilibrium.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Job manifest, relative to the prefix directory.
    #[arg(required_unless_present("build_info"))]
    pub job_file: Option<PathBuf>,

    /// Worker threads per plate, defaults to the available cores.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Directory holding the job file, the plates and all outputs.
    #[arg(short, long, default_value = ".")]
    pub prefix: PathBuf,

    /// Chunk size to use for parallel grid copies.
    #[arg(short, long, default_value = "1000")]
    pub chunk_size: usize,

    /// Solve in the calling thread only.
    #[arg(long)]
    pub serial: bool,

    /// Also write a heat map of every converged plate.
    #[arg(short, long)]
    pub write_images: bool,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn cli_setup(name: &str) -> Self {
        let args = Args::parse();
        common_setup(name, args.build_info, args.threads());
        args
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(default_threads)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            job_file: self.job_file.clone().unwrap_or_default(),
            prefix: self.prefix.clone(),
            chunk_size: self.chunk_size,
            write_images: self.write_images,
        }
    }

    pub fn finish(&self) {
        #[cfg(feature = "profile-with-puffin")]
        {
            log::info!("Flushing profiler");
            if let Ok(mut slot) = PUFFIN_SERVER.lock() {
                slot.take();
            }
        }
    }
}

/// Write an initial plate snapshot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct GenPlateArgs {
    /// Snapshot to create.
    #[arg(required_unless_present("build_info"))]
    pub output: Option<PathBuf>,

    /// Rows, borders included.
    #[arg(short, long, default_value = "100")]
    pub rows: usize,

    /// Columns, borders included.
    #[arg(short = 'C', long, default_value = "100")]
    pub cols: usize,

    /// Interior initial condition.
    #[arg(long, default_value = "zero")]
    pub ic: ClapICType,

    /// Random upper bound or impulse variance.
    #[arg(long, default_value = "100")]
    pub dial: f64,

    /// Temperature of every border cell.
    #[arg(short, long, default_value = "100")]
    pub border: f64,

    /// Chunk size to use for parallelism.
    #[arg(short, long, default_value = "1000")]
    pub chunk_size: usize,

    /// Also write a heat map next to the snapshot.
    #[arg(short, long)]
    pub write_image: bool,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl GenPlateArgs {
    pub fn cli_setup(name: &str) -> Self {
        let args = GenPlateArgs::parse();
        common_setup(name, args.build_info, default_threads());
        args
    }

    pub fn ic_type(&self) -> ICType {
        self.ic.to_ic_type(self.dial)
    }

    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_default()
    }

    pub fn image_path(&self) -> PathBuf {
        self.output().with_extension("png")
    }
}
