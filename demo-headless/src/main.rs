use clap::{Parser, ValueEnum};
use spray_core::physics::atomization::{BlobsSheetCoeffs, LisaCoeffs, UniformCoeffs};
use spray_core::physics::breakup::{ReitzDiwakarCoeffs, ReitzKhrtCoeffs, TabCoeffs};
use spray_core::{
    AtomizationConfig, BreakupConfig, CloudInjection, DragIntegrator, FlowState, InjectionEvent,
    SprayCloudConfig, SprayError, SpraySimulation, UniformFlow, Vec3,
};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Atomization {
    Uniform,
    BlobsSheet,
    Lisa,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Breakup {
    None,
    ReitzDiwakar,
    ReitzKhrt,
    Tab,
}

/// Constant-volume spray chamber demo
#[derive(Parser, Debug)]
#[command(name = "spray-demo")]
#[command(about = "Lagrangian fuel spray injected into a quiescent pressurised chamber", long_about = None)]
struct Args {
    /// Cloud configuration as JSON; overrides the model flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary atomization model
    #[arg(short, long, value_enum, default_value_t = Atomization::BlobsSheet)]
    atomization: Atomization,

    /// Secondary breakup model
    #[arg(short, long, value_enum, default_value_t = Breakup::ReitzKhrt)]
    breakup: Breakup,

    /// Simulated time in milliseconds
    #[arg(short, long, default_value_t = 1.0)]
    duration_ms: f32,

    /// Timestep in microseconds
    #[arg(long, default_value_t = 2.0)]
    dt_us: f32,

    /// Injection duration in milliseconds
    #[arg(long, default_value_t = 0.5)]
    injection_ms: f32,

    /// Injected mass flow rate in g/s
    #[arg(long, default_value_t = 5.0)]
    mass_flow: f32,

    /// Liquid exit speed in m/s
    #[arg(short = 'u', long, default_value_t = 300.0)]
    injection_speed: f32,

    /// Nozzle hole diameter in micrometres
    #[arg(long, default_value_t = 180.0)]
    nozzle_um: f32,

    /// Parcels injected per timestep
    #[arg(short, long, default_value_t = 20)]
    parcels: usize,

    /// Chamber gas density in kg/m³
    #[arg(long, default_value_t = 20.0)]
    gas_density: f32,

    /// Breakup sub-steps per timestep
    #[arg(long, default_value_t = 1)]
    substeps: u32,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Report interval in microseconds
    #[arg(short, long, default_value_t = 100.0)]
    report_interval_us: f32,
}

fn cloud_config(args: &Args) -> Result<SprayCloudConfig, Box<dyn Error>> {
    if let Some(path) = &args.config {
        let contents = std::fs::read_to_string(path)?;
        let config: SprayCloudConfig = serde_json::from_str(&contents)?;
        info!("Loaded cloud configuration from {}", path.display());
        return Ok(config);
    }

    let atomization = match args.atomization {
        Atomization::Uniform => AtomizationConfig::Uniform(UniformCoeffs::default()),
        Atomization::BlobsSheet => AtomizationConfig::BlobsSheet(BlobsSheetCoeffs::default()),
        Atomization::Lisa => AtomizationConfig::Lisa(LisaCoeffs::default()),
    };
    let breakup = match args.breakup {
        Breakup::None => BreakupConfig::None,
        Breakup::ReitzDiwakar => BreakupConfig::ReitzDiwakar(ReitzDiwakarCoeffs::default()),
        Breakup::ReitzKhrt => BreakupConfig::ReitzKhrt(ReitzKhrtCoeffs::default()),
        Breakup::Tab => BreakupConfig::Tab(TabCoeffs::default()),
    };

    Ok(SprayCloudConfig {
        atomization,
        breakup,
        seed: args.seed,
        ..SprayCloudConfig::default()
    })
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = cloud_config(args)?;
    let dt = args.dt_us * 1.0e-6;
    let duration = args.duration_ms * 1.0e-3;
    let injection_end = args.injection_ms * 1.0e-3;
    let report_interval = args.report_interval_us * 1.0e-6;
    let nozzle = Vec3::zeros();

    let gas = FlowState::quiescent_air().with_density(args.gas_density);
    let mut sim = SpraySimulation::new(
        Box::new(UniformFlow::new(gas)),
        Box::new(DragIntegrator::default()),
    );
    sim.set_breakup_substeps(args.substeps)?;
    let cloud_index = sim.add_cloud(&config)?;

    println!("=== Spray Chamber Demo ===\n");
    println!(
        "Atomization: {}, Breakup: {}, Gas density: {:.1} kg/m³",
        sim.clouds()[cloud_index].atomization().name(),
        sim.clouds()[cloud_index].breakup().name(),
        args.gas_density
    );
    println!(
        "Injection: {:.1} g/s at {:.0} m/s through {:.0} µm for {:.2} ms\n",
        args.mass_flow, args.injection_speed, args.nozzle_um, args.injection_ms
    );

    println!("Time(µs) | Parcels | Children | Mass(mg) | D32(µm) | Dmax(µm) | Pen95(mm)");
    println!("---------|---------|----------|----------|---------|----------|----------");

    let mut next_report = 0.0;
    let mut next_event_id = 0;
    let mut children = 0;

    while sim.time() < duration {
        let mut injections = Vec::new();
        if sim.time() < injection_end {
            injections.push(CloudInjection {
                cloud: cloud_index,
                event: InjectionEvent {
                    id: next_event_id,
                    position: nozzle,
                    direction: Vec3::new(0.0, 0.0, -1.0),
                    mass_flow_rate: args.mass_flow * 1.0e-3,
                    duration: dt,
                    injection_speed: args.injection_speed,
                    nozzle_diameter: args.nozzle_um * 1.0e-6,
                    parcels: args.parcels,
                },
            });
            next_event_id += 1;
        }

        let summary = sim.update(dt, &injections)?;
        children += summary.children();

        if sim.time() >= next_report {
            let cloud = &sim.clouds()[cloud_index];
            println!(
                "{:8.1} | {:7} | {:8} | {:8.4} | {:7.2} | {:8.2} | {:9.2}",
                sim.time() * 1.0e6,
                cloud.len(),
                children,
                cloud.total_mass() * 1.0e6,
                cloud.mean_diameter(3, 2)? * 1.0e6,
                cloud.max_diameter() * 1.0e6,
                cloud.penetration(0.95, &nozzle)? * 1.0e3
            );
            next_report += report_interval;
        }
    }

    let cloud = &sim.clouds()[cloud_index];
    cloud.info();

    println!("\n=== Simulation Complete ===");
    println!("Final time: {:.1} µs", sim.time() * 1.0e6);
    println!("Injection events: {}", next_event_id);
    println!("Parcels: {}", cloud.len());
    println!("Child parcels from breakup: {}", children);
    println!("Liquid mass: {:.4} mg", cloud.total_mass() * 1.0e6);
    println!(
        "Average parcel mass: {:.4e} kg",
        cloud.average_parcel_mass()
    );

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        if let Some(spray) = e.downcast_ref::<SprayError>() {
            eprintln!("Spray error: {spray}");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
