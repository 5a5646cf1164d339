//! Generate a small world and walk an agent across it, one search slice per
//! tick.
//!
//! Run: cargo run --bin walk -- --seed 7
//!
//! Enable search logging:
//!   RUST_LOG=voxnav_paths=debug cargo run --bin walk

use std::sync::Arc;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use voxnav_core::BlockPos;
use voxnav_demos::{nearest_spot, render_top_down};
use voxnav_paths::{Distance, Path, PathRequest, PathStatus, SearchConfig};
use voxnav_world::{Blueprint, TerrainConfig, TerrainGen};

/// A small fenced pen with a gate, dropped onto the terrain a few times.
const PEN: &str = "
ffFff
f...f
f...f
fffff
";

/// Walk an agent between two corners of a generated world.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Terrain seed
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Chunks along each side of the world
    #[arg(long, default_value = "2")]
    chunks: i32,

    /// Step budget for the search
    #[arg(long, default_value = "2000")]
    max_steps: u32,

    /// Expansions per tick when searching synchronously
    #[arg(long, default_value = "20")]
    per_tick: u32,

    /// Run the search on a worker thread and poll it every tick
    #[arg(long)]
    background: bool,

    /// Use the cheaper axis-sum heuristic
    #[arg(long)]
    manhattan: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = TerrainConfig {
        chunks: args.chunks,
        ..TerrainConfig::default()
    };
    let pen = match Blueprint::new(PEN) {
        Ok(pen) => pen,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let mut tg =
        TerrainGen::new(config, StdRng::seed_from_u64(args.seed)).with_structures(vec![pen]);
    let area = tg.area();
    let world = Arc::new(tg.generate());

    let corner = |x, z| nearest_spot(&world, area, x, z);
    let (Some(from), Some(to)) = (
        corner(area.min.x + 1, area.min.z + 1),
        corner(area.max.x - 2, area.max.z - 2),
    ) else {
        eprintln!("Error: no place to stand in this world, try another seed");
        std::process::exit(1);
    };
    println!("Searching {from} -> {to}");

    let search = SearchConfig {
        distance: if args.manhattan {
            Distance::Manhattan
        } else {
            Distance::Euclidean
        },
        ..SearchConfig::default()
    };
    let request = PathRequest::between(from, to, args.max_steps);

    let mut ticks = 0u32;
    let mut path = if args.background {
        let mut path = Path::spawn(Arc::clone(&world), request, search);
        while path.poll_async() == PathStatus::Calculating {
            ticks += 1;
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        path
    } else {
        let mut path = Path::with_config(Arc::clone(&world), request, search);
        let budget = request.budget(&search);
        let mut spent = 0u32;
        while path.status() == PathStatus::Calculating {
            if spent >= budget {
                path.teardown();
                break;
            }
            let slice = args.per_tick.min(budget - spent);
            path.advance(slice);
            spent += slice;
            ticks += 1;
            if ticks % 50 == 0 {
                info!("tick {ticks}: {} cells cached", path.cached_cells());
            }
        }
        path
    };

    println!(
        "{} after {ticks} ticks, {} expansions",
        path.status(),
        path.expansions()
    );

    let mut route: Vec<BlockPos> = Vec::with_capacity(path.point_count());
    while let Some(p) = path.next_point() {
        route.push(p);
    }
    if path.status() == PathStatus::PathFound {
        println!("{} waypoints, agent stops next to {to}", route.len() + 1);
    }
    print!("{}", render_top_down(&world, area, &route, from, to));
}
